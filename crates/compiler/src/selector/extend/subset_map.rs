use std::{collections::HashMap, hash::Hash};

use indexmap::IndexSet;

/// A map from sets of keys to values.
///
/// Looking up a set returns every value whose key set is a subset of it.
#[derive(Debug)]
pub(crate) struct SubsetMap<K, V> {
    /// Each key mapped to the indices of the entries whose key sets contain it
    by_key: HashMap<K, Vec<usize>>,
    keys: Vec<IndexSet<K>>,
    values: Vec<V>,
}

impl<K, V> Default for SubsetMap<K, V> {
    fn default() -> Self {
        Self {
            by_key: HashMap::new(),
            keys: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, V> SubsetMap<K, V> {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Associates `value` with the set `key`. An empty key set is never
    /// returned by [`SubsetMap::get`].
    pub fn insert(&mut self, key: impl IntoIterator<Item = K>, value: V) {
        let idx = self.values.len();
        let key: IndexSet<K> = key.into_iter().collect();

        for k in &key {
            self.by_key.entry(k.clone()).or_default().push(idx);
        }

        self.keys.push(key);
        self.values.push(value);
    }

    /// Returns every value whose key set is a subset of `set`, in insertion
    /// order and without duplicates
    pub fn get(&self, set: &IndexSet<K>) -> Vec<&V> {
        let mut indices: Vec<usize> = set
            .iter()
            .filter_map(|k| self.by_key.get(k))
            .flatten()
            .copied()
            .filter(|&idx| self.keys[idx].iter().all(|k| set.contains(k)))
            .collect();

        indices.sort_unstable();
        indices.dedup();

        indices.into_iter().map(|idx| &self.values[idx]).collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[i32]) -> IndexSet<i32> {
        keys.iter().copied().collect()
    }

    #[test]
    fn returns_values_of_subsets() {
        let mut map = SubsetMap::default();
        map.insert(vec![1, 2], "a");
        map.insert(vec![2], "b");
        map.insert(vec![3, 4], "c");
        map.insert(vec![2, 1], "d");

        assert_eq!(map.get(&set(&[1, 2, 3])), [&"a", &"b", &"d"]);
        assert_eq!(map.get(&set(&[2])), [&"b"]);
        assert_eq!(map.get(&set(&[4, 3])), [&"c"]);
        assert!(map.get(&set(&[1, 4])).is_empty());
    }

    #[test]
    fn empty_keys_never_match() {
        let mut map = SubsetMap::default();
        map.insert(Vec::new(), "a");

        assert!(!map.is_empty());
        assert!(map.get(&set(&[1])).is_empty());
        assert_eq!(map.values().count(), 1);
    }
}
