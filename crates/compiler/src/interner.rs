use lasso::{Spur, ThreadedRodeo};
use once_cell::sync::Lazy;

use std::fmt::{self, Display};

// selectors are shared across threads, so names live in one process-wide table
static STRINGS: Lazy<ThreadedRodeo<Spur>> = Lazy::new(ThreadedRodeo::default);

/// A selector name (class, id, element, placeholder, pseudo) interned so that
/// equality and hashing are a single integer comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct InternedString(Spur);

impl InternedString {
    pub fn get_or_intern<T: AsRef<str>>(s: T) -> Self {
        Self(STRINGS.get_or_intern(s))
    }

    pub fn resolve(self) -> String {
        self.resolve_ref().to_owned()
    }

    pub fn is_empty(self) -> bool {
        self.resolve_ref().is_empty()
    }

    pub fn resolve_ref(self) -> &'static str {
        STRINGS.resolve(&self.0)
    }
}

impl Display for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resolve_ref())
    }
}

impl From<&str> for InternedString {
    fn from(s: &str) -> Self {
        Self::get_or_intern(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable_across_threads() {
        let here = InternedString::get_or_intern("foo");
        let there = std::thread::spawn(|| InternedString::get_or_intern("foo"))
            .join()
            .unwrap();

        assert_eq!(here, there);
        assert_eq!(there.resolve_ref(), "foo");
    }
}
