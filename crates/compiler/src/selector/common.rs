use std::{
    fmt::{self, Display},
    iter::Sum,
    ops::Add,
};

use crate::interner::InternedString;

/// The namespace prefix of an element, universal or attribute selector
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Namespace {
    /// `*|`: any namespace, including none
    Asterisk,
    /// `|`: no namespace
    Empty,
    /// `ns|`
    Other(InternedString),
    /// No prefix was written; the default namespace applies
    None,
}

impl Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("|"),
            Self::Asterisk => f.write_str("*|"),
            Self::Other(namespace) => write!(f, "{}|", namespace),
            Self::None => Ok(()),
        }
    }
}

/// Unifies two namespaces: `*|` yields to the other, anything else must match
pub(crate) fn unify_namespaces(ns1: Namespace, ns2: Namespace) -> Option<Namespace> {
    match (ns1, ns2) {
        (Namespace::Asterisk, other) | (other, Namespace::Asterisk) => Some(other),
        (ns1, ns2) if ns1 == ns2 => Some(ns1),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct QualifiedName {
    pub ident: InternedString,
    pub namespace: Namespace,
}

impl QualifiedName {
    pub fn new(ident: &str, namespace: Namespace) -> Self {
        Self {
            ident: InternedString::get_or_intern(ident),
            namespace,
        }
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace, self.ident)
    }
}

/// How `:not(X)` decides that it matches everything a compound matches
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum NotRule {
    /// The compound contradicts `X`'s element, id or a nested `:not`, or
    /// shares none of the simple selectors of a compound `X`
    Loose,
    /// Only a contradiction counts. Weaving and trimming use this so that a
    /// generated selector is never dropped for one it merely overlaps.
    Strict,
}

/// Specificity is written in base 1000. Nothing prevents a compound from
/// holding a thousand simple selectors, but in practice none does.
pub const BASE_SPECIFICITY: i32 = 1000;

/// The range of specificities a selector can have
///
/// Selector pseudo-classes such as `:matches(.a, #b)` have a specificity that
/// depends on which alternative matched, so every specificity is a range.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Specificity {
    pub min: i32,
    pub max: i32,
}

impl Specificity {
    pub const ZERO: Specificity = Specificity::exact(0);

    pub const fn new(min: i32, max: i32) -> Self {
        Specificity { min, max }
    }

    pub const fn exact(value: i32) -> Self {
        Specificity {
            min: value,
            max: value,
        }
    }

    pub const fn is_range(self) -> bool {
        self.min != self.max
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Specificity {
            min: self.min + rhs.min,
            max: self.max + rhs.max,
        }
    }
}

impl Sum for Specificity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Specificity::ZERO, Add::add)
    }
}

impl Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_range() {
            write!(f, "{}..{}", self.min, self.max)
        } else {
            write!(f, "{}", self.min)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_unify() {
        let foo = Namespace::Other(InternedString::get_or_intern("foo"));
        let bar = Namespace::Other(InternedString::get_or_intern("bar"));

        assert_eq!(unify_namespaces(Namespace::Asterisk, foo), Some(foo));
        assert_eq!(unify_namespaces(foo, Namespace::Asterisk), Some(foo));
        assert_eq!(unify_namespaces(foo, foo), Some(foo));
        assert_eq!(unify_namespaces(foo, bar), None);
        assert_eq!(unify_namespaces(Namespace::None, Namespace::Empty), None);
    }

    #[test]
    fn specificity_sums_ranges() {
        let total: Specificity = vec![Specificity::exact(1), Specificity::new(1000, 1_000_000)]
            .into_iter()
            .sum();

        assert_eq!(total, Specificity::new(1001, 1_000_001));
        assert_eq!(total.to_string(), "1001..1000001");
    }
}
