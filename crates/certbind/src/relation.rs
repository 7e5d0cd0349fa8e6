//! Domain list comparison
//!
//! Gateway objects and the requested binding are both plain lists of
//! names. They are compared as multisets: order never matters, repetition
//! does.

use std::collections::HashMap;
use std::fmt;

/// How an existing SNI list relates to the desired domain list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// No name in common, or one side is empty
    Disjoint,
    /// Some names in common, but not the same multiset
    Partial,
    /// Same names with the same multiplicities
    Exact,
}

impl Relation {
    /// Classify `existing` against `desired`.
    ///
    /// Symmetric in its arguments.
    pub fn classify<A, B>(existing: &[A], desired: &[B]) -> Self
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        if existing.is_empty() || desired.is_empty() {
            return Self::Disjoint;
        }

        let mut remaining: HashMap<&str, usize> = HashMap::with_capacity(existing.len());
        for name in existing {
            *remaining.entry(name.as_ref()).or_insert(0) += 1;
        }

        let mut overlap = 0usize;
        for name in desired {
            if let Some(count) = remaining.get_mut(name.as_ref()) {
                if *count > 0 {
                    *count -= 1;
                    overlap += 1;
                }
            }
        }

        if existing.len() == desired.len() && overlap == existing.len() {
            Self::Exact
        } else if overlap > 0 {
            Self::Partial
        } else {
            Self::Disjoint
        }
    }

    pub fn is_exact(self) -> bool {
        self == Self::Exact
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disjoint => f.write_str("disjoint"),
            Self::Partial => f.write_str("partial"),
            Self::Exact => f.write_str("exact"),
        }
    }
}
