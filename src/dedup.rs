//! Query-time deduplication of payload values.
//!
//! A single geometry is usually inserted at several cells (its covering has
//! many cells), and the same value may be inserted more than once at one
//! cell. Both stab and mask walk several nodes, so the values they see are
//! collected into a [`ResultSet`] keyed by payload equality, which is then
//! materialized in arbitrary order.
//!
//! Result sets borrow from the tree and live only for a single query.

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Set of values collected by one query.
pub struct ResultSet<'a, V> {
    seen: FxHashSet<&'a V>,
}

impl<'a, V: Eq + Hash> ResultSet<'a, V> {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self {
            seen: FxHashSet::default(),
        }
    }

    /// Add every value of a node.
    pub fn extend(&mut self, values: &'a [V]) {
        self.seen.extend(values.iter());
    }

    /// Materialize as borrowed values.
    pub fn into_refs(self) -> Vec<&'a V> {
        self.seen.into_iter().collect()
    }

    /// Materialize as owned values.
    pub fn into_values(self) -> Vec<V>
    where
        V: Clone,
    {
        self.seen.into_iter().cloned().collect()
    }
}

impl<V: Eq + Hash> Default for ResultSet<'_, V> {
    fn default() -> Self {
        Self::new()
    }
}
