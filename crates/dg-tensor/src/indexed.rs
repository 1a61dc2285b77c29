use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use dg_core::{DgError, ErrorInfo};
use dg_sym::{Expr, Symbol};

use crate::index::IntoMultiIndex;

/// Sparse map from fixed-length index tuples to nonzero expressions.
///
/// A zero value is never stored: writing zero removes the entry, so
/// [`IndexedObject::len`] counts the nonzero components.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedObject {
    values: BTreeMap<Vec<usize>, Expr>,
    names: Arc<BTreeMap<Symbol, usize>>,
    rank: usize,
}

impl IndexedObject {
    /// Creates an empty object of `rank` over the coordinates in `names`.
    pub fn new(names: Arc<BTreeMap<Symbol, usize>>, rank: usize) -> Self {
        Self {
            values: BTreeMap::new(),
            names,
            rank,
        }
    }

    /// Number of index slots.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Range of every slot.
    pub fn dims(&self) -> usize {
        self.names.len()
    }

    /// Coordinate name to position map shared with the owning manifold.
    pub fn names(&self) -> &Arc<BTreeMap<Symbol, usize>> {
        &self.names
    }

    /// Translates a mixed name/position index into positions.
    pub fn translate(&self, index: impl IntoMultiIndex) -> Result<Vec<usize>, DgError> {
        let slots = index.into_indices();
        if slots.len() != self.rank {
            return Err(DgError::Lookup(
                ErrorInfo::new("index-arity", "index tuple length differs from rank")
                    .with_context("expected", self.rank)
                    .with_context("found", slots.len()),
            ));
        }
        slots.iter().map(|slot| slot.resolve(&self.names)).collect()
    }

    /// Value at `index`, or zero when nothing is stored there.
    pub fn get(&self, index: impl IntoMultiIndex) -> Result<Expr, DgError> {
        let key = self.translate(index)?;
        Ok(self.at(&key))
    }

    /// Stores `value` at `index`; a zero value deletes the entry.
    pub fn set(&mut self, index: impl IntoMultiIndex, value: impl Into<Expr>) -> Result<(), DgError> {
        let key = self.translate(index)?;
        self.put(key, value.into());
        Ok(())
    }

    /// Number of stored (nonzero) entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when every component is zero.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored entries in lexicographic index order.
    pub fn entries(&self) -> impl Iterator<Item = (&[usize], &Expr)> + '_ {
        self.values.iter().map(|(key, value)| (key.as_slice(), value))
    }

    /// Re-normalizes every entry, dropping those that become zero.
    pub fn simplify(&mut self) {
        let values = std::mem::take(&mut self.values);
        for (key, value) in values {
            self.put(key, value.simplify());
        }
    }

    pub(crate) fn at(&self, key: &[usize]) -> Expr {
        self.values.get(key).cloned().unwrap_or_default()
    }

    pub(crate) fn stored(&self, key: &[usize]) -> Option<&Expr> {
        self.values.get(key)
    }

    pub(crate) fn put(&mut self, key: Vec<usize>, value: Expr) {
        if value.is_zero() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    /// Adds `value` onto the entry at `key`, removing it if the sum cancels.
    pub(crate) fn accumulate(&mut self, key: Vec<usize>, value: &Expr) {
        if value.is_zero() {
            return;
        }
        match self.values.entry(key) {
            Entry::Occupied(mut slot) => {
                let sum = slot.get() + value;
                if sum.is_zero() {
                    slot.remove();
                } else {
                    slot.insert(sum);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(value.clone());
            }
        }
    }
}
