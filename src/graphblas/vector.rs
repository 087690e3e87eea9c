//! GraphBLAS Vector for Ledger Relations
//!
//! Sparse vector over the identifier space. Used as seed, frontier and
//! result accumulator: presence of an index means visited/selected.

use std::collections::BTreeMap;

use super::descriptor::Descriptor;
use super::sparse::SparseVec;
use super::types::{Element, GrBIndex, GrBMonoid, GrBType, INDEX_MAX};
use crate::Result;

/// GraphBLAS Vector
///
/// Entries iterate in ascending index order, which is what makes ANY
/// reductions deterministic.
#[derive(Clone, Debug, PartialEq)]
pub struct GrBVector<T> {
    storage: SparseVec<T>,
}

impl<T: Element> GrBVector<T> {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Create empty vector
    pub fn new(len: GrBIndex) -> Self {
        Self {
            storage: SparseVec::new(len),
        }
    }

    /// Create an empty vector spanning the whole identifier space
    pub fn maximal() -> Self {
        Self::new(INDEX_MAX)
    }

    /// Create from sparse entries
    pub fn from_entries<I>(len: GrBIndex, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (GrBIndex, T)>,
    {
        let mut v = Self::new(len);
        for (idx, val) in entries {
            v.set(idx, val)?;
        }
        Ok(v)
    }

    /// Create with the same value at every listed index
    pub fn from_indices<I>(len: GrBIndex, indices: I, value: T) -> Result<Self>
    where
        I: IntoIterator<Item = GrBIndex>,
    {
        Self::from_entries(len, indices.into_iter().map(|i| (i, value)))
    }

    /// Wrap entries already known to be in range
    pub(crate) fn from_map(len: GrBIndex, entries: BTreeMap<GrBIndex, T>) -> Self {
        debug_assert!(entries.keys().next_back().map_or(true, |&i| i < len));
        Self {
            storage: SparseVec { entries, len },
        }
    }

    // ========================================================================
    // PROPERTIES
    // ========================================================================

    /// Vector length
    pub fn len(&self) -> GrBIndex {
        self.storage.len
    }

    /// Number of present entries
    pub fn nvals(&self) -> usize {
        self.storage.nnz()
    }

    /// Element type
    pub fn dtype(&self) -> GrBType {
        T::DTYPE
    }

    /// Is empty?
    pub fn is_empty(&self) -> bool {
        self.nvals() == 0
    }

    // ========================================================================
    // ELEMENT ACCESS
    // ========================================================================

    /// Get element at index
    pub fn get(&self, idx: GrBIndex) -> Option<T> {
        self.storage.get(idx)
    }

    pub fn contains(&self, idx: GrBIndex) -> bool {
        self.storage.entries.contains_key(&idx)
    }

    /// Set element at index
    pub fn set(&mut self, idx: GrBIndex, value: T) -> Result<()> {
        self.storage.insert(idx, value)
    }

    /// Remove element at index
    pub fn remove(&mut self, idx: GrBIndex) -> Option<T> {
        self.storage.entries.remove(&idx)
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.storage.entries.clear();
    }

    // ========================================================================
    // ITERATION
    // ========================================================================

    /// Iterate over (index, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (GrBIndex, T)> + '_ {
        self.storage.iter()
    }

    /// Indices of present entries, ascending
    pub fn indices(&self) -> impl Iterator<Item = GrBIndex> + '_ {
        self.storage.entries.keys().copied()
    }

    /// Materialize as (index, value) pairs
    pub fn to_pairs(&self) -> Vec<(GrBIndex, T)> {
        self.iter().collect()
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Structural pattern: same positions, values dropped
    pub fn pattern(&self) -> GrBVector<bool> {
        self.apply(|_| true)
    }

    /// Apply unary operation
    pub fn apply<U, F>(&self, op: F) -> GrBVector<U>
    where
        U: Element,
        F: Fn(T) -> U,
    {
        self.apply_indexed(|_, v| op(v))
    }

    /// Apply an index-aware unary operation (`GxB_POSITIONI` style)
    pub fn apply_indexed<U, F>(&self, op: F) -> GrBVector<U>
    where
        U: Element,
        F: Fn(GrBIndex, T) -> U,
    {
        let mut result = GrBVector::new(self.len());
        result.storage.entries = self.iter().map(|(i, v)| (i, op(i, v))).collect();
        result
    }

    /// Element-wise addition: union of patterns, `op` where both are present
    pub fn ewise_add<F>(&self, other: &GrBVector<T>, op: F) -> GrBVector<T>
    where
        F: Fn(T, T) -> T,
    {
        let mut result = self.clone();
        for (idx, val) in other.iter() {
            let merged = match self.get(idx) {
                Some(existing) => op(existing, val),
                None => val,
            };
            result.storage.entries.insert(idx, merged);
        }
        result
    }

    /// Element-wise multiplication: intersection of patterns
    pub fn ewise_mult<U, V, F>(&self, other: &GrBVector<U>, op: F) -> GrBVector<V>
    where
        U: Element,
        V: Element,
        F: Fn(T, U) -> V,
    {
        let mut result = GrBVector::new(self.len());
        let (small, large_is_self) = if self.nvals() <= other.nvals() {
            (self.nvals(), false)
        } else {
            (other.nvals(), true)
        };
        if small == 0 {
            return result;
        }
        if large_is_self {
            for (idx, b) in other.iter() {
                if let Some(a) = self.get(idx) {
                    result.storage.entries.insert(idx, op(a, b));
                }
            }
        } else {
            for (idx, a) in self.iter() {
                if let Some(b) = other.get(idx) {
                    result.storage.entries.insert(idx, op(a, b));
                }
            }
        }
        result
    }

    /// Select elements matching predicate
    pub fn select<F>(&self, predicate: F) -> GrBVector<T>
    where
        F: Fn(GrBIndex, T) -> bool,
    {
        let mut result = GrBVector::new(self.len());
        result.storage.entries = self.iter().filter(|&(i, v)| predicate(i, v)).collect();
        result
    }

    /// Reduce to scalar; `None` for an empty vector
    pub fn reduce(&self, monoid: GrBMonoid) -> Option<T> {
        self.iter().map(|(_, v)| v).reduce(|a, b| T::combine(monoid, a, b))
    }

    /// Keep only elements the mask admits under `desc`
    pub fn apply_mask<M: Element>(&self, mask: &GrBVector<M>, desc: &Descriptor) -> GrBVector<T> {
        self.select(|idx, _| mask.admits(idx, desc))
    }

    /// Whether this vector, used as a mask, lets `idx` through
    pub fn admits(&self, idx: GrBIndex, desc: &Descriptor) -> bool {
        let hit = if desc.is_mask_structural() {
            self.contains(idx)
        } else {
            self.get(idx).is_some_and(Element::truthy)
        };
        hit != desc.is_mask_complemented()
    }
}
