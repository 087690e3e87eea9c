//! Request-scoped memo of relation slices.
//!
//! Entity lookups repeatedly slice the same rows and columns (an address's
//! inputs, a transaction's outputs). A `RequestCache` wraps a store for the
//! duration of one request and remembers every slice it hands out; it
//! borrows the store, so the store cannot be flushed while a cache is live
//! and no cached slice can go stale.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::chain::{RelationName, RelationStore};
use crate::graphblas::{GrBMatrix, GrBVector};
use crate::ids::Id;
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Axis {
    Row,
    Col,
}

type SliceKey = (RelationName, Axis, Id);

/// Memoizing view over a [`RelationStore`]
pub struct RequestCache<'s, S: RelationStore + ?Sized> {
    store: &'s S,
    slices: Mutex<HashMap<SliceKey, GrBVector<u64>>>,
}

impl<'s, S: RelationStore + ?Sized> RequestCache<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            slices: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct slices held
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every memoized slice
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SliceKey, GrBVector<u64>>> {
        // A panic mid-insert leaves the map consistent, so poisoning is ignored
        self.slices.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn slice(&self, name: RelationName, axis: Axis, id: Id) -> Result<GrBVector<u64>> {
        let key = (name, axis, id);
        if let Some(hit) = self.lock().get(&key) {
            return Ok(hit.clone());
        }
        let fresh = match axis {
            Axis::Row => self.store.row(name, id)?,
            Axis::Col => self.store.col(name, id)?,
        };
        self.lock().insert(key, fresh.clone());
        Ok(fresh)
    }
}

impl<S: RelationStore + ?Sized> RelationStore for RequestCache<'_, S> {
    fn relation(&self, name: RelationName) -> Result<&GrBMatrix<u64>> {
        self.store.relation(name)
    }

    fn row(&self, name: RelationName, id: Id) -> Result<GrBVector<u64>> {
        self.slice(name, Axis::Row, id)
    }

    fn col(&self, name: RelationName, id: Id) -> Result<GrBVector<u64>> {
        self.slice(name, Axis::Col, id)
    }
}
