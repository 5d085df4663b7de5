//! # Vector Store
//!
//! The single source of truth: id → values plus the adopted dimension.
//!
//! ## Architecture
//! - One `RwLock` guards the map and the dimension together, so the
//!   dimension check-and-set is atomic with the insert it admits
//! - Mutations take the write lock and replace entries whole
//! - Reads, including a query's full scan, share the read lock
//! - Entries live in a `BTreeMap`, so enumeration is ordered by id

use std::collections::BTreeMap;

use parking_lot::{RwLock, RwLockReadGuard};

use gvp_core::error::{Error, Result};
use gvp_core::{NamespaceStats, QueryMatch, UpdateMode, Vector, VectorId};

use crate::metric::Metric;
use crate::query::QueryEngine;
use crate::traits::VectorIndex;

#[derive(Debug, Default)]
struct StoreState {
    dimension: Option<usize>,
    entries: BTreeMap<VectorId, Vec<f32>>,
}

impl StoreState {
    /// Validate `values` against `dimension` (or accept any non-empty length
    /// when none is adopted yet).
    fn check(dimension: Option<usize>, values: &[f32]) -> Result<()> {
        if values.is_empty() {
            return Err(Error::EmptyVector);
        }
        match dimension {
            Some(expected) if expected != values.len() => Err(Error::DimensionMismatch {
                expected,
                actual: values.len(),
            }),
            _ => Ok(()),
        }
    }

    fn put(&mut self, id: VectorId, values: Vec<f32>) {
        if self.dimension.is_none() {
            self.dimension = Some(values.len());
        }
        self.entries.insert(id, values);
    }
}

/// Map-backed exact vector store
#[derive(Debug, Default)]
pub struct VectorStore {
    update_mode: UpdateMode,
    state: RwLock<StoreState>,
}

impl VectorStore {
    /// Create an empty store with replace-or-create updates
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_update_mode(update_mode: UpdateMode) -> Self {
        Self {
            update_mode,
            state: RwLock::new(StoreState::default()),
        }
    }

    pub fn update_mode(&self) -> UpdateMode {
        self.update_mode
    }

    /// Insert a new vector or fully replace an existing one
    pub fn upsert(&self, id: impl Into<VectorId>, values: &[f32]) -> Result<()> {
        let mut state = self.state.write();
        StoreState::check(state.dimension, values)?;
        state.put(id.into(), values.to_vec());
        Ok(())
    }

    /// Reject a batch that no store could accept: an empty member, or members
    /// whose lengths disagree with the first one.
    pub fn check_batch(vectors: &[Vector]) -> Result<()> {
        let dimension = vectors.first().map(|v| v.values.len());
        vectors
            .iter()
            .try_for_each(|v| StoreState::check(dimension, &v.values))
    }

    /// Upsert a batch under one write lock. Either every vector is applied or
    /// none is. Within a batch, a later entry for the same id wins.
    pub fn upsert_batch(&self, vectors: Vec<Vector>) -> Result<usize> {
        let mut state = self.state.write();

        let dimension = state
            .dimension
            .or_else(|| vectors.first().map(|v| v.values.len()));
        for vector in &vectors {
            StoreState::check(dimension, &vector.values)?;
        }

        let count = vectors.len();
        for vector in vectors {
            state.put(vector.id, vector.values);
        }
        Ok(count)
    }

    /// Replace an existing vector. Under `UpdateMode::ReplaceOrCreate` this is
    /// an upsert; under `RequireExisting` a missing id is `NotFound`.
    pub fn update(&self, id: &str, values: &[f32]) -> Result<()> {
        let mut state = self.state.write();
        StoreState::check(state.dimension, values)?;

        if let Some(existing) = state.entries.get_mut(id) {
            *existing = values.to_vec();
            return Ok(());
        }
        if self.update_mode == UpdateMode::RequireExisting {
            return Err(Error::NotFound { id: id.to_string() });
        }
        state.put(id.to_string(), values.to_vec());
        Ok(())
    }

    /// Remove `id` if present. Deleting an absent id is not an error
    pub fn delete(&self, id: &str) -> bool {
        self.state.write().entries.remove(id).is_some()
    }

    /// Remove every listed id under one write lock; returns how many existed
    pub fn delete_many<S: AsRef<str>>(&self, ids: &[S]) -> usize {
        let mut state = self.state.write();
        let mut removed = 0;
        for id in ids {
            let id: &str = id.as_ref();
            if state.entries.remove(id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Remove every entry and forget the adopted dimension
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.entries.clear();
        state.dimension = None;
    }

    /// Get the stored values for `id`
    pub fn fetch(&self, id: &str) -> Result<Vec<f32>> {
        self.state
            .read()
            .entries
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    /// Number of vectors stored
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adopted dimension
    pub fn dimension(&self) -> Option<usize> {
        self.state.read().dimension
    }

    /// Copy of every entry, ordered by id
    pub fn enumerate(&self) -> Vec<(VectorId, Vec<f32>)> {
        self.state
            .read()
            .entries
            .iter()
            .map(|(id, values)| (id.clone(), values.clone()))
            .collect()
    }

    /// Hold the read lock and expose a consistent view of the store. The
    /// lock is released when the snapshot drops.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            guard: self.state.read(),
        }
    }
}

/// Read-locked view of a [`VectorStore`]
pub struct Snapshot<'a> {
    guard: RwLockReadGuard<'a, StoreState>,
}

impl<'a> Snapshot<'a> {
    pub fn dimension(&self) -> Option<usize> {
        self.guard.dimension
    }

    pub fn len(&self) -> usize {
        self.guard.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&[f32]> {
        self.guard.entries.get(id).map(Vec::as_slice)
    }

    /// Entries ordered by id
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> + '_ {
        self.guard
            .entries
            .iter()
            .map(|(id, values)| (id.as_str(), values.as_slice()))
    }
}

impl VectorIndex for VectorStore {
    fn upsert(&self, id: &str, values: &[f32]) -> Result<()> {
        VectorStore::upsert(self, id, values)
    }

    fn update(&self, id: &str, values: &[f32]) -> Result<()> {
        VectorStore::update(self, id, values)
    }

    fn delete(&self, id: &str) -> bool {
        VectorStore::delete(self, id)
    }

    fn fetch(&self, id: &str) -> Result<Vec<f32>> {
        VectorStore::fetch(self, id)
    }

    fn query(&self, query: &[f32], k: usize, metric: &dyn Metric) -> Result<Vec<QueryMatch>> {
        QueryEngine::new().query(self, query, k, metric)
    }

    fn len(&self) -> usize {
        VectorStore::len(self)
    }

    fn dimension(&self) -> Option<usize> {
        VectorStore::dimension(self)
    }

    fn enumerate(&self) -> Vec<(VectorId, Vec<f32>)> {
        VectorStore::enumerate(self)
    }

    fn stats(&self) -> NamespaceStats {
        let state = self.state.read();
        NamespaceStats {
            vector_count: state.entries.len(),
            dimension: state.dimension,
        }
    }
}
