//! # Vector Index Traits
//!
//! The contract every index representation honors. The map-backed
//! [`VectorStore`](crate::store::VectorStore) is the exact implementation; an
//! accelerated one must return identical ranked output for the same inputs.

use gvp_core::error::Result;
use gvp_core::{NamespaceStats, QueryMatch, VectorId};

use crate::metric::Metric;

/// Vector index trait
pub trait VectorIndex: Send + Sync {
    /// Insert or fully replace the vector stored under `id`
    fn upsert(&self, id: &str, values: &[f32]) -> Result<()>;

    /// Replace the vector stored under `id`; whether a missing id is created
    /// or rejected depends on the index's update mode
    fn update(&self, id: &str, values: &[f32]) -> Result<()>;

    /// Remove `id` if present. Returns whether anything was removed
    fn delete(&self, id: &str) -> bool;

    /// Get vector by ID
    fn fetch(&self, id: &str) -> Result<Vec<f32>>;

    /// Search for the `k` best matches under `metric`
    fn query(&self, query: &[f32], k: usize, metric: &dyn Metric) -> Result<Vec<QueryMatch>>;

    /// Number of vectors in index
    fn len(&self) -> usize;

    /// Check if empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adopted dimension, unset until the first insert
    fn dimension(&self) -> Option<usize>;

    /// Every stored entry, ordered by id
    fn enumerate(&self) -> Vec<(VectorId, Vec<f32>)>;

    /// Count and dimension observed together
    fn stats(&self) -> NamespaceStats {
        NamespaceStats {
            vector_count: self.len(),
            dimension: self.dimension(),
        }
    }
}
