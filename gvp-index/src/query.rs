//! # Query Engine (Exact k-NN)
//!
//! Scans every stored vector inside one store snapshot and keeps the best
//! `k` in a bounded heap.
//!
//! ## Ordering
//! - Score in the metric's direction (similarities descending, distances
//!   ascending)
//! - Equal scores: ascending id
//! - NaN scores rank after every number

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use gvp_core::error::{Error, Result};
use gvp_core::QueryMatch;

use crate::metric::{Direction, Metric};
use crate::store::{Snapshot, VectorStore};

/// Heap entry. `Less` means better, so the max-heap keeps the worst retained
/// candidate on top.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    id: &'a str,
    values: &'a [f32],
    score: f64,
    direction: Direction,
}

impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate<'_> {}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.direction
            .compare(self.score, other.score)
            .then_with(|| self.id.cmp(other.id))
    }
}

/// Bounded best-`k` selection
struct TopK<'a> {
    k: usize,
    heap: BinaryHeap<Candidate<'a>>,
}

impl<'a> TopK<'a> {
    fn new(k: usize, capacity_hint: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.min(capacity_hint) + 1),
        }
    }

    fn offer(&mut self, candidate: Candidate<'a>) {
        if self.heap.len() < self.k {
            self.heap.push(candidate);
            return;
        }
        // Full: only admit something better than the current worst
        if let Some(worst) = self.heap.peek() {
            if candidate < *worst {
                self.heap.pop();
                self.heap.push(candidate);
            }
        }
    }

    /// Best first
    fn into_sorted(self) -> Vec<Candidate<'a>> {
        self.heap.into_sorted_vec()
    }
}

/// Stateless reader that ranks a store's vectors against a query
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine;

impl QueryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Return the `k` best matches for `query` under `metric`
    pub fn query(
        &self,
        store: &VectorStore,
        query: &[f32],
        k: usize,
        metric: &dyn Metric,
    ) -> Result<Vec<QueryMatch>> {
        let snapshot = store.snapshot();
        self.rank(&snapshot, query, k, metric, false)
    }

    /// Like [`query`](Self::query), with each match carrying its stored values
    pub fn query_with_values(
        &self,
        store: &VectorStore,
        query: &[f32],
        k: usize,
        metric: &dyn Metric,
    ) -> Result<Vec<QueryMatch>> {
        let snapshot = store.snapshot();
        self.rank(&snapshot, query, k, metric, true)
    }

    /// Rank every entry of `snapshot`. The snapshot's read lock is held by the
    /// caller for the whole scan.
    pub fn rank(
        &self,
        snapshot: &Snapshot<'_>,
        query: &[f32],
        k: usize,
        metric: &dyn Metric,
        include_values: bool,
    ) -> Result<Vec<QueryMatch>> {
        if k == 0 {
            return Err(Error::invalid_argument("top_k must be positive"));
        }
        if let Some(expected) = snapshot.dimension() {
            if query.len() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }
        if snapshot.is_empty() {
            return Err(Error::EmptyStore);
        }
        let dimension = snapshot.dimension().ok_or_else(|| {
            Error::internal(format!(
                "store holds {} vectors but has no dimension",
                snapshot.len()
            ))
        })?;

        let direction = metric.direction();
        let mut top = TopK::new(k, snapshot.len());

        for (id, values) in snapshot.iter() {
            if values.len() != dimension {
                return Err(Error::internal(format!(
                    "stored vector {} has {} components, store dimension is {}",
                    id,
                    values.len(),
                    dimension
                )));
            }
            let score = metric.compute(query, values).map_err(|e| match e {
                // A zero-magnitude operand is a property of the data, not of
                // the store's invariants
                Error::DegenerateVector => Error::DegenerateVector,
                other => Error::internal(format!(
                    "{} could not score stored vector {}: {}",
                    metric.name(),
                    id,
                    other
                )),
            })?;
            top.offer(Candidate {
                id,
                values,
                score,
                direction,
            });
        }

        Ok(top
            .into_sorted()
            .into_iter()
            .map(|c| QueryMatch {
                id: c.id.to_string(),
                score: c.score,
                values: include_values.then(|| c.values.to_vec()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate<'a>(id: &'a str, score: f64, direction: Direction) -> Candidate<'a> {
        Candidate {
            id,
            values: &[],
            score,
            direction,
        }
    }

    #[test]
    fn test_candidate_ties_break_by_id() {
        let a = candidate("a", 0.5, Direction::LowerIsBetter);
        let b = candidate("b", 0.5, Direction::LowerIsBetter);
        assert!(a < b);
    }

    #[test]
    fn test_top_k_keeps_best() {
        let mut top = TopK::new(2, 5);
        for (id, score) in [("a", 3.0), ("b", 1.0), ("c", 2.0), ("d", 0.5), ("e", 9.0)] {
            top.offer(candidate(id, score, Direction::LowerIsBetter));
        }
        let ids: Vec<&str> = top.into_sorted().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["d", "b"]);
    }

    #[test]
    fn test_top_k_similarity_direction() {
        let mut top = TopK::new(3, 4);
        for (id, score) in [("a", 0.1), ("b", f64::NAN), ("c", 0.9), ("d", 0.9)] {
            top.offer(candidate(id, score, Direction::HigherIsBetter));
        }
        let ids: Vec<&str> = top.into_sorted().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["c", "d", "a"]);
    }
}
