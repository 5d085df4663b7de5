//! # Index Statistics
//!
//! Aggregate statistics derived from store state. Holds nothing of its own.

use gvp_core::error::{Error, Result};
use gvp_core::{IndexStats, NamespaceStats};

use crate::traits::VectorIndex;

#[derive(Debug, Clone, Copy, Default)]
pub struct StatsCollector;

impl StatsCollector {
    pub fn new() -> Self {
        Self
    }

    /// Count and dimension of one index
    pub fn describe(&self, index: &dyn VectorIndex) -> Result<NamespaceStats> {
        let stats = index.stats();
        if stats.vector_count > 0 && stats.dimension.is_none() {
            return Err(Error::internal(format!(
                "index reports {} vectors without a dimension",
                stats.vector_count
            )));
        }
        Ok(stats)
    }

    /// Per-namespace breakdown plus totals. The top-level dimension is set
    /// only when every namespace that adopted one agrees on it.
    pub fn describe_namespaces<'a, I>(&self, namespaces: I) -> Result<IndexStats>
    where
        I: IntoIterator<Item = (&'a str, &'a dyn VectorIndex)>,
    {
        let mut out = IndexStats::default();
        let mut dimension: Option<usize> = None;
        let mut conflicting = false;

        for (name, index) in namespaces {
            let stats = self.describe(index)?;
            out.total_vector_count += stats.vector_count;
            match (dimension, stats.dimension) {
                (None, Some(d)) => dimension = Some(d),
                (Some(current), Some(d)) if current != d => conflicting = true,
                _ => {}
            }
            out.namespaces.insert(name.to_string(), stats);
        }

        out.dimension = if conflicting { None } else { dimension };
        Ok(out)
    }
}
