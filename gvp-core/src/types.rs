//! # Core Types
//!
//! Plain data passed between the store, the query engine and the service.
//!
//! ## Type Design Philosophy
//!
//! 1. **Plain data**: no behavior beyond construction and naming
//! 2. **Serialization**: every type crosses the service boundary via serde
//! 3. **Stable names**: enum variants have kebab-case string forms used by
//!    configuration files and the CLI

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Vector identifier, opaque to the engine
pub type VectorId = String;

/// A stored vector: identifier plus fixed-dimension values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub id: VectorId,
    pub values: Vec<f32>,
}

impl Vector {
    pub fn new(id: impl Into<VectorId>, values: Vec<f32>) -> Self {
        Self { id: id.into(), values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}

/// One ranked entry of a k-NN query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: VectorId,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f32>>,
}

/// Built-in metrics, by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceMetric {
    /// Cosine similarity, higher is better
    #[default]
    Cosine,
    /// 1 - cosine similarity, lower is better
    CosineDistance,
    /// Euclidean (L2) distance, lower is better
    Euclidean,
    /// Raw dot product, higher is better
    DotProduct,
}

impl DistanceMetric {
    pub const ALL: [DistanceMetric; 4] = [
        DistanceMetric::Cosine,
        DistanceMetric::CosineDistance,
        DistanceMetric::Euclidean,
        DistanceMetric::DotProduct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::CosineDistance => "cosine-distance",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::DotProduct => "dot-product",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" | "cosine-similarity" => Ok(DistanceMetric::Cosine),
            "cosine-distance" => Ok(DistanceMetric::CosineDistance),
            "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
            "dot-product" | "dotproduct" => Ok(DistanceMetric::DotProduct),
            other => Err(Error::invalid_argument(format!("unknown metric: {}", other))),
        }
    }
}

/// How `update` treats an id that is not stored yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateMode {
    /// Same as upsert: create the entry
    #[default]
    ReplaceOrCreate,
    /// Fail with `NotFound`
    RequireExisting,
}

/// Statistics for a single store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NamespaceStats {
    pub vector_count: usize,
    pub dimension: Option<usize>,
}

/// Statistics across every namespace of a service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_vector_count: usize,
    /// Common dimension of all namespaces that adopted one; unset when none
    /// has or when they disagree.
    pub dimension: Option<usize>,
    pub namespaces: BTreeMap<String, NamespaceStats>,
}
