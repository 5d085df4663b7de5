//! # GVP Vector Index
//!
//! Exact, in-memory nearest-neighbor search over string-identified vectors.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Vector Index Layer                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │   Metric    │    │ QueryEngine │    │    Stats    │      │
//! │  │ (cos / L2)  │───►│  (top-k)    │    │  Collector  │      │
//! │  └─────────────┘    └─────────────┘    └─────────────┘      │
//! │                            │                  │             │
//! │                            └────────┬─────────┘             │
//! │                                     │ read lock             │
//! │                              ┌─────────────┐                │
//! │                              │ VectorStore │                │
//! │                              └─────────────┘                │
//! │                                                             │
//! │                    VectorIndex Trait                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `metric`: distance and similarity functions behind the `Metric` trait
//! - `store`: the id → vector map and its lock
//! - `query`: exact k-NN over one snapshot
//! - `stats`: count / dimension breakdowns
//! - `traits`: the `VectorIndex` contract

pub mod metric;
pub mod query;
pub mod stats;
pub mod store;
pub mod traits;

pub use metric::{
    cosine_distance, cosine_similarity, dot_product, euclidean_distance, norm, resolve,
    CosineDistance, CosineSimilarity, Direction, DotProduct, EuclideanDistance, Metric,
};

pub use query::QueryEngine;
pub use stats::StatsCollector;
pub use store::{Snapshot, VectorStore};
pub use traits::VectorIndex;
