//! # GVP Core
//!
//! This crate provides the fundamental building blocks for GVP:
//! - Error taxonomy
//! - Configuration
//! - Shared data types
//! - Operation counters
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    gvp-core                     │
//! ├─────────────────────────────────────────────────┤
//! │  • types   - Vector, QueryMatch, stats, names   │
//! │  • error   - Error taxonomy and codes           │
//! │  • config  - TOML configuration                 │
//! │  • metrics - Operation counters and timers      │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use types::{
    DistanceMetric, IndexStats, NamespaceStats, QueryMatch, UpdateMode, Vector, VectorId,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
