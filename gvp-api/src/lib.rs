//! # GVP API
//!
//! Namespaced vector service over the GVP index engine.
//!
//! ```ignore
//! let service = VectorService::default();
//! service.upsert("", vec![Vector::new("a", vec![1.0, 0.0])])?;
//! let response = service.query("", QueryRequest::new(vec![1.0, 0.0], 5))?;
//! ```

pub mod service;

pub use service::{
    DeleteRequest, FetchResponse, QueryRequest, QueryResponse, UpsertResponse, VectorService,
};
