//! # Error Handling
//!
//! Error taxonomy shared by every GVP crate.
//!
//! ## Categories
//!
//! 1. **Client errors**: the caller sent something the engine cannot accept
//!    (wrong dimension, empty vector, unknown id). Safe to surface verbatim.
//! 2. **Internal errors**: an invariant was violated. Callers only ever see a
//!    generic message for these.
//! 3. **Ambient errors**: configuration and file I/O at the edges.

use thiserror::Error;

/// Result type alias for GVP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Primary error type for GVP
#[derive(Error, Debug)]
pub enum Error {
    // Vector Errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vector must have at least one component")]
    EmptyVector,

    #[error("Cosine is undefined for a zero-magnitude vector")]
    DegenerateVector,

    // Store Errors
    #[error("Vector not found: {id}")]
    NotFound { id: String },

    #[error("Index holds no vectors")]
    EmptyStore,

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Internal inconsistency: {message}")]
    InternalInconsistency { message: String },

    // System Errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {message}")]
    Io { message: String, source: std::io::Error },
}

impl Error {
    /// Whether the caller can act on this error as-is.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::DimensionMismatch { .. }
                | Error::EmptyVector
                | Error::DegenerateVector
                | Error::NotFound { .. }
                | Error::EmptyStore
                | Error::InvalidArgument { .. }
        )
    }

    /// Get error code for monitoring and transport mapping
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Error::EmptyVector => "EMPTY_VECTOR",
            Error::DegenerateVector => "DEGENERATE_VECTOR",
            Error::NotFound { .. } => "NOT_FOUND",
            Error::EmptyStore => "EMPTY_STORE",
            Error::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Error::InternalInconsistency { .. } => "INTERNAL_INCONSISTENCY",
            Error::Configuration { .. } => "CONFIG_ERROR",
            Error::Io { .. } => "IO_ERROR",
        }
    }

    /// Message suitable for an external caller. Internal details are
    /// replaced by a generic failure string.
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            "internal error".to_string()
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Error::InternalInconsistency { message: message.into() }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Extension trait for adding context to results
pub trait ResultExt<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e {
            Error::Io { message, source } => Error::Io {
                message: format!("{}: {}", f(), message),
                source,
            },
            Error::Configuration { message } => Error::Configuration {
                message: format!("{}: {}", f(), message),
            },
            other => other,
        })
    }
}
