//! Error types for AtlasGraph
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::model::PropertyType;

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Unified error type for AtlasGraph operations
#[derive(Debug, Error)]
pub enum GraphError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: PropertyType,
        found: PropertyType,
    },

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl GraphError {
    /// True for the `NotFound` class, regardless of message
    pub fn is_not_found(&self) -> bool {
        matches!(self, GraphError::NotFound(_))
    }
}
