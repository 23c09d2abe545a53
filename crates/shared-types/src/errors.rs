//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors raised by persistence adapters (channel store, patch log,
/// transaction store).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Record not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected the write.
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    /// Backend unavailable or failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}
