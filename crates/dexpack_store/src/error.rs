//! Error types for store operations.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A sink was requested for a segment name that was already written.
    #[error("segment already written: {name}")]
    DuplicateSegment {
        /// The segment name that collided.
        name: String,
    },
}

impl StoreError {
    /// Creates a duplicate segment error.
    pub fn duplicate_segment(name: impl Into<String>) -> Self {
        Self::DuplicateSegment { name: name.into() }
    }
}
