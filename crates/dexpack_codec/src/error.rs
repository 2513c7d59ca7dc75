//! Error types for codec collaborators.

use std::io;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur in codec collaborators.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Store error while serializing a pool.
    #[error("store error: {0}")]
    Store(#[from] dexpack_store::StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a valid container.
    #[error("invalid container: {message}")]
    InvalidContainer {
        /// Description of the problem.
        message: String,
    },

    /// The input ended before a complete container was parsed.
    #[error("unexpected end of container data")]
    UnexpectedEof,
}

impl CodecError {
    /// Creates an invalid container error.
    pub fn invalid_container(message: impl Into<String>) -> Self {
        Self::InvalidContainer {
            message: message.into(),
        }
    }
}
