//! Error types for dexpack core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in dexpack core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] dexpack_store::StoreError),

    /// Codec collaborator error.
    #[error("codec error: {0}")]
    Codec(#[from] dexpack_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A single class overflows an empty segment on its own.
    #[error("class too large for an empty segment: {type_name}")]
    ClassTooLarge {
        /// The type name of the offending class.
        type_name: String,
    },

    /// Capacity ran out before the primary segment reached its required
    /// minimum class count.
    #[error("segment capacity exceeded while satisfying minimum class count: wrote {written} of {required}")]
    MinimumUnmet {
        /// Classes written when the overflow occurred.
        written: usize,
        /// The required minimum class count.
        required: usize,
    },

    /// Two container entries define the same type.
    #[error("duplicate type in merged container: {type_name}")]
    DuplicateType {
        /// The duplicated type name.
        type_name: String,
    },

    /// A container holds two entries under the same name.
    #[error("duplicate container entry name: {name}")]
    DuplicateEntryName {
        /// The duplicated entry name.
        name: String,
    },

    /// The operation was cancelled cooperatively.
    #[error("operation interrupted")]
    Interrupted,
}

impl CoreError {
    /// Creates a class too large error.
    pub fn class_too_large(type_name: impl Into<String>) -> Self {
        Self::ClassTooLarge {
            type_name: type_name.into(),
        }
    }

    /// Creates a minimum unmet error.
    pub fn minimum_unmet(written: usize, required: usize) -> Self {
        Self::MinimumUnmet { written, required }
    }

    /// Creates a duplicate type error.
    pub fn duplicate_type(type_name: impl Into<String>) -> Self {
        Self::DuplicateType {
            type_name: type_name.into(),
        }
    }

    /// Creates a duplicate entry name error.
    pub fn duplicate_entry_name(name: impl Into<String>) -> Self {
        Self::DuplicateEntryName { name: name.into() }
    }
}
