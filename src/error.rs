//! Unified error type for the document store.
//!
//! Read paths never produce errors for missing keys or unreadable records;
//! those surface as absence. The variants here cover caller mistakes and
//! failures on the write and scan paths.

use strata_core::PathError;
use strata_storage::StorageError;
use thiserror::Error;

/// All document store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Empty key passed to a mutating operation
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Path expression could not be parsed or applied
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// Store configuration rejected
    #[error("configuration error: {0}")]
    Config(String),

    /// Engine rejected a write, delete, commit or clear
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Engine failed while a scan was in progress
    #[error("scan failed: {0}")]
    Scan(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if the engine rejected a mutation.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// Check if a scan failed mid-iteration.
    pub fn is_scan(&self) -> bool {
        matches!(self, Error::Scan(_))
    }

    /// Check if the key was rejected.
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Error::InvalidKey(_))
    }

    /// Check if the path was rejected.
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Error::InvalidPath(_))
    }

    /// Reclassify an engine failure as a scan failure.
    pub(crate) fn into_scan(self) -> Self {
        match self {
            Error::Storage(e) => Error::Scan(e.to_string()),
            other => other,
        }
    }
}
