//! Storage layer for Strata
//!
//! This crate defines the [`PersistentStore`] contract the document store
//! relies on, plus the engines that satisfy it:
//! - [`MemoryStore`]: BTreeMap behind a RwLock, no disk I/O
//! - [`RedbStore`]: single-process redb file, handle held open
//! - [`SharedRedbStore`]: redb file opened per operation so several
//!   processes can take turns on the same directory
//!
//! Keys and values are strings. Values are opaque to this layer; the
//! document store encodes them before they arrive here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod disk;
pub mod memory;

#[cfg(test)]
mod conformance;

pub use disk::{RedbStore, SharedRedbStore};
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors reported by a storage engine
#[derive(Debug, Error)]
pub enum StorageError {
    /// The engine rejected the operation
    #[error("backend error: {0}")]
    Backend(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Another process kept the engine file locked past the retry budget
    #[error("store locked: {0}")]
    Locked(String),
}

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// One staged mutation inside a [`WriteBatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Insert or overwrite a key
    Put {
        /// Target key
        key: String,
        /// Encoded value
        value: String,
    },
    /// Remove a key
    Delete {
        /// Target key
        key: String,
    },
}

/// Ordered list of mutations committed atomically by [`PersistentStore::commit`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a put
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.ops.push(BatchOp::Put {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Stage a delete
    pub fn delete(&mut self, key: impl Into<String>) {
        self.ops.push(BatchOp::Delete { key: key.into() });
    }

    /// Number of staged operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True when nothing is staged
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Staged operations in order
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }
}

impl IntoIterator for WriteBatch {
    type Item = BatchOp;
    type IntoIter = std::vec::IntoIter<BatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// Ordered, persistent key-value engine
///
/// # Contract
///
/// - `commit` applies every staged operation or none of them.
/// - `scan` returns records in ascending key order, starting strictly
///   after `after` (or at the first key when `after` is `None`), at most
///   `limit` of them. Callers page through the keyspace by passing the
///   last key they received; an empty page means the scan is complete.
/// - `clear` removes every key.
///
/// Implementations are blocking; async callers move them onto a blocking
/// thread.
pub trait PersistentStore: Send + Sync {
    /// Read one key
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or overwrite one key
    fn put(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove one key; removing a missing key succeeds
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Apply a batch atomically
    fn commit(&self, batch: WriteBatch) -> StorageResult<()>;

    /// Read the next page of records in key order
    fn scan(&self, after: Option<&str>, limit: usize) -> StorageResult<Vec<(String, String)>>;

    /// Remove every key
    fn clear(&self) -> StorageResult<()>;
}
