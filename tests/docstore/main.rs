//! Document Store Integration Test Suite
//!
//! Exercises the public `DocumentStore` surface end to end over the
//! in-memory engine, the redb engines, and a fault-injecting engine.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test docstore
//!
//! # Run array mutation tests only
//! cargo test --test docstore arrays::
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::json;
use stratadoc::prelude::*;
use stratadoc::{MemoryStore, PersistentStore, StorageError, WriteBatch};
use tempfile::TempDir;

// Test modules
pub mod arrays;
pub mod query;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Route `tracing` output through the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Create an in-memory store with the default cache
pub fn ephemeral() -> DocumentStore {
    init_tracing();
    DocumentStore::ephemeral()
}

/// Create an in-memory store with the given cache setting, sharing the engine
pub fn over_memory(cache: CacheConfig) -> (DocumentStore, Arc<MemoryStore>) {
    init_tracing();
    let backend = Arc::new(MemoryStore::new());
    let store = DocumentStore::with_backend(backend.clone(), cache);
    (store, backend)
}

/// Open a disk-backed store named `name` under `dir`
pub async fn on_disk(dir: &TempDir, name: &str) -> DocumentStore {
    init_tracing();
    DocumentStore::builder()
        .name(name)
        .path(dir.path())
        .open()
        .await
        .expect("failed to open disk store")
}

/// Shorthand for building documents from JSON literals
pub fn doc(value: serde_json::Value) -> Value {
    Value::from(value)
}

/// Engine wrapper whose writes or scans can be made to fail on demand
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    fail_scans: AtomicBool,
}

impl FaultyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_scans(&self, on: bool) {
        self.fail_scans.store(on, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key).unwrap()
    }

    fn check(flag: &AtomicBool, what: &str) -> std::result::Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("injected {what} failure")));
        }
        Ok(())
    }
}

impl PersistentStore for FaultyStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.put(key, value)
    }

    fn delete(&self, key: &str) -> std::result::Result<(), StorageError> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.delete(key)
    }

    fn commit(&self, batch: WriteBatch) -> std::result::Result<(), StorageError> {
        Self::check(&self.fail_writes, "commit")?;
        self.inner.commit(batch)
    }

    fn scan(&self, after: Option<&str>, limit: usize) -> std::result::Result<Vec<(String, String)>, StorageError> {
        Self::check(&self.fail_scans, "scan")?;
        self.inner.scan(after, limit)
    }

    fn clear(&self) -> std::result::Result<(), StorageError> {
        Self::check(&self.fail_writes, "clear")?;
        self.inner.clear()
    }
}

/// Store over a [`FaultyStore`] with the given cache setting
pub fn faulty(cache: CacheConfig) -> (DocumentStore, Arc<FaultyStore>) {
    init_tracing();
    let backend = FaultyStore::new();
    let store = DocumentStore::with_backend(backend.clone(), cache);
    (store, backend)
}
