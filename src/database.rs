//! Main entry point for the document store.
//!
//! [`DocumentStore`] sits in front of a [`PersistentStore`] engine and a
//! private [`BoundedCache`]. Reads consult the cache first and fall back to
//! the engine; writes go to the cache and then to the engine before
//! returning.
//!
//! The whole document is always the unit of persistence: a path-scoped
//! write reads the full document, edits it in memory and writes the full
//! document back.
//!
//! # Concurrent writers
//!
//! Operations interleave at every await point and nothing serializes them.
//! Two concurrent path-scoped writes to the same key can both read the
//! same old document, and the later full-document write then drops the
//! earlier field change. Callers that issue concurrent field updates to one
//! key must serialize them themselves.

use crate::cache::BoundedCache;
use crate::config::{CacheConfig, StoreConfig};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::io::Cursor as ByteReader;
use std::path::Path;
use std::sync::Arc;
use strata_core::{get_at_path, set_at_path, DocPath, Value};
use strata_storage::{
    MemoryStore, PersistentStore, RedbStore, SharedRedbStore, StorageResult,
};
use strata_wire::{decode_value, encode_value};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info, warn};

/// Path-addressable document store.
///
/// # Example
///
/// ```ignore
/// use stratadoc::prelude::*;
///
/// let store = DocumentStore::builder().name("app").open().await?;
///
/// store.set("user:1", Value::object(), None).await?;
/// store.set("user:1", Value::from("Ada"), Some("profile.name")).await?;
/// store.push("user:1", Value::from("admin"), Some("roles")).await?;
///
/// let name = store.get("user:1", Some("profile.name")).await?;
/// ```
pub struct DocumentStore {
    backend: Arc<dyn PersistentStore>,
    cache: Option<Mutex<BoundedCache>>,
    config: StoreConfig,
}

impl DocumentStore {
    /// Open a store described by `config`.
    ///
    /// Creates `path/name/` if needed. `cluster = true` selects the
    /// multi-process engine.
    pub async fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let file = config.engine_file();
        let cluster = config.cluster;
        let backend: Arc<dyn PersistentStore> = tokio::task::spawn_blocking(
            move || -> StorageResult<Arc<dyn PersistentStore>> {
                if cluster {
                    Ok(Arc::new(SharedRedbStore::open(&file)?))
                } else {
                    Ok(Arc::new(RedbStore::open(&file)?))
                }
            },
        )
        .await
        .map_err(|e| Error::Internal(format!("open task failed: {e}")))??;

        info!(
            name = %config.name,
            dir = %config.store_dir().display(),
            cluster,
            cache = ?config.cache.capacity(),
            "opened document store"
        );
        Ok(Self::assemble(backend, config))
    }

    /// Create a store with no disk I/O.
    ///
    /// Data is lost when the store is dropped.
    pub fn ephemeral() -> Self {
        Self::with_backend(Arc::new(MemoryStore::new()), CacheConfig::default())
    }

    /// Create a store over a caller-supplied engine.
    pub fn with_backend(backend: Arc<dyn PersistentStore>, cache: CacheConfig) -> Self {
        let config = StoreConfig {
            cache,
            ..StoreConfig::new("custom")
        };
        Self::assemble(backend, config)
    }

    /// Create a builder for store configuration.
    pub fn builder() -> DocumentStoreBuilder {
        DocumentStoreBuilder::new()
    }

    fn assemble(backend: Arc<dyn PersistentStore>, config: StoreConfig) -> Self {
        let cache = match config.cache {
            CacheConfig::Disabled => None,
            CacheConfig::Bounded(capacity) => Some(Mutex::new(BoundedCache::new(capacity))),
        };
        Self {
            backend,
            cache,
            config,
        }
    }

    /// The configuration this store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of cached documents.
    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.lock().len())
    }

    /// Whether `key` is resident in the cache.
    pub fn is_cached(&self, key: &str) -> bool {
        self.cache.as_ref().is_some_and(|c| c.lock().has(key))
    }

    // =========================================================================
    // Point operations
    // =========================================================================

    /// Read the document at `key`, or the value at `path` inside it.
    ///
    /// Missing keys, missing path segments, unreadable records and engine
    /// read failures all resolve to `Ok(None)`. Only a malformed `path` is
    /// an error.
    pub async fn get(&self, key: &str, path: Option<&str>) -> Result<Option<Value>> {
        let path = parse_path(path)?;
        Ok(self.get_at(key, &path).await)
    }

    pub(crate) async fn get_at(&self, key: &str, path: &DocPath) -> Option<Value> {
        let doc = self.load(key).await?;
        if path.is_root() {
            Some(doc)
        } else {
            get_at_path(&doc, path).cloned()
        }
    }

    /// Write `value` as the document at `key`, or at `path` inside it.
    ///
    /// With a path, the current document (an empty map if none exists) is
    /// loaded, intermediate maps are created for missing segments, and the
    /// whole document is written back. The cache is updated before the
    /// engine; if the engine write fails the error is returned and the
    /// cache keeps the new document.
    pub async fn set(&self, key: &str, value: Value, path: Option<&str>) -> Result<()> {
        let path = parse_path(path)?;
        self.set_at(key, value, &path).await
    }

    pub(crate) async fn set_at(&self, key: &str, value: Value, path: &DocPath) -> Result<()> {
        validate_key(key)?;
        let doc = self.compose(key, value, path).await?;
        self.store_document(key, doc).await
    }

    /// Same as [`set`](Self::set) on the whole document.
    ///
    /// No existence check is made; callers wanting insert-only semantics
    /// must check [`has`](Self::has) first.
    pub async fn ensure(&self, key: &str, value: Value) -> Result<()> {
        self.set(key, value, None).await
    }

    /// Remove `key` from the cache and the engine.
    pub async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.cache_remove(key);
        let owned = key.to_string();
        self.run_blocking(move |backend| backend.delete(&owned)).await
    }

    /// True if `key` is cached, otherwise whether [`get`](Self::get) finds a value.
    ///
    /// A cached key reports true whatever `path` names.
    pub async fn has(&self, key: &str, path: Option<&str>) -> Result<bool> {
        let path = parse_path(path)?;
        if self.is_cached(key) {
            return Ok(true);
        }
        Ok(self.get_at(key, &path).await.is_some())
    }

    /// Remove every document from the cache and the engine.
    pub async fn clear(&self) -> Result<()> {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
        self.run_blocking(|backend| backend.clear()).await
    }

    // =========================================================================
    // Streaming values
    // =========================================================================

    /// Read `reader` to the end and store it at `key` (or `path`).
    ///
    /// UTF-8 input is stored as a string, anything else as bytes.
    pub async fn set_stream<R>(&self, key: &str, mut reader: R, path: Option<&str>) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        let value = match String::from_utf8(buf) {
            Ok(text) => Value::String(text),
            Err(e) => Value::Bytes(e.into_bytes()),
        };
        self.set(key, value, path).await
    }

    /// Open the value at `key` (or `path`) as an async byte reader.
    ///
    /// Strings and bytes are streamed raw; other values are streamed in
    /// their encoded text form.
    pub async fn get_stream(
        &self,
        key: &str,
        path: Option<&str>,
    ) -> Result<Option<ByteReader<Vec<u8>>>> {
        let Some(value) = self.get(key, path).await? else {
            return Ok(None);
        };
        let bytes = match value {
            Value::String(s) => s.into_bytes(),
            Value::Bytes(b) => b,
            other => encode_value(&other).into_bytes(),
        };
        Ok(Some(ByteReader::new(bytes)))
    }

    // =========================================================================
    // Internals shared by the other modules
    // =========================================================================

    /// Run a blocking engine call off the async executor.
    pub(crate) async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&dyn PersistentStore) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let outcome = tokio::task::spawn_blocking(move || op(backend.as_ref()))
            .await
            .map_err(|e| Error::Internal(format!("storage task failed: {e}")))?;
        Ok(outcome?)
    }

    /// Whole document for `key`: cache first, then the engine.
    ///
    /// Engine hits are cached. Failures are logged and reported as absence.
    pub(crate) async fn load(&self, key: &str) -> Option<Value> {
        if key.is_empty() {
            return None;
        }
        if let Some(doc) = self.cache_get(key) {
            return Some(doc);
        }

        let owned = key.to_string();
        let text = match self.run_blocking(move |backend| backend.get(&owned)).await {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "read failed, treating as absent");
                return None;
            }
        };

        match decode_value(&text) {
            Ok(doc) => {
                self.cache_put(key, doc.clone());
                Some(doc)
            }
            Err(e) => {
                warn!(key, error = %e, "stored document does not decode, treating as absent");
                None
            }
        }
    }

    /// Document that results from writing `value` at `path` under `key`.
    pub(crate) async fn compose(&self, key: &str, value: Value, path: &DocPath) -> Result<Value> {
        if path.is_root() {
            return Ok(value);
        }
        let mut doc = self.load(key).await.unwrap_or_else(Value::object);
        set_at_path(&mut doc, path, value)?;
        Ok(doc)
    }

    /// Write-through of a whole document.
    pub(crate) async fn store_document(&self, key: &str, doc: Value) -> Result<()> {
        let text = encode_value(&doc);
        self.cache_put(key, doc);
        let owned = key.to_string();
        self.run_blocking(move |backend| backend.put(&owned, &text))
            .await
            .map_err(|e| {
                debug!(key, error = %e, "write-through failed after cache update");
                e
            })
    }

    pub(crate) fn cache_get(&self, key: &str) -> Option<Value> {
        self.cache.as_ref()?.lock().get(key).cloned()
    }

    pub(crate) fn cache_put(&self, key: &str, doc: Value) {
        if let Some(cache) = &self.cache {
            cache.lock().set(key, doc);
        }
    }

    pub(crate) fn cache_remove(&self, key: &str) {
        if let Some(cache) = &self.cache {
            cache.lock().delete(key);
        }
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("config", &self.config)
            .field("cached", &self.cache_len())
            .finish()
    }
}

/// Parse an optional path; `None` and `""` address the whole document.
pub(crate) fn parse_path(path: Option<&str>) -> Result<DocPath> {
    Ok(path
        .map(str::parse::<DocPath>)
        .transpose()?
        .unwrap_or_default())
}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidKey("key must not be empty".to_string()));
    }
    Ok(())
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for store configuration.
///
/// # Example
///
/// ```ignore
/// // Single process, default cache of 1000 documents under ./data/app/
/// let store = DocumentStore::builder().name("app").open().await?;
///
/// // Shared between processes, no cache
/// let store = DocumentStore::builder()
///     .name("jobs")
///     .path("/var/lib/jobs")
///     .cluster(true)
///     .no_cache()
///     .open()
///     .await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentStoreBuilder {
    config: StoreConfig,
}

impl DocumentStoreBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Set the store name (required).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the storage root directory.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.path = path.as_ref().to_path_buf();
        self
    }

    /// Select the multi-process engine.
    pub fn cluster(mut self, cluster: bool) -> Self {
        self.config.cluster = cluster;
        self
    }

    /// Bound the cache to `max_size` documents; zero disables it.
    pub fn cache_size(mut self, max_size: usize) -> Self {
        self.config.cache = CacheConfig::bounded(max_size);
        self
    }

    /// Disable the cache.
    pub fn no_cache(mut self) -> Self {
        self.config.cache = CacheConfig::Disabled;
        self
    }

    /// Open the store.
    pub async fn open(self) -> Result<DocumentStore> {
        DocumentStore::open(self.config).await
    }
}
