//! Bounded least-recently-used document cache.
//!
//! Holds whole decoded documents keyed by store key. `get` and `set`
//! promote the touched entry; `has` does not. When an insert would exceed
//! capacity, the least recently used entry is evicted first.

use lru::LruCache;
use std::num::NonZeroUsize;
use strata_core::Value;
use tracing::trace;

/// Fixed-capacity LRU cache of documents.
pub struct BoundedCache {
    entries: LruCache<String, Value>,
}

impl BoundedCache {
    /// Create a cache holding at most `capacity` documents.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Whether `key` is resident, without touching its recency.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Look up `key` and mark it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert or replace `key`, evicting the least recently used entry if full.
    pub fn set(&mut self, key: &str, value: Value) {
        if let Some((evicted, _)) = self.entries.push(key.to_string(), value) {
            if evicted != key {
                trace!(key = %evicted, "evicted from cache");
            }
        }
    }

    /// Remove `key`, returning its document.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.entries.pop(key)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl std::fmt::Debug for BoundedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
