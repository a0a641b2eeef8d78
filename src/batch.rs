//! Batched writes.
//!
//! A [`DocumentBatch`] updates the cache as each call is made but only
//! stages the matching engine mutation. [`DocumentBatch::write`] commits
//! everything staged in one atomic engine batch. If that commit fails the
//! cache is not rolled back and may hold documents that were never
//! persisted.
//!
//! ```ignore
//! let mut batch = store.batch();
//! batch.set("a", Value::from(1), None).await?;
//! batch.set("b", Value::object(), None).await?;
//! batch.set("b", Value::from("x"), Some("field")).await?;
//! batch.delete("old")?;
//! batch.write().await?;
//! ```

use crate::database::{parse_path, validate_key, DocumentStore};
use crate::error::Result;
use std::collections::HashMap;
use strata_core::{set_at_path, Value};
use strata_storage::WriteBatch;
use strata_wire::encode_value;
use tracing::debug;

/// Staged set of writes against one store.
///
/// Dropping the batch without calling [`write`](Self::write) discards the
/// staged engine mutations.
pub struct DocumentBatch<'a> {
    store: &'a DocumentStore,
    staged: WriteBatch,
    // Last staged state per key, `None` for a staged delete.
    docs: HashMap<String, Option<Value>>,
}

impl DocumentStore {
    /// Start a batch of writes.
    pub fn batch(&self) -> DocumentBatch<'_> {
        DocumentBatch {
            store: self,
            staged: WriteBatch::new(),
            docs: HashMap::new(),
        }
    }
}

impl<'a> DocumentBatch<'a> {
    /// Stage a write of `value` at `key` (or at `path` inside it).
    ///
    /// Path writes build on documents staged earlier in this batch.
    pub async fn set(&mut self, key: &str, value: Value, path: Option<&str>) -> Result<()> {
        validate_key(key)?;
        let path = parse_path(path)?;

        let doc = if path.is_root() {
            value
        } else {
            let mut doc = match self.docs.get(key) {
                Some(Some(staged)) => staged.clone(),
                Some(None) => Value::object(),
                None => self.store.load(key).await.unwrap_or_else(Value::object),
            };
            set_at_path(&mut doc, &path, value)?;
            doc
        };

        self.staged.put(key, encode_value(&doc));
        self.store.cache_put(key, doc.clone());
        self.docs.insert(key.to_string(), Some(doc));
        Ok(())
    }

    /// Stage a delete of `key`.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.staged.delete(key);
        self.store.cache_remove(key);
        self.docs.insert(key.to_string(), None);
        Ok(())
    }

    /// Number of staged mutations.
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// True when nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Commit every staged mutation atomically.
    pub async fn write(self) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }
        let ops = self.staged.len();
        let staged = self.staged;
        self.store
            .run_blocking(move |backend| backend.commit(staged))
            .await?;
        debug!(ops, "batch committed");
        Ok(())
    }
}

impl std::fmt::Debug for DocumentBatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentBatch")
            .field("staged", &self.staged.len())
            .finish()
    }
}
