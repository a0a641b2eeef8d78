//! Bound handles over a document location.
//!
//! [`DocumentStore::observe`] binds a key and path and returns an
//! [`Observed`] handle holding a snapshot of the value there. Changes are
//! made explicitly through [`Observed::mutate`], which edits the snapshot
//! and writes the new field value at the joined path.

use crate::database::{parse_path, DocumentStore};
use crate::error::Result;
use strata_core::{set_at_path, DocPath, Value};

/// Handle bound to `(key, path)` in a store.
#[derive(Debug)]
pub struct Observed<'a> {
    store: &'a DocumentStore,
    key: String,
    path: DocPath,
    snapshot: Value,
}

impl DocumentStore {
    /// Bind a handle to the value at `key` (or `path` inside it).
    ///
    /// Returns `None` when nothing exists there.
    pub async fn observe(&self, key: &str, path: Option<&str>) -> Result<Option<Observed<'_>>> {
        let path = parse_path(path)?;
        let Some(snapshot) = self.get_at(key, &path).await else {
            return Ok(None);
        };
        Ok(Some(Observed {
            store: self,
            key: key.to_string(),
            path,
            snapshot,
        }))
    }
}

impl Observed<'_> {
    /// Bound key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Bound path.
    pub fn path(&self) -> &DocPath {
        &self.path
    }

    /// Current snapshot of the bound value.
    pub fn read(&self) -> &Value {
        &self.snapshot
    }

    /// Write `value` at `relative` beneath the bound location.
    ///
    /// An empty `relative` path replaces the bound value itself.
    pub async fn mutate(&mut self, relative: &str, value: Value) -> Result<()> {
        let relative: DocPath = relative.parse()?;
        set_at_path(&mut self.snapshot, &relative, value.clone())?;
        let target = self.path.join(&relative);
        self.store.set_at(&self.key, value, &target).await
    }

    /// Reload the snapshot from the store.
    ///
    /// Returns false, keeping the old snapshot, if the location no longer
    /// holds a value.
    pub async fn refresh(&mut self) -> bool {
        match self.store.get_at(&self.key, &self.path).await {
            Some(value) => {
                self.snapshot = value;
                true
            }
            None => false,
        }
    }
}
