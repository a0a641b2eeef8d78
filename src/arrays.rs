//! Array mutations on documents and nested fields.
//!
//! Every operation loads the value at `path` (the whole document when
//! `path` is `None`). If that value is not an array the call returns
//! [`Edit::Skipped`] and storage is left untouched. Otherwise the edit is
//! applied in memory and the whole document is written back.
//!
//! | Operation | Edit | Returns |
//! |-----------|------|---------|
//! | `push` | append one element | `Applied(None)` |
//! | `pop` | remove last element | `Applied(removed)` |
//! | `shift` | remove first element | `Applied(removed)` |
//! | `unshift` | prepend one element | `Applied(None)` |
//! | `splice` | remove element at position | `Applied(removed)` |

use crate::database::{parse_path, validate_key, DocumentStore};
use crate::error::Result;
use strata_core::{get_at_path_mut, Value};
use tracing::debug;

/// Outcome of an array mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// The array was edited and the document persisted.
    ///
    /// Carries the removed element for `pop`, `shift` and `splice`.
    Applied(Option<Value>),
    /// The target was missing or not an array; nothing was written.
    Skipped,
}

impl Edit {
    /// Check if the edit reached storage.
    pub fn is_applied(&self) -> bool {
        matches!(self, Edit::Applied(_))
    }

    /// Check if the call was a no-op.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Edit::Skipped)
    }

    /// Removed element, if any.
    pub fn removed(self) -> Option<Value> {
        match self {
            Edit::Applied(removed) => removed,
            Edit::Skipped => None,
        }
    }
}

impl DocumentStore {
    /// Append `value` to the array at `path`.
    pub async fn push(&self, key: &str, value: Value, path: Option<&str>) -> Result<Edit> {
        self.edit_array(key, path, |items| {
            items.push(value);
            None
        })
        .await
    }

    /// Remove and return the last element of the array at `path`.
    pub async fn pop(&self, key: &str, path: Option<&str>) -> Result<Edit> {
        self.edit_array(key, path, Vec::pop).await
    }

    /// Remove and return the first element of the array at `path`.
    pub async fn shift(&self, key: &str, path: Option<&str>) -> Result<Edit> {
        self.edit_array(key, path, |items| {
            if items.is_empty() {
                None
            } else {
                Some(items.remove(0))
            }
        })
        .await
    }

    /// Prepend `item` to the array at `path`.
    pub async fn unshift(&self, key: &str, item: Value, path: Option<&str>) -> Result<Edit> {
        self.edit_array(key, path, |items| {
            items.insert(0, item);
            None
        })
        .await
    }

    /// Remove the element at `position` of the array at `path`.
    ///
    /// Negative positions count from the end (`-1` is the last element).
    /// A position outside the array removes nothing; the document is still
    /// written back.
    pub async fn splice(&self, key: &str, position: i64, path: Option<&str>) -> Result<Edit> {
        self.edit_array(key, path, |items| {
            resolve_position(position, items.len()).map(|idx| items.remove(idx))
        })
        .await
    }

    /// Membership test on the array or string at `path`.
    ///
    /// Arrays compare elements structurally; strings test for a substring
    /// and never contain a non-string needle. Returns `None` when the target
    /// is missing or is neither an array nor a string.
    pub async fn includes(
        &self,
        key: &str,
        needle: &Value,
        path: Option<&str>,
    ) -> Result<Option<bool>> {
        let found = match self.get(key, path).await? {
            Some(Value::Array(items)) => Some(items.contains(needle)),
            Some(Value::String(text)) => Some(needle.as_str().is_some_and(|n| text.contains(n))),
            _ => None,
        };
        Ok(found)
    }

    async fn edit_array<F>(&self, key: &str, path: Option<&str>, edit: F) -> Result<Edit>
    where
        F: FnOnce(&mut Vec<Value>) -> Option<Value>,
    {
        validate_key(key)?;
        let path = parse_path(path)?;
        let Some(mut doc) = self.load(key).await else {
            return Ok(Edit::Skipped);
        };
        let Some(Value::Array(items)) = get_at_path_mut(&mut doc, &path) else {
            debug!(key, path = %path, "array edit skipped, target is not an array");
            return Ok(Edit::Skipped);
        };

        let removed = edit(items);
        self.store_document(key, doc).await?;
        Ok(Edit::Applied(removed))
    }
}

fn resolve_position(position: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let idx = if position < 0 { len + position } else { position };
    if (0..len).contains(&idx) {
        usize::try_from(idx).ok()
    } else {
        None
    }
}
