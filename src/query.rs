//! Streaming iteration and queries.
//!
//! Everything here reads the engine's ordered scan directly and never
//! touches the cache. A [`Cursor`] pulls records page by page; dropping it
//! stops the scan. An engine failure during a scan fails the whole call
//! with [`Error::Scan`](crate::Error::Scan).
//!
//! | Operation | Result |
//! |-----------|--------|
//! | `keys` | every key, ascending |
//! | `values` | every decodable document |
//! | `entries` | `(key, document)` pairs |
//! | `to_array` | array of `[key, document]` pairs |
//! | `to_json` | map of key to document |
//! | `for_each` | callback per record |
//! | `size` | record count |
//! | `find` / `filter` | first match only, as a one-entry map |
//! | `search` | substring matches on key or stored text |
//! | `random` | one uniformly chosen entry |

use crate::database::DocumentStore;
use crate::error::Result;
use rand::Rng;
use std::collections::VecDeque;
use strata_core::{DocPath, Value, ValueMap};
use strata_wire::decode_value;
use tracing::warn;

/// Records fetched from the engine per scan call.
pub const SCAN_PAGE: usize = 256;

/// Lazy, restartable scan over a store in key order.
pub struct Cursor<'a> {
    store: &'a DocumentStore,
    after: Option<String>,
    page: VecDeque<(String, String)>,
    exhausted: bool,
}

impl<'a> Cursor<'a> {
    fn new(store: &'a DocumentStore) -> Self {
        Self {
            store,
            after: None,
            page: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Next raw `(key, stored text)` record.
    async fn next_record(&mut self) -> Result<Option<(String, String)>> {
        if self.page.is_empty() && !self.exhausted {
            let after = self.after.clone();
            let page = self
                .store
                .run_blocking(move |backend| backend.scan(after.as_deref(), SCAN_PAGE))
                .await
                .map_err(|e| e.into_scan())?;
            if page.len() < SCAN_PAGE {
                self.exhausted = true;
            }
            if let Some((last, _)) = page.last() {
                self.after = Some(last.clone());
            }
            self.page.extend(page);
        }
        Ok(self.page.pop_front())
    }

    /// Next key, whether or not its document decodes.
    pub async fn next_key(&mut self) -> Result<Option<String>> {
        Ok(self.next_record().await?.map(|(key, _)| key))
    }

    /// Next `(key, document)` pair, skipping records that do not decode.
    pub async fn next(&mut self) -> Result<Option<(String, Value)>> {
        while let Some((key, text)) = self.next_record().await? {
            if let Some(doc) = decode_record(&key, &text) {
                return Ok(Some((key, doc)));
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("after", &self.after)
            .field("buffered", &self.page.len())
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

fn decode_record(key: &str, text: &str) -> Option<Value> {
    match decode_value(text) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(key, error = %e, "skipping undecodable record");
            None
        }
    }
}

impl DocumentStore {
    /// Start a scan from the first key.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self)
    }

    /// Every key in ascending order.
    pub async fn keys(&self) -> Result<Vec<String>> {
        let mut cursor = self.cursor();
        let mut keys = Vec::new();
        while let Some(key) = cursor.next_key().await? {
            keys.push(key);
        }
        Ok(keys)
    }

    /// Every document in key order.
    pub async fn values(&self) -> Result<Vec<Value>> {
        Ok(self.entries().await?.into_iter().map(|(_, doc)| doc).collect())
    }

    /// Every `(key, document)` pair in key order.
    pub async fn entries(&self) -> Result<Vec<(String, Value)>> {
        let mut cursor = self.cursor();
        let mut entries = Vec::new();
        while let Some(entry) = cursor.next().await? {
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Every entry as a two-element `[key, document]` array.
    pub async fn to_array(&self) -> Result<Vec<Value>> {
        Ok(self
            .entries()
            .await?
            .into_iter()
            .map(|(key, doc)| Value::Array(vec![Value::String(key), doc]))
            .collect())
    }

    /// Whole store as a key-ordered map.
    pub async fn to_json(&self) -> Result<ValueMap> {
        Ok(self.entries().await?.into_iter().collect())
    }

    /// Call `f(key, document)` for every entry in key order.
    pub async fn for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&str, &Value),
    {
        let mut cursor = self.cursor();
        while let Some((key, doc)) = cursor.next().await? {
            f(&key, &doc);
        }
        Ok(())
    }

    /// Number of records, including ones that do not decode.
    pub async fn size(&self) -> Result<usize> {
        let mut cursor = self.cursor();
        let mut count = 0;
        while cursor.next_key().await?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    /// First entry, in key order, for which `predicate(document, key)` holds.
    ///
    /// The result is a one-entry map, or empty when nothing matches. The
    /// scan stops at the first match.
    pub async fn find<F>(&self, mut predicate: F) -> Result<ValueMap>
    where
        F: FnMut(&Value, &str) -> bool,
    {
        let mut cursor = self.cursor();
        let mut found = ValueMap::new();
        while let Some((key, doc)) = cursor.next().await? {
            if predicate(&doc, &key) {
                found.insert(key, doc);
                break;
            }
        }
        Ok(found)
    }

    /// Same as [`find`](Self::find): returns the first match only.
    pub async fn filter<F>(&self, predicate: F) -> Result<ValueMap>
    where
        F: FnMut(&Value, &str) -> bool,
    {
        self.find(predicate).await
    }

    /// Entries whose key or stored text contains `query`.
    ///
    /// Matching runs on the encoded record, before decoding. Strings that
    /// start with `:` carry their extra marker colon there, and every blob
    /// contains the `:binary:` marker, so `"::"` and `"binary"` can match
    /// values whose decoded text does not contain them.
    ///
    /// With `Some(limit)` the scan stops once more than `limit` matches have
    /// accumulated, so up to `limit + 1` entries come back. `None` and
    /// `Some(0)` return every match.
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<(String, Value)>> {
        let limit = limit.filter(|&n| n > 0);
        let mut cursor = self.cursor();
        let mut matches = Vec::new();
        while let Some((key, text)) = cursor.next_record().await? {
            if !key.contains(query) && !text.contains(query) {
                continue;
            }
            if let Some(doc) = decode_record(&key, &text) {
                matches.push((key, doc));
            }
            if limit.is_some_and(|n| matches.len() > n) {
                break;
            }
        }
        Ok(matches)
    }

    /// One entry chosen uniformly at random, or an empty map for an empty
    /// store.
    pub async fn random(&self) -> Result<ValueMap> {
        let mut keys = self.keys().await?;
        let mut picked = ValueMap::new();
        if keys.is_empty() {
            return Ok(picked);
        }
        let idx = rand::thread_rng().gen_range(0..keys.len());
        let key = keys.swap_remove(idx);
        if let Some(doc) = self.get_at(&key, &DocPath::root()).await {
            picked.insert(key, doc);
        }
        Ok(picked)
    }
}
