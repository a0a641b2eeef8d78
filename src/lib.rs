//! # Stratadoc
//!
//! Path-addressable document store with an LRU cache in front of an
//! ordered key-value engine.
//!
//! Documents are JSON-like [`Value`]s, binary blobs included, stored under
//! string keys. Dot-separated paths address fields inside a document, and
//! array fields can be edited in place without rewriting them by hand.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stratadoc::prelude::*;
//!
//! let store = DocumentStore::builder().name("app").open().await?;
//!
//! store.set("haha", Value::from(serde_json::json!(["baba", ["mama", 12345]])), None).await?;
//! store.push("haha", Value::from("tail"), None).await?;
//! store.set("cfg", Value::from(true), Some("flags.beta")).await?;
//!
//! let first = store.find(|doc, _key| doc.as_str() == Some("target")).await?;
//! let hits = store.search("mama", Some(10)).await?;
//! ```
//!
//! ## Layers
//!
//! | Layer | Crate / module |
//! |-------|----------------|
//! | Value model and paths | `strata-core` |
//! | Binary-safe text encoding | `strata-wire` |
//! | Engine contract and engines | `strata-storage` |
//! | LRU cache | [`BoundedCache`] |
//! | Facade | [`DocumentStore`] |
//!
//! Reads go cache first and fall back to the engine. Writes update the
//! cache and then the engine before returning. Scans bypass the cache.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod arrays;
mod batch;
mod cache;
mod config;
mod database;
mod error;
mod observe;
mod query;

pub mod prelude;

pub use arrays::Edit;
pub use batch::DocumentBatch;
pub use cache::BoundedCache;
pub use config::{CacheConfig, StoreConfig, DEFAULT_CACHE_SIZE, DEFAULT_PATH, ENGINE_FILE};
pub use database::{DocumentStore, DocumentStoreBuilder};
pub use error::{Error, Result};
pub use observe::Observed;
pub use query::{Cursor, SCAN_PAGE};

pub use strata_core::{DocPath, PathError, PathSegment, Value, ValueMap};
pub use strata_storage::{MemoryStore, PersistentStore, StorageError, WriteBatch};
pub use strata_wire::DecodeError;
