//! Convenient imports for Stratadoc.
//!
//! ```ignore
//! use stratadoc::prelude::*;
//!
//! let store = DocumentStore::ephemeral();
//! store.set("key", Value::from("value"), None).await?;
//! ```

// Main entry point
pub use crate::database::{DocumentStore, DocumentStoreBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Configuration
pub use crate::config::{CacheConfig, StoreConfig};

// Operation results
pub use crate::arrays::Edit;
pub use crate::batch::DocumentBatch;
pub use crate::observe::Observed;

// Core types
pub use strata_core::{DocPath, Value, ValueMap};
