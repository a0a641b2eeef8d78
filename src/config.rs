//! Store configuration.
//!
//! | Option | Default | Meaning |
//! |--------|---------|---------|
//! | `name` | (required) | namespace; the store lives in `path/name/` |
//! | `path` | `./data/` | storage root directory |
//! | `cluster` | `false` | open the engine file per operation so several processes can share it |
//! | `cache` | 1000 entries | `false` disables, `true` or `{ max_size = N }` bounds it |
//!
//! ```
//! use stratadoc::{CacheConfig, StoreConfig};
//!
//! let config = StoreConfig::from_toml_str(r#"
//!     name = "sessions"
//!     path = "/var/lib/app"
//!     cache = { max_size = 64 }
//! "#).unwrap();
//! assert_eq!(config.cache.capacity(), Some(64));
//! assert!(!config.cluster);
//! ```

use crate::error::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Cache size used when caching is enabled without an explicit bound.
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Root directory used when none is configured.
pub const DEFAULT_PATH: &str = "./data/";

/// File name of the engine inside the store directory.
pub const ENGINE_FILE: &str = "documents.redb";

/// Document cache setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheConfig {
    /// Every read goes to the engine
    Disabled,
    /// LRU cache bounded to this many documents
    Bounded(NonZeroUsize),
}

impl CacheConfig {
    /// Bounded cache of `max_size` documents; zero disables caching.
    pub fn bounded(max_size: usize) -> Self {
        NonZeroUsize::new(max_size).map_or(CacheConfig::Disabled, CacheConfig::Bounded)
    }

    /// Capacity, or `None` when disabled.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            CacheConfig::Disabled => None,
            CacheConfig::Bounded(n) => Some(n.get()),
        }
    }

    fn enabled_default() -> Self {
        CacheConfig::bounded(DEFAULT_CACHE_SIZE)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig::enabled_default()
    }
}

impl<'de> Deserialize<'de> for CacheConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Table {
                #[serde(default, alias = "maxSize")]
                max_size: Option<usize>,
            },
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Ok(CacheConfig::Disabled),
            Raw::Flag(true) | Raw::Table { max_size: None } => Ok(CacheConfig::enabled_default()),
            Raw::Table {
                max_size: Some(n),
            } => NonZeroUsize::new(n)
                .map(CacheConfig::Bounded)
                .ok_or_else(|| D::Error::custom("cache max_size must be greater than zero")),
        }
    }
}

/// Configuration for opening a [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Namespace of the store inside `path`
    pub name: String,
    /// Storage root directory
    pub path: PathBuf,
    /// Multi-process access to the engine file
    pub cluster: bool,
    /// Document cache setting
    pub cache: CacheConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            path: PathBuf::from(DEFAULT_PATH),
            cluster: false,
            cache: CacheConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Defaults with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations that cannot be opened.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("no name provided".to_string()));
        }
        Ok(())
    }

    /// Directory holding this store's files.
    pub fn store_dir(&self) -> PathBuf {
        self.path.join(&self.name)
    }

    /// Location of the engine file.
    pub fn engine_file(&self) -> PathBuf {
        self.store_dir().join(ENGINE_FILE)
    }
}
