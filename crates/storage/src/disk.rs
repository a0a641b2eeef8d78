//! redb-backed engines
//!
//! All documents live in one table, `documents`, keyed and valued by
//! `&str`. redb keeps keys ordered, so paged scans are plain range reads
//! in a fresh read transaction.
//!
//! | Engine | Handle | Processes |
//! |--------|--------|-----------|
//! | [`RedbStore`] | opened once, held | one |
//! | [`SharedRedbStore`] | opened per operation | many, serialized by the file lock |

use crate::{BatchOp, PersistentStore, StorageError, StorageResult, WriteBatch};
use redb::{Database, DatabaseError, ReadableTable, TableDefinition, TableError};
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const DOCUMENTS: TableDefinition<&str, &str> = TableDefinition::new("documents");

macro_rules! backend_error {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for StorageError {
                fn from(e: $err) -> Self {
                    StorageError::Backend(e.to_string())
                }
            }
        )*
    };
}

backend_error!(
    DatabaseError,
    TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError,
);

// =============================================================================
// Table operations shared by both engines
// =============================================================================

fn read_one(db: &Database, key: &str) -> StorageResult<Option<String>> {
    let txn = db.begin_read()?;
    let table = match txn.open_table(DOCUMENTS) {
        Ok(table) => table,
        Err(TableError::TableDoesNotExist(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(table.get(key)?.map(|guard| guard.value().to_string()))
}

fn write_ops(db: &Database, ops: impl IntoIterator<Item = BatchOp>) -> StorageResult<()> {
    let txn = db.begin_write()?;
    {
        let mut table = txn.open_table(DOCUMENTS)?;
        for op in ops {
            match op {
                BatchOp::Put { key, value } => {
                    table.insert(key.as_str(), value.as_str())?;
                }
                BatchOp::Delete { key } => {
                    table.remove(key.as_str())?;
                }
            }
        }
    }
    // Dropping an uncommitted transaction aborts it
    txn.commit()?;
    Ok(())
}

fn scan_page(db: &Database, after: Option<&str>, limit: usize) -> StorageResult<Vec<(String, String)>> {
    let txn = db.begin_read()?;
    let table = match txn.open_table(DOCUMENTS) {
        Ok(table) => table,
        Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let range = match after {
        Some(after) => table.range::<&str>((Bound::Excluded(after), Bound::Unbounded))?,
        None => table.range::<&str>(..)?,
    };

    let mut page = Vec::with_capacity(limit.min(1024));
    for entry in range.take(limit) {
        let (key, value) = entry?;
        page.push((key.value().to_string(), value.value().to_string()));
    }
    Ok(page)
}

fn drop_all(db: &Database) -> StorageResult<()> {
    let txn = db.begin_write()?;
    txn.delete_table(DOCUMENTS)?;
    txn.commit()?;
    Ok(())
}

fn put_op(key: &str, value: &str) -> BatchOp {
    BatchOp::Put {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn delete_op(key: &str) -> BatchOp {
    BatchOp::Delete {
        key: key.to_string(),
    }
}

fn ensure_parent(path: &Path) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

// =============================================================================
// RedbStore
// =============================================================================

/// Single-process engine holding the redb file open
///
/// A second open of the same file, from this or another process, fails
/// until this handle is dropped.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Open or create the engine file at `path`, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent(&path)?;
        let db = Database::create(&path)?;
        info!(path = %path.display(), "opened redb store");
        Ok(Self { db, path })
    }

    /// Location of the engine file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").field("path", &self.path).finish()
    }
}

impl PersistentStore for RedbStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        read_one(&self.db, key)
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        write_ops(&self.db, [put_op(key, value)])
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        write_ops(&self.db, [delete_op(key)])
    }

    fn commit(&self, batch: WriteBatch) -> StorageResult<()> {
        write_ops(&self.db, batch)
    }

    fn scan(&self, after: Option<&str>, limit: usize) -> StorageResult<Vec<(String, String)>> {
        scan_page(&self.db, after, limit)
    }

    fn clear(&self) -> StorageResult<()> {
        drop_all(&self.db)
    }
}

// =============================================================================
// SharedRedbStore
// =============================================================================

/// Backoff applied while another handle holds the engine file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Open attempts before giving up
    pub max_attempts: u32,
    /// Sleep after the first failed attempt
    pub initial_delay: Duration,
    /// Upper bound for the doubling sleep
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            initial_delay: Duration::from_millis(2),
            max_delay: Duration::from_millis(100),
        }
    }
}

/// Multi-process engine
///
/// Every operation opens the redb file, runs one transaction and closes
/// it again. While another process holds the file, opening is retried
/// according to the [`RetryPolicy`]; when the budget runs out the
/// operation fails with [`StorageError::Locked`].
#[derive(Debug, Clone)]
pub struct SharedRedbStore {
    path: PathBuf,
    retry: RetryPolicy,
}

impl SharedRedbStore {
    /// Prepare a shared engine at `path` with the default retry policy
    ///
    /// The file is created eagerly so configuration errors surface here.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::with_retry(path, RetryPolicy::default())
    }

    /// Prepare a shared engine with an explicit retry policy
    pub fn with_retry(path: impl AsRef<Path>, retry: RetryPolicy) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent(&path)?;
        let store = Self { path, retry };
        drop(store.connect()?);
        info!(path = %store.path.display(), "opened shared redb store");
        Ok(store)
    }

    /// Location of the engine file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> StorageResult<Database> {
        let mut delay = self.retry.initial_delay;
        for attempt in 1..=self.retry.max_attempts {
            match Database::create(&self.path) {
                Ok(db) => return Ok(db),
                Err(DatabaseError::DatabaseAlreadyOpen) => {
                    debug!(attempt, path = %self.path.display(), "store file busy, retrying");
                    std::thread::sleep(delay);
                    delay = (delay * 2).min(self.retry.max_delay);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(StorageError::Locked(self.path.display().to_string()))
    }
}

impl PersistentStore for SharedRedbStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        read_one(&self.connect()?, key)
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        write_ops(&self.connect()?, [put_op(key, value)])
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        write_ops(&self.connect()?, [delete_op(key)])
    }

    fn commit(&self, batch: WriteBatch) -> StorageResult<()> {
        write_ops(&self.connect()?, batch)
    }

    fn scan(&self, after: Option<&str>, limit: usize) -> StorageResult<Vec<(String, String)>> {
        scan_page(&self.connect()?, after, limit)
    }

    fn clear(&self) -> StorageResult<()> {
        drop_all(&self.connect()?)
    }
}
