//! redb-based storage layer for reservations
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `reservations` | `reservation_id` | `Reservation` (JSON) | Committed reservations |
//! | `day_index` | `(date, reservation_id)` | `()` | Per-day lookup and date-range deletes |
//! | `idempotency` | `scoped token` | `IdempotencyRecord` (JSON) | Replay of committed bookings |
//! | `day_config` | `"active"` | `DayConfig` (JSON) | The single active day |
//! | `admin` | `"pin_hash"` | argon2 PHC string | Persisted admin credential |
//!
//! # Write serialization
//!
//! redb admits exactly one write transaction at a time. Every booking commit
//! re-reads the day inside its write transaction, re-runs the admission checks
//! against that snapshot and only then inserts, so concurrent bookings on the
//! same slot are serialized by the database itself.

pub mod repository;

use redb::{Database, ReadTransaction, ReadableDatabase, TableDefinition, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::utils::{AppError, ErrorCode};

pub use repository::{AdminRepository, DayConfigRepository, ReservationRepository};

/// Reservations: key = reservation id, value = JSON-serialized Reservation
pub(crate) const RESERVATIONS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("reservations");

/// Day index: key = (date, reservation id), value = empty
pub(crate) const DAY_INDEX_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("day_index");

/// Idempotency tokens: key = owner-scoped token, value = JSON-serialized IdempotencyRecord
pub(crate) const IDEMPOTENCY_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("idempotency");

/// Day configuration singleton
pub(crate) const DAY_CONFIG_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("day_config");

/// Admin credential singleton
pub(crate) const ADMIN_TABLE: TableDefinition<&str, &str> = TableDefinition::new("admin");

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key collision while inserting
    #[error("Key conflict: {0}")]
    Conflict(String),

    /// Store temporarily unable to serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// How the booking engine should react to a storage failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFailure {
    /// Write collided with another write; retrying may succeed
    Conflict,
    /// Store is busy or briefly unreachable; retrying may succeed
    Transient,
    /// Retrying will not help
    Fatal,
}

impl StoreError {
    /// Classify the error for the commit retry policy
    pub fn failure(&self) -> StoreFailure {
        // 先按枚举变体精确匹配
        match self {
            StoreError::Conflict(_) => return StoreFailure::Conflict,
            StoreError::Unavailable(_) => return StoreFailure::Transient,
            StoreError::Serialization(_) => return StoreFailure::Fatal,
            _ => {}
        }

        // redb 错误通过字符串匹配分类
        let err_str = self.to_string().to_lowercase();

        // 磁盘空间不足 / 数据损坏
        if err_str.contains("no space")
            || err_str.contains("disk full")
            || err_str.contains("corrupt")
            || err_str.contains("invalid database")
        {
            return StoreFailure::Fatal;
        }

        // 默认：系统繁忙
        StoreFailure::Transient
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self.failure(), StoreFailure::Fatal)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err.failure() {
            StoreFailure::Fatal => {
                tracing::error!(error = %err, "Storage failure");
                AppError::database(err.to_string())
            }
            _ => {
                tracing::warn!(error = %err, "Storage temporarily unavailable");
                AppError::new(ErrorCode::TransientStoreError)
            }
        }
    }
}

/// Handle to the embedded database
#[derive(Clone)]
pub struct DbService {
    db: Arc<Database>,
}

impl DbService {
    /// Open or create the database at the given path
    ///
    /// Parent directories are created as needed. redb commits are durable as
    /// soon as `commit()` returns.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and ephemeral runs)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            // Create all tables if they don't exist
            let _ = write_txn.open_table(RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(DAY_INDEX_TABLE)?;
            let _ = write_txn.open_table(IDEMPOTENCY_TABLE)?;
            let _ = write_txn.open_table(DAY_CONFIG_TABLE)?;
            let _ = write_txn.open_table(ADMIN_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction
    pub fn begin_read(&self) -> StoreResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    /// Cheap liveness check for the health endpoint
    pub fn ping(&self) -> StoreResult<()> {
        let read_txn = self.begin_read()?;
        let _ = read_txn.open_table(DAY_CONFIG_TABLE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_and_ping() {
        let db = DbService::open_in_memory().unwrap();
        db.ping().unwrap();
    }

    #[test]
    fn test_open_on_disk_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database").join("courts.redb");
        let db = DbService::open(&path).unwrap();
        db.ping().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(
            StoreError::Conflict("dup".into()).failure(),
            StoreFailure::Conflict
        );
        assert_eq!(
            StoreError::Unavailable("busy".into()).failure(),
            StoreFailure::Transient
        );
        let bad_json = serde_json::from_slice::<u32>(b"x").unwrap_err();
        assert_eq!(
            StoreError::Serialization(bad_json).failure(),
            StoreFailure::Fatal
        );
        assert!(StoreError::Unavailable("busy".into()).is_retryable());
    }
}
