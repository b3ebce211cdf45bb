//! Versioned cache of aggregated climate records.
//!
//! This crate owns everything between the raw data source and the chart:
//!
//! - [`loader`]: fetches raw measurement series (files, gzip, HTTP)
//! - [`persistence`]: the partitioned key-value interface plus an in-memory backend
//! - [`SqliteStorage`]: the SQLite backend (file or in-memory)
//! - [`store::Store`]: range queries with lazy, single-flight loading per dataset
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability on a single thread
//! - Schema version kept in `PRAGMA user_version`; a mismatch on open resets
//!   every partition
//! - Records are aggregated once per dataset and then served from storage
//!
//! # Usage
//!
//! ```rust
//! use clim_core::{DatasetType, RawSample};
//! use clim_db::persistence::Persistence;
//! use clim_db::SqliteStorage;
//!
//! let db = SqliteStorage::open_in_memory(clim_db::schema::SCHEMA_VERSION).unwrap();
//! let records = clim_data::aggregation::aggregate(&[
//!     RawSample::new(1990, 1, -120),
//!     RawSample::new(1990, 2, 80),
//! ]);
//! db.bulk_put(DatasetType::Temperature, &records).unwrap();
//!
//! let cached = db.get_range(DatasetType::Temperature, 1990, 1990).unwrap();
//! assert_eq!(cached.len(), 1);
//! ```

pub mod loader;
mod models;
pub mod persistence;
mod queries;
pub mod schema;
pub mod store;

pub use persistence::{MemoryStorage, Persistence};
pub use store::{StorageMode, Store};

use clim_core::ClimateError;
use rusqlite::Connection;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// SQLite-backed partition storage.
///
/// This struct is cheaply cloneable (via `Rc`); clones share one connection,
/// which is how the store and any diagnostics see the same data.
///
/// # Example
///
/// ```rust
/// use clim_db::SqliteStorage;
///
/// let db = SqliteStorage::open_in_memory(1).unwrap();
/// assert_eq!(db.user_version().unwrap(), 1);
/// ```
#[derive(Clone)]
pub struct SqliteStorage {
    conn: Rc<RefCell<Connection>>,
}

impl SqliteStorage {
    /// Open a private in-memory database stamped with `version`.
    pub fn open_in_memory(version: u32) -> Result<Self, ClimateError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ClimateError::StorageUnsupported(e.to_string()))?;
        Self::from_connection(conn, version)
    }

    /// Open (or create) a database file.
    ///
    /// A file that cannot be opened or read is reported as
    /// [`ClimateError::StorageUnsupported`]. A file stamped with a different
    /// schema version has all of its partitions dropped and recreated.
    pub fn open(path: &Path, version: u32) -> Result<Self, ClimateError> {
        let conn = Connection::open(path).map_err(|e| {
            ClimateError::StorageUnsupported(format!("{}: {}", path.display(), e))
        })?;
        Self::from_connection(conn, version)
    }

    fn from_connection(conn: Connection, version: u32) -> Result<Self, ClimateError> {
        let found: u32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(|e| ClimateError::StorageUnsupported(e.to_string()))?;

        if found != 0 && found != version {
            log::warn!(
                "[clim] storage: schema v{} found, expected v{}; resetting all partitions",
                found,
                version
            );
            conn.execute_batch(&schema::drop_schema())
                .map_err(ClimateError::storage)?;
        }
        conn.execute_batch(&schema::create_schema())
            .map_err(ClimateError::storage)?;
        conn.execute_batch(&format!("PRAGMA user_version = {}", version))
            .map_err(ClimateError::storage)?;

        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    /// Read the schema version currently stamped on the database.
    pub fn user_version(&self) -> Result<u32, ClimateError> {
        let conn = self.conn.borrow();
        conn.query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(ClimateError::storage)
    }

    /// Stamp a new schema version without touching the data.
    ///
    /// A running [`Store`] notices the change on its next query.
    pub fn set_user_version(&self, version: u32) -> Result<(), ClimateError> {
        let conn = self.conn.borrow();
        conn.execute_batch(&format!("PRAGMA user_version = {}", version))
            .map_err(ClimateError::storage)
    }
}
