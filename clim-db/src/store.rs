//! Range queries over cached year records.
//!
//! The first query for a dataset loads the raw series, aggregates it and
//! persists every record in one transaction. Later queries, for any range,
//! read storage only. Loading is single-flight per dataset: callers that
//! arrive while a load is running await that load instead of starting their
//! own.

use crate::loader::RawSeriesLoader;
use crate::persistence::{MemoryStorage, Persistence};
use crate::SqliteStorage;
use clim_core::{ClimateError, DatasetType, YearRecord};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use tokio::sync::OnceCell;

/// Which backend a [`Store`] ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Persistent,
    /// Persistent storage was unavailable; records live for this session only.
    MemoryOnly,
}

/// Loaded-flags per dataset. A filled cell means the partition is populated.
type LoadFlags = HashMap<DatasetType, Rc<OnceCell<()>>>;

pub struct Store<L> {
    backend: Box<dyn Persistence>,
    loader: L,
    expected_version: u32,
    mode: StorageMode,
    loads: RefCell<LoadFlags>,
}

impl<L: RawSeriesLoader> Store<L> {
    /// Wrap an already opened backend.
    ///
    /// A partition that already holds records counts as loaded.
    pub fn new(
        backend: Box<dyn Persistence>,
        loader: L,
        expected_version: u32,
        mode: StorageMode,
    ) -> Result<Self, ClimateError> {
        let mut loads = HashMap::new();
        for dataset in DatasetType::ALL {
            let count = backend.count_all(dataset)?;
            let cell = if count > 0 {
                log::info!("[clim] store: {} already cached ({} years)", dataset, count);
                OnceCell::new_with(Some(()))
            } else {
                OnceCell::new()
            };
            loads.insert(dataset, Rc::new(cell));
        }
        Ok(Self {
            backend,
            loader,
            expected_version,
            mode,
            loads: RefCell::new(loads),
        })
    }

    /// Open a SQLite-backed store. `None` keeps the database in memory.
    pub fn open(db_path: Option<&Path>, version: u32, loader: L) -> Result<Self, ClimateError> {
        let storage = match db_path {
            Some(path) => SqliteStorage::open(path, version)?,
            None => SqliteStorage::open_in_memory(version)?,
        };
        Self::new(Box::new(storage), loader, version, StorageMode::Persistent)
    }

    /// Like [`Store::open`], but falls back to session-only memory storage
    /// when persistent storage is unsupported.
    pub fn open_or_degrade(
        db_path: Option<&Path>,
        version: u32,
        loader: L,
    ) -> Result<Self, ClimateError> {
        let storage = match db_path {
            Some(path) => SqliteStorage::open(path, version),
            None => SqliteStorage::open_in_memory(version),
        };
        match storage {
            Ok(storage) => Self::new(Box::new(storage), loader, version, StorageMode::Persistent),
            Err(ClimateError::StorageUnsupported(reason)) => {
                log::warn!(
                    "[clim] store: persistent storage unsupported ({}); caching in memory for this session",
                    reason
                );
                Self::new(
                    Box::new(MemoryStorage::new(version)),
                    loader,
                    version,
                    StorageMode::MemoryOnly,
                )
            }
            Err(e) => Err(e),
        }
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn is_loaded(&self, dataset: DatasetType) -> bool {
        self.loads
            .borrow()
            .get(&dataset)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    /// Cached records for `start..=end`, ascending by year.
    ///
    /// Loads and persists the dataset first if this session has not done so.
    pub async fn get_data(
        &self,
        start: i32,
        end: i32,
        dataset: DatasetType,
    ) -> Result<Vec<YearRecord>, ClimateError> {
        self.check_version()?;
        self.ensure_loaded(dataset).await?;
        self.backend.get_range(dataset, start, end)
    }

    /// Drop every cached partition and forget which datasets were loaded.
    pub fn invalidate(&self) -> Result<(), ClimateError> {
        self.backend.reset_all()?;
        let mut loads = self.loads.borrow_mut();
        for dataset in DatasetType::ALL {
            loads.insert(dataset, Rc::new(OnceCell::new()));
        }
        Ok(())
    }

    fn check_version(&self) -> Result<(), ClimateError> {
        let found = self.backend.schema_version()?;
        if found == self.expected_version {
            return Ok(());
        }
        log::warn!(
            "[clim] store: schema changed to v{} (expected v{}); cache invalidated",
            found,
            self.expected_version
        );
        self.invalidate()?;
        Err(ClimateError::StorageDeprecated {
            found,
            expected: self.expected_version,
        })
    }

    async fn ensure_loaded(&self, dataset: DatasetType) -> Result<(), ClimateError> {
        // clone the cell out so no RefCell borrow is held across the await
        let cell = self
            .loads
            .borrow_mut()
            .entry(dataset)
            .or_insert_with(|| Rc::new(OnceCell::new()))
            .clone();
        cell.get_or_try_init(|| self.load_from_source(dataset))
            .await?;
        Ok(())
    }

    async fn load_from_source(&self, dataset: DatasetType) -> Result<(), ClimateError> {
        log::info!("[clim] store: loading {} from source", dataset);
        let samples = self
            .loader
            .load_raw_series(dataset)
            .await
            .map_err(|e| ClimateError::data_unavailable(dataset, e))?;
        let records = clim_data::aggregation::aggregate(&samples);
        self.backend.bulk_put(dataset, &records)?;
        log::info!(
            "[clim] store: cached {} years of {} ({} samples)",
            records.len(),
            dataset,
            samples.len()
        );
        Ok(())
    }
}
