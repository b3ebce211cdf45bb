//! The partitioned key-value interface the store persists through.
//!
//! Each [`DatasetType`] names one partition mapping `year -> YearRecord`.
//! Backends also carry a schema version so the store can detect when the
//! persisted layout changed underneath it.

use clim_core::{ClimateError, DatasetType, YearRecord};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

pub trait Persistence {
    /// The schema version the backend is currently stamped with.
    fn schema_version(&self) -> Result<u32, ClimateError>;

    /// Number of records in a partition.
    fn count_all(&self, dataset: DatasetType) -> Result<usize, ClimateError>;

    /// Records with `start <= year <= end`, ascending by year.
    fn get_range(
        &self,
        dataset: DatasetType,
        start: i32,
        end: i32,
    ) -> Result<Vec<YearRecord>, ClimateError>;

    /// Write all records in one transaction, replacing existing years.
    fn bulk_put(&self, dataset: DatasetType, records: &[YearRecord]) -> Result<(), ClimateError>;

    /// Empty every partition.
    fn reset_all(&self) -> Result<(), ClimateError>;
}

type Partitions = BTreeMap<DatasetType, BTreeMap<i32, YearRecord>>;

/// Session-only storage used when no persistent backend is available.
///
/// Clones share the same partitions.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    partitions: Rc<RefCell<Partitions>>,
    version: Rc<Cell<u32>>,
}

impl MemoryStorage {
    pub fn new(version: u32) -> Self {
        Self {
            partitions: Rc::new(RefCell::new(BTreeMap::new())),
            version: Rc::new(Cell::new(version)),
        }
    }

    pub fn set_schema_version(&self, version: u32) {
        self.version.set(version);
    }
}

impl Persistence for MemoryStorage {
    fn schema_version(&self) -> Result<u32, ClimateError> {
        Ok(self.version.get())
    }

    fn count_all(&self, dataset: DatasetType) -> Result<usize, ClimateError> {
        Ok(self
            .partitions
            .borrow()
            .get(&dataset)
            .map(|p| p.len())
            .unwrap_or(0))
    }

    fn get_range(
        &self,
        dataset: DatasetType,
        start: i32,
        end: i32,
    ) -> Result<Vec<YearRecord>, ClimateError> {
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self
            .partitions
            .borrow()
            .get(&dataset)
            .map(|p| p.range(start..=end).map(|(_, r)| r.clone()).collect())
            .unwrap_or_default())
    }

    fn bulk_put(&self, dataset: DatasetType, records: &[YearRecord]) -> Result<(), ClimateError> {
        let mut partitions = self.partitions.borrow_mut();
        let partition = partitions.entry(dataset).or_default();
        for record in records {
            partition.insert(record.year, record.clone());
        }
        Ok(())
    }

    fn reset_all(&self) -> Result<(), ClimateError> {
        self.partitions.borrow_mut().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(year: i32) -> YearRecord {
        YearRecord {
            year,
            mean_value: 0,
            min_value: 0,
            max_value: 0,
            months: BTreeMap::new(),
        }
    }

    #[test]
    fn memory_range_is_inclusive() {
        let storage = MemoryStorage::new(1);
        let records: Vec<YearRecord> = (1990..=1999).map(record).collect();
        storage
            .bulk_put(DatasetType::Precipitation, &records)
            .unwrap();

        let got = storage
            .get_range(DatasetType::Precipitation, 1992, 1994)
            .unwrap();
        assert_eq!(
            got.iter().map(|r| r.year).collect::<Vec<_>>(),
            vec![1992, 1993, 1994]
        );
        assert!(storage
            .get_range(DatasetType::Precipitation, 1994, 1992)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn memory_clones_share_data_and_version() {
        let storage = MemoryStorage::new(1);
        let handle = storage.clone();
        storage
            .bulk_put(DatasetType::Temperature, &[record(1881)])
            .unwrap();
        handle.set_schema_version(7);
        assert_eq!(handle.count_all(DatasetType::Temperature).unwrap(), 1);
        assert_eq!(storage.schema_version().unwrap(), 7);

        handle.reset_all().unwrap();
        assert_eq!(storage.count_all(DatasetType::Temperature).unwrap(), 0);
    }
}
