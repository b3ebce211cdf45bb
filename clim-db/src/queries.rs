//! Typed partition queries against the SQLite backend.
//!
//! The inherent methods return `anyhow::Result`; the [`Persistence`] impl at
//! the bottom folds their errors into [`ClimateError::Storage`].

use crate::models::YearRow;
use crate::persistence::Persistence;
use crate::SqliteStorage;
use clim_core::{ClimateError, DatasetType, YearRecord};
use rusqlite::params;

impl SqliteStorage {
    /// Count the records cached for a dataset.
    pub fn query_count(&self, dataset: DatasetType) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", dataset.partition()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Get the cached records for `start..=end`, ordered by year.
    pub fn query_year_range(
        &self,
        dataset: DatasetType,
        start: i32,
        end: i32,
    ) -> anyhow::Result<Vec<YearRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT year, mean_value, min_value, max_value, months
             FROM {}
             WHERE year >= ?1 AND year <= ?2
             ORDER BY year",
            dataset.partition()
        ))?;
        let rows = stmt
            .query_map(params![start, end], |row| {
                Ok(YearRow {
                    year: row.get(0)?,
                    mean_value: row.get(1)?,
                    min_value: row.get(2)?,
                    max_value: row.get(3)?,
                    months: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let records = rows
            .into_iter()
            .map(YearRow::into_record)
            .collect::<anyhow::Result<Vec<_>>>()?;
        log::info!(
            "[clim] query: {} {}..={} returned {} records",
            dataset,
            start,
            end,
            records.len()
        );
        Ok(records)
    }

    /// Write records into a partition inside a single transaction.
    ///
    /// Existing rows for the same year are replaced.
    pub fn insert_records(
        &self,
        dataset: DatasetType,
        records: &[YearRecord],
    ) -> anyhow::Result<()> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT OR REPLACE INTO {} (year, mean_value, min_value, max_value, months)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                dataset.partition()
            ))?;
            for record in records {
                let row = YearRow::from_record(record)?;
                stmt.execute(params![
                    row.year,
                    row.mean_value,
                    row.min_value,
                    row.max_value,
                    row.months
                ])?;
            }
        }
        tx.commit()?;
        log::info!(
            "[clim] storage: wrote {} records to {}",
            records.len(),
            dataset
        );
        Ok(())
    }

    /// Remove every cached record from every partition.
    pub fn clear_partitions(&self) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        for dataset in DatasetType::ALL {
            conn.execute(&format!("DELETE FROM {}", dataset.partition()), [])?;
        }
        Ok(())
    }
}

impl Persistence for SqliteStorage {
    fn schema_version(&self) -> Result<u32, ClimateError> {
        self.user_version()
    }

    fn count_all(&self, dataset: DatasetType) -> Result<usize, ClimateError> {
        self.query_count(dataset).map_err(ClimateError::storage)
    }

    fn get_range(
        &self,
        dataset: DatasetType,
        start: i32,
        end: i32,
    ) -> Result<Vec<YearRecord>, ClimateError> {
        self.query_year_range(dataset, start, end)
            .map_err(ClimateError::storage)
    }

    fn bulk_put(&self, dataset: DatasetType, records: &[YearRecord]) -> Result<(), ClimateError> {
        self.insert_records(dataset, records)
            .map_err(ClimateError::storage)
    }

    fn reset_all(&self) -> Result<(), ClimateError> {
        self.clear_partitions().map_err(ClimateError::storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clim_core::RawSample;

    fn sample_records() -> Vec<YearRecord> {
        let mut samples = Vec::new();
        for year in 1990..=1994 {
            for month in 1..=12u32 {
                samples.push(RawSample::new(year, month, (year - 1990) as i64 * 100 + month as i64));
            }
        }
        clim_data::aggregation::aggregate(&samples)
    }

    #[test]
    fn range_is_inclusive_and_ordered() {
        let db = SqliteStorage::open_in_memory(1).unwrap();
        let mut records = sample_records();
        records.reverse();
        db.insert_records(DatasetType::Temperature, &records).unwrap();

        let got = db
            .query_year_range(DatasetType::Temperature, 1991, 1993)
            .unwrap();
        let years: Vec<i32> = got.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![1991, 1992, 1993]);
        assert_eq!(got[0].months.len(), 12);
    }

    #[test]
    fn partitions_are_independent() {
        let db = SqliteStorage::open_in_memory(1).unwrap();
        db.insert_records(DatasetType::Temperature, &sample_records())
            .unwrap();
        assert_eq!(db.query_count(DatasetType::Temperature).unwrap(), 5);
        assert_eq!(db.query_count(DatasetType::Precipitation).unwrap(), 0);
        assert!(db
            .query_year_range(DatasetType::Precipitation, 1990, 1994)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn insert_replaces_on_conflict() {
        let db = SqliteStorage::open_in_memory(1).unwrap();
        let mut records = sample_records();
        db.insert_records(DatasetType::Temperature, &records).unwrap();
        records[0].mean_value = 4242;
        records[0].max_value = 5000;
        db.insert_records(DatasetType::Temperature, &records[..1])
            .unwrap();

        assert_eq!(db.query_count(DatasetType::Temperature).unwrap(), 5);
        let got = db
            .query_year_range(DatasetType::Temperature, 1990, 1990)
            .unwrap();
        assert_eq!(got[0].mean_value, 4242);
    }

    #[test]
    fn clear_partitions_empties_everything() {
        let db = SqliteStorage::open_in_memory(1).unwrap();
        db.bulk_put(DatasetType::Temperature, &sample_records())
            .unwrap();
        db.bulk_put(DatasetType::Precipitation, &sample_records())
            .unwrap();
        db.reset_all().unwrap();
        for dataset in DatasetType::ALL {
            assert_eq!(db.count_all(dataset).unwrap(), 0);
        }
    }
}
