//! SQL schema definitions for the year-record cache.
//!
//! One table per dataset partition, keyed by year. The month aggregates are
//! kept as a JSON object in a single column since they are only ever read
//! back together with their year.

use clim_core::DatasetType;

/// Schema version stamped into `PRAGMA user_version`.
///
/// Bumping it invalidates every cached partition on the next open.
pub const SCHEMA_VERSION: u32 = 1;

/// Returns the full SQL schema as a single batch string.
///
/// Creates one table per [`DatasetType`] partition:
/// `year`, `mean_value`, `min_value`, `max_value` (fixed-point integers) and
/// `months` (JSON map of month number to month aggregate).
pub fn create_schema() -> String {
    DatasetType::ALL
        .iter()
        .map(|dataset| {
            format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    year INTEGER PRIMARY KEY,
                    mean_value INTEGER NOT NULL,
                    min_value INTEGER NOT NULL,
                    max_value INTEGER NOT NULL,
                    months TEXT NOT NULL
                );",
                dataset.partition()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the statements that drop every partition table.
pub fn drop_schema() -> String {
    DatasetType::ALL
        .iter()
        .map(|dataset| format!("DROP TABLE IF EXISTS {};", dataset.partition()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&create_schema())
            .expect("Schema SQL should be valid");
    }

    #[test]
    fn schema_creates_all_partitions() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&create_schema()).unwrap();

        for table in ["temperature", "precipitation"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table '{}' should exist", table);
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&create_schema()).unwrap();
        conn.execute_batch(&create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }

    #[test]
    fn drop_schema_removes_partitions() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&create_schema()).unwrap();
        conn.execute_batch(&drop_schema()).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
    }
}
