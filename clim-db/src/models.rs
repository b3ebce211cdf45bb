//! Row model for persisted year records.

use clim_core::{MonthAggregate, YearRecord};
use std::collections::BTreeMap;

/// A year record as stored in a partition table.
///
/// `months` holds the JSON encoding of the month map.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct YearRow {
    pub year: i32,
    pub mean_value: i64,
    pub min_value: i64,
    pub max_value: i64,
    pub months: String,
}

impl YearRow {
    pub fn from_record(record: &YearRecord) -> anyhow::Result<Self> {
        Ok(Self {
            year: record.year,
            mean_value: record.mean_value,
            min_value: record.min_value,
            max_value: record.max_value,
            months: serde_json::to_string(&record.months)?,
        })
    }

    pub fn into_record(self) -> anyhow::Result<YearRecord> {
        let months: BTreeMap<u32, MonthAggregate> = serde_json::from_str(&self.months)?;
        Ok(YearRecord {
            year: self.year,
            mean_value: self.mean_value,
            min_value: self.min_value,
            max_value: self.max_value,
            months,
        })
    }
}
