use crate::unscale;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean of all samples that fell in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAggregate {
    pub month: u32,
    pub mean_value: i64,
}

/// Aggregated statistics for one calendar year of samples.
///
/// All values are fixed-point (see [`crate::VALUE_SCALE`]). `min_value` and
/// `max_value` are the extrema of the month means, so
/// `min_value <= mean_value <= max_value` always holds. `months` contains
/// exactly the months present in the source data; the first and last year of
/// a series may be partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: i32,
    pub mean_value: i64,
    pub min_value: i64,
    pub max_value: i64,
    pub months: BTreeMap<u32, MonthAggregate>,
}

impl YearRecord {
    pub fn month(&self, month: u32) -> Option<&MonthAggregate> {
        self.months.get(&month)
    }

    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    pub fn mean(&self) -> f64 {
        unscale(self.mean_value)
    }

    pub fn min(&self) -> f64 {
        unscale(self.min_value)
    }

    pub fn max(&self) -> f64 {
        unscale(self.max_value)
    }

    /// Check the ordering invariant between min, mean and max.
    pub fn is_consistent(&self) -> bool {
        self.min_value <= self.mean_value && self.mean_value <= self.max_value
    }
}
