use crate::dataset::DatasetType;
use serde::{Deserialize, Serialize};

/// First year covered by the bundled measurement series.
pub const FIRST_YEAR: i32 = 1881;

/// Last year covered by the bundled measurement series.
pub const LAST_YEAR: i32 = 2006;

/// A normalized request for cached records: `start_year <= end_year`,
/// both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeQuery {
    pub start_year: i32,
    pub end_year: i32,
    pub dataset: DatasetType,
}

impl RangeQuery {
    /// Build a query from two bounds in any order.
    pub fn normalized(a: i32, b: i32, dataset: DatasetType) -> Self {
        Self {
            start_year: a.min(b),
            end_year: a.max(b),
            dataset,
        }
    }

    /// Number of years covered, inclusive.
    pub fn len(&self) -> usize {
        (self.end_year - self.start_year + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end_year < self.start_year
    }
}

/// The inclusive span of years a dataset is known to cover.
///
/// Selectors offer exactly these years and navigation never leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl Default for YearBounds {
    fn default() -> Self {
        Self {
            min: FIRST_YEAR,
            max: LAST_YEAR,
        }
    }
}

impl YearBounds {
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }

    pub fn clamp(&self, year: i32) -> i32 {
        clim_utils::years::clamp_year(year, self.min, self.max)
    }

    /// Iterate every year in the bounds, e.g. to fill a selector.
    pub fn years(&self) -> YearIter {
        YearIter(self.min, self.max)
    }
}

/// Iterator that yields each year from the start through the end (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct YearIter(pub i32, pub i32);

impl Iterator for YearIter {
    type Item = i32;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let year = self.0;
            self.0 += 1;
            Some(year)
        } else {
            None
        }
    }
}
