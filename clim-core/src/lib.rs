//! Core types for the climate series chart.
//!
//! - [`dataset::DatasetType`]: the two measurement series and their identifiers
//! - [`sample::RawSample`]: one fixed-point measurement as it arrives from a loader
//! - [`record::YearRecord`]: yearly aggregate with per-month means, as cached
//! - [`range::RangeQuery`] / [`range::YearBounds`]: what the chart asks the store for
//! - [`error::ClimateError`]: the error taxonomy surfaced to the top-level draw

pub mod dataset;
pub mod error;
pub mod range;
pub mod record;
pub mod sample;

pub use dataset::DatasetType;
pub use error::ClimateError;
pub use range::{RangeQuery, YearBounds};
pub use record::{MonthAggregate, YearRecord};
pub use sample::RawSample;

/// Fixed-point scale applied to every measurement value.
///
/// Values are stored as hundredths so that summation happens in integer
/// space.
pub const VALUE_SCALE: i64 = 100;

/// Convert a scaled value back into measurement units.
pub fn unscale(value: i64) -> f64 {
    value as f64 / VALUE_SCALE as f64
}
