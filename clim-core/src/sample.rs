use crate::VALUE_SCALE;
use clim_utils::dates::{format_month_key, parse_month_key};
use serde::{Deserialize, Serialize};

/// A single measurement as delivered by a loader, in feed format.
///
/// Feeds publish `{"t": "YYYY-MM", "v": 12.34}` with `v` in real units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurement {
    pub t: String,
    pub v: f64,
}

/// One measurement in fixed-point form, ready for aggregation.
///
/// `value` is scaled by [`VALUE_SCALE`] (hundredths). Samples only live for
/// the duration of an aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    pub year: i32,
    pub month: u32,
    pub value: i64,
}

impl RawSample {
    pub fn new(year: i32, month: u32, value: i64) -> Self {
        Self { year, month, value }
    }

    /// Build a sample from a feed timestamp and a real-valued measurement.
    ///
    /// The value is scaled to hundredths, rounding half away from zero.
    pub fn from_measurement(timestamp: &str, value: f64) -> anyhow::Result<Self> {
        let (year, month) = parse_month_key(timestamp)?;
        if !value.is_finite() {
            anyhow::bail!("non-finite value {} at {}", value, timestamp);
        }
        Ok(Self {
            year,
            month,
            value: (value * VALUE_SCALE as f64).round() as i64,
        })
    }

    /// The `YYYY-MM` key this sample is grouped under.
    pub fn timestamp(&self) -> String {
        format_month_key(self.year, self.month)
    }

    /// Sort key used by the aggregator's ordering requirement.
    pub fn period(&self) -> (i32, u32) {
        (self.year, self.month)
    }
}

impl TryFrom<RawMeasurement> for RawSample {
    type Error = anyhow::Error;

    fn try_from(m: RawMeasurement) -> Result<Self, Self::Error> {
        RawSample::from_measurement(&m.t, m.v)
    }
}

impl TryFrom<&RawMeasurement> for RawSample {
    type Error = anyhow::Error;

    fn try_from(m: &RawMeasurement) -> Result<Self, Self::Error> {
        RawSample::from_measurement(&m.t, m.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_measurement_scales_value() {
        let s = RawSample::from_measurement("1881-01", -7.3).unwrap();
        assert_eq!(s, RawSample::new(1881, 1, -730));
        assert_eq!(s.timestamp(), "1881-01");
    }

    #[test]
    fn test_scaling_rounds_half_away_from_zero() {
        assert_eq!(RawSample::from_measurement("1900-01", 0.125).unwrap().value, 13);
        assert_eq!(RawSample::from_measurement("1900-01", -0.125).unwrap().value, -13);
    }

    #[test]
    fn test_try_from_wire_format() {
        let m: RawMeasurement = serde_json::from_str(r#"{"t":"1990-06","v":15.5}"#).unwrap();
        let s = RawSample::try_from(m).unwrap();
        assert_eq!(s, RawSample::new(1990, 6, 1550));
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        assert!(RawSample::from_measurement("1990/06", 1.0).is_err());
        assert!(RawSample::from_measurement("1990-06", f64::NAN).is_err());
    }
}
