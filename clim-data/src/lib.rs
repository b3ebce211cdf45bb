//! Data processing for climate measurements.
//!
//! This crate turns the raw monthly stream delivered by a loader into the
//! yearly records the store caches and the chart projects.

/// Fixed-point rounding helpers.
pub mod rounding {
    /// Integer division rounding half away from zero.
    ///
    /// `den` must be positive.
    pub fn div_round(num: i64, den: i64) -> i64 {
        debug_assert!(den > 0, "division by non-positive count");
        if num >= 0 {
            (2 * num + den) / (2 * den)
        } else {
            (2 * num - den) / (2 * den)
        }
    }

}

/// Single-pass reduction of raw samples into yearly records.
pub mod aggregation {
    use crate::rounding::div_round;
    use clim_core::{MonthAggregate, RawSample, YearRecord};
    use std::collections::BTreeMap;

    /// Running sum for the month currently being read.
    struct MonthAcc {
        month: u32,
        sum: i64,
        count: i64,
    }

    impl MonthAcc {
        fn start(sample: &RawSample) -> Self {
            Self {
                month: sample.month,
                sum: sample.value,
                count: 1,
            }
        }

        fn mean(&self) -> i64 {
            div_round(self.sum, self.count)
        }
    }

    /// Running state for the year currently being read.
    struct YearAcc {
        year: i32,
        months: BTreeMap<u32, MonthAggregate>,
        sum_of_means: i64,
        min: i64,
        max: i64,
    }

    impl YearAcc {
        fn start(year: i32) -> Self {
            Self {
                year,
                months: BTreeMap::new(),
                sum_of_means: 0,
                min: i64::MAX,
                max: i64::MIN,
            }
        }

        fn fold_month(&mut self, acc: &MonthAcc) {
            let mean_value = acc.mean();
            self.months.insert(
                acc.month,
                MonthAggregate {
                    month: acc.month,
                    mean_value,
                },
            );
            self.sum_of_means += mean_value;
            self.min = self.min.min(mean_value);
            self.max = self.max.max(mean_value);
        }

        fn finish(self) -> YearRecord {
            let count = self.months.len() as i64;
            YearRecord {
                year: self.year,
                mean_value: div_round(self.sum_of_means, count),
                min_value: self.min,
                max_value: self.max,
                months: self.months,
            }
        }
    }

    /// Reduce an ordered measurement stream into one record per year.
    ///
    /// `samples` must be sorted ascending by `(year, month)`; several samples
    /// per month are averaged. A year's mean is the rounded mean of its month
    /// means and its min/max are the extrema of those month means. Years with
    /// fewer than twelve months still produce a record.
    ///
    /// # Panics
    ///
    /// Panics if the samples are not ordered.
    pub fn aggregate(samples: &[RawSample]) -> Vec<YearRecord> {
        let mut records = Vec::new();
        let mut year_acc: Option<YearAcc> = None;
        let mut month_acc: Option<MonthAcc> = None;

        for sample in samples {
            if let Some(month) = month_acc.as_mut() {
                let year = year_acc.as_ref().map(|y| y.year).unwrap_or(sample.year);
                assert!(
                    (year, month.month) <= sample.period(),
                    "samples out of order: {} after {}-{:02}",
                    sample.timestamp(),
                    year,
                    month.month
                );
                if year == sample.year && month.month == sample.month {
                    month.sum += sample.value;
                    month.count += 1;
                    continue;
                }
            }

            // month boundary
            if let (Some(month), Some(year)) = (month_acc.take(), year_acc.as_mut()) {
                year.fold_month(&month);
            }
            if year_acc.as_ref().map(|y| y.year) != Some(sample.year) {
                if let Some(year) = year_acc.take() {
                    records.push(year.finish());
                }
                year_acc = Some(YearAcc::start(sample.year));
            }
            month_acc = Some(MonthAcc::start(sample));
        }

        // flush the last open month and year
        if let (Some(month), Some(year)) = (month_acc.take(), year_acc.as_mut()) {
            year.fold_month(&month);
        }
        if let Some(year) = year_acc.take() {
            records.push(year.finish());
        }

        log::debug!(
            "[clim] aggregation: {} samples -> {} year records",
            samples.len(),
            records.len()
        );
        records
    }

    /// Re-expand yearly records into one sample per present month.
    ///
    /// Each sample carries its month mean, so aggregating the output again
    /// reproduces the input records.
    pub fn expand_monthly(records: &[YearRecord]) -> Vec<RawSample> {
        records
            .iter()
            .flat_map(|r| {
                r.months
                    .values()
                    .map(move |m| RawSample::new(r.year, m.month, m.mean_value))
            })
            .collect()
    }

}
