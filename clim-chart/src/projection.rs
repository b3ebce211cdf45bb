//! Mapping between year records and canvas pixels.
//!
//! Two granularities:
//! - **Year mode** (long ranges): one point per year, with a min/max band
//!   per point for the fluctuation bars.
//! - **Month mode** (short ranges): one point per month as a continuous line,
//!   plus a dashed level line per year at the year mean spanning that year's
//!   months.
//!
//! y is inverted: larger values sit higher on the canvas, so pixel y
//! decreases as the value grows.

use crate::config::{ChartConfig, Geometry, YearLayout};
use clim_core::{YearRecord, VALUE_SCALE};
use serde::Serialize;

/// Month slots per year on the month-mode x axis.
const MONTH_STRIDE: f64 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    Year,
    Month,
}

impl Mode {
    /// Year mode above `threshold` records, month mode otherwise.
    pub fn for_count(count: usize, threshold: usize) -> Self {
        if count > threshold {
            Mode::Year
        } else {
            Mode::Month
        }
    }
}

/// A projected point. `y_min`/`y_max` are the pixel positions of the
/// point's min and max values (equal to `y` for month points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinatePoint {
    pub x: f64,
    pub y: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Dashed year-mean segment drawn under a year's month points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelLine {
    pub x_start: f64,
    pub x_end: f64,
    pub y: f64,
}

/// Value range mapped onto the plot height, in fixed-point units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueBounds {
    pub min: i64,
    pub max: i64,
}

impl ValueBounds {
    /// Extrema of the records' min and max values.
    pub fn of(records: &[YearRecord]) -> Self {
        let min = records.iter().map(|r| r.min_value).min().unwrap_or(0);
        let max = records.iter().map(|r| r.max_value).max().unwrap_or(0);
        Self { min, max }
    }

    pub fn span(&self) -> i64 {
        self.max - self.min
    }
}

/// Result of reverse-mapping a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Located {
    /// Value under the cursor in measurement units.
    pub value: f64,
    /// Index into the projected records.
    pub year_index: usize,
}

/// Linear value <-> pixel y mapping over the plot height.
#[derive(Debug, Clone, Copy)]
struct ValueScale {
    bounds: ValueBounds,
    geometry: Geometry,
}

impl ValueScale {
    fn to_px(&self, value: i64) -> f64 {
        let span = self.bounds.span();
        if span == 0 {
            return self.geometry.padding + self.geometry.plot_height() / 2.0;
        }
        self.geometry.bottom()
            - (value - self.bounds.min) as f64 / span as f64 * self.geometry.plot_height()
    }

    /// Fixed-point value at pixel row `py`.
    fn from_px(&self, py: f64) -> f64 {
        let span = self.bounds.span();
        if span == 0 {
            return self.bounds.min as f64;
        }
        self.bounds.min as f64
            + (self.geometry.bottom() - py) / self.geometry.plot_height() * span as f64
    }
}

/// Pixel data for one draw.
#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    pub mode: Mode,
    /// One point per record.
    pub points: Vec<CoordinatePoint>,
    /// One point per present month; empty in year mode.
    pub month_points: Vec<CoordinatePoint>,
    /// One per record in month mode; empty in year mode.
    pub level_lines: Vec<LevelLine>,
    pub bounds: ValueBounds,
    pub geometry: Geometry,
}

/// Project records, picking the mode from the record count.
pub fn project(records: &[YearRecord], config: &ChartConfig) -> Projection {
    let mode = Mode::for_count(records.len(), config.month_mode_threshold);
    project_with_mode(records, config, mode)
}

/// Project records in the given mode.
pub fn project_with_mode(records: &[YearRecord], config: &ChartConfig, mode: Mode) -> Projection {
    let geometry = config.geometry();
    let bounds = ValueBounds::of(records);
    let scale = ValueScale { bounds, geometry };
    let plot_width = geometry.plot_width();
    let count = records.len();

    let mut points = Vec::with_capacity(count);
    let mut month_points = Vec::new();
    let mut level_lines = Vec::new();

    match mode {
        Mode::Year => {
            let slots = match config.year_layout {
                YearLayout::Line => count.saturating_sub(1),
                YearLayout::Bar => count,
            };
            for (i, record) in records.iter().enumerate() {
                let x = if slots == 0 {
                    geometry.padding
                } else {
                    geometry.padding + plot_width * i as f64 / slots as f64
                };
                points.push(CoordinatePoint {
                    x,
                    y: scale.to_px(record.mean_value),
                    y_min: scale.to_px(record.min_value),
                    y_max: scale.to_px(record.max_value),
                });
            }
        }
        Mode::Month => {
            let month_slots = count as f64 * MONTH_STRIDE;
            let x_at = |slot: f64| geometry.padding + plot_width * slot / month_slots;
            for (k, record) in records.iter().enumerate() {
                let first_slot = k as f64 * MONTH_STRIDE;
                let y = scale.to_px(record.mean_value);
                points.push(CoordinatePoint {
                    x: x_at(first_slot),
                    y,
                    y_min: scale.to_px(record.min_value),
                    y_max: scale.to_px(record.max_value),
                });
                level_lines.push(LevelLine {
                    x_start: x_at(first_slot),
                    x_end: x_at(first_slot + MONTH_STRIDE),
                    y,
                });
                for month in record.months.values() {
                    let my = scale.to_px(month.mean_value);
                    month_points.push(CoordinatePoint {
                        x: x_at(first_slot + (month.month as f64 - 1.0)),
                        y: my,
                        y_min: my,
                        y_max: my,
                    });
                }
            }
        }
    }

    log::debug!(
        "[clim] projection: {:?} mode, {} points, {} month points",
        mode,
        points.len(),
        month_points.len()
    );

    Projection {
        mode,
        points,
        month_points,
        level_lines,
        bounds,
        geometry,
    }
}

/// A polyline through `points`; a single point becomes a horizontal line
/// across the whole plot width.
fn polyline_of(points: &[CoordinatePoint], geometry: &Geometry) -> Vec<(f64, f64)> {
    match points {
        [only] => vec![(geometry.padding, only.y), (geometry.right(), only.y)],
        _ => points.iter().map(|p| (p.x, p.y)).collect(),
    }
}

impl Projection {
    /// The main line: year points in year mode, month points in month mode.
    pub fn polyline(&self) -> Vec<(f64, f64)> {
        match self.mode {
            Mode::Year => polyline_of(&self.points, &self.geometry),
            Mode::Month => polyline_of(&self.month_points, &self.geometry),
        }
    }

    /// The line through the year points regardless of mode.
    pub fn year_polyline(&self) -> Vec<(f64, f64)> {
        polyline_of(&self.points, &self.geometry)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Reverse-map a pixel to a value and the record under it.
    ///
    /// Returns `None` outside the plot rectangle or when nothing is projected.
    pub fn locate(&self, px: f64, py: f64) -> Option<Located> {
        if self.points.is_empty() || !self.geometry.contains(px, py) {
            return None;
        }
        let scale = ValueScale {
            bounds: self.bounds,
            geometry: self.geometry,
        };
        // rightmost point with x <= px; the first point sits on the left edge
        let year_index = self
            .points
            .partition_point(|p| p.x <= px)
            .saturating_sub(1);
        Some(Located {
            value: scale.from_px(py) / VALUE_SCALE as f64,
            year_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clim_core::MonthAggregate;
    use std::collections::BTreeMap;

    fn record(year: i32, mean: i64, min: i64, max: i64) -> YearRecord {
        YearRecord {
            year,
            mean_value: mean,
            min_value: min,
            max_value: max,
            months: BTreeMap::new(),
        }
    }

    fn full_year(year: i32, base: i64) -> YearRecord {
        let mut months = BTreeMap::new();
        for month in 1..=12u32 {
            months.insert(
                month,
                MonthAggregate {
                    month,
                    mean_value: base + month as i64 * 10,
                },
            );
        }
        YearRecord {
            year,
            mean_value: base + 65,
            min_value: base + 10,
            max_value: base + 120,
            months,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mode_threshold() {
        assert_eq!(Mode::for_count(25, 25), Mode::Month);
        assert_eq!(Mode::for_count(26, 25), Mode::Year);
        assert_eq!(Mode::for_count(1, 25), Mode::Month);
    }

    #[test]
    fn test_year_mode_two_points() {
        let records = vec![record(1990, 100, 80, 120), record(1991, 200, 150, 250)];
        let p = project_with_mode(&records, &ChartConfig::default(), Mode::Year);

        assert_eq!(p.points.len(), 2);
        assert!(close(p.points[0].x, 50.0));
        assert!(close(p.points[1].x, 450.0));
        assert!(p.points[1].y < p.points[0].y, "higher value must sit higher");
        assert!(p.month_points.is_empty());
        assert_eq!(p.bounds, ValueBounds { min: 80, max: 250 });
        // band extremes land on the plot edges
        assert!(close(p.points[0].y_min, 250.0));
        assert!(close(p.points[1].y_max, 50.0));
        assert!(p.points[0].y_max < p.points[0].y && p.points[0].y < p.points[0].y_min);
    }

    #[test]
    fn test_year_mode_y_strictly_decreasing() {
        let records: Vec<YearRecord> = (0..30)
            .map(|i| record(1900 + i, i as i64 * 10, i as i64 * 10 - 5, i as i64 * 10 + 5))
            .collect();
        let p = project(&records, &ChartConfig::default());
        assert_eq!(p.mode, Mode::Year);
        for pair in p.points.windows(2) {
            assert!(pair[1].y < pair[0].y);
            assert!(pair[1].x > pair[0].x);
        }
    }

    #[test]
    fn test_bar_layout_leaves_right_margin() {
        let records: Vec<YearRecord> = (0..4).map(|i| record(1900 + i, 0, -1, 1)).collect();
        let config = ChartConfig {
            year_layout: YearLayout::Bar,
            ..ChartConfig::default()
        };
        let p = project_with_mode(&records, &config, Mode::Year);
        assert!(close(p.points[0].x, 50.0));
        assert!(close(p.points[3].x, 50.0 + 400.0 * 3.0 / 4.0));
        assert!(p.points[3].x < 450.0);
    }

    #[test]
    fn test_month_mode_two_years() {
        let records = vec![full_year(1990, 0), full_year(1991, 50)];
        let p = project(&records, &ChartConfig::default());

        assert_eq!(p.mode, Mode::Month);
        assert_eq!(p.month_points.len(), 24);
        assert_eq!(p.level_lines.len(), 2);
        // month 1 of year 0 at the left edge, month 12 of the last year on the right edge
        assert!(close(p.month_points[0].x, 50.0));
        assert!(close(p.month_points[23].x, 450.0));
        // each level line spans its year's month-width
        assert!(close(p.level_lines[0].x_start, 50.0));
        assert!(close(p.level_lines[0].x_end, 250.0));
        assert!(close(p.level_lines[1].x_start, 250.0));
        assert!(close(p.level_lines[1].x_end, 450.0));
        assert!(close(p.level_lines[1].y, p.points[1].y));
        assert_eq!(p.polyline().len(), 24);
    }

    #[test]
    fn test_month_mode_partial_year_skips_missing_months() {
        let mut r = full_year(2006, 0);
        r.months.retain(|m, _| *m <= 3);
        let p = project(&[full_year(2005, 0), r], &ChartConfig::default());
        assert_eq!(p.month_points.len(), 15);
    }

    #[test]
    fn test_full_range_is_year_mode() {
        let records: Vec<YearRecord> = (1881..=2006).map(|y| full_year(y, (y as i64 % 7) * 3)).collect();
        let p = project(&records, &ChartConfig::default());
        assert_eq!(p.mode, Mode::Year);
        assert_eq!(p.points.len(), 126);
        assert!(p.month_points.is_empty());
        assert!(p.level_lines.is_empty());
    }

    #[test]
    fn test_single_point_draws_full_width_line() {
        let p = project_with_mode(&[record(1950, 10, 0, 20)], &ChartConfig::default(), Mode::Year);
        let line = p.polyline();
        assert_eq!(line.len(), 2);
        assert!(close(line[0].0, 50.0));
        assert!(close(line[1].0, 450.0));
        assert!(close(line[0].1, line[1].1));
        assert!(close(line[0].1, p.points[0].y));
    }

    #[test]
    fn test_flat_values_sit_mid_plot() {
        let records = vec![record(1950, 10, 10, 10), record(1951, 10, 10, 10)];
        let p = project_with_mode(&records, &ChartConfig::default(), Mode::Year);
        assert!(close(p.points[0].y, 150.0));
        let hit = p.locate(300.0, 60.0).unwrap();
        assert!(close(hit.value, 0.1));
    }

    #[test]
    fn test_locate_outside_plot_is_none() {
        let records = vec![record(1990, 100, 80, 120), record(1991, 200, 150, 250)];
        let p = project_with_mode(&records, &ChartConfig::default(), Mode::Year);
        for (x, y) in [(49.0, 100.0), (451.0, 100.0), (100.0, 49.0), (100.0, 251.0), (0.0, 0.0), (500.0, 300.0)] {
            assert!(p.locate(x, y).is_none(), "({x}, {y}) should be outside");
        }
        assert!(p.locate(50.0, 50.0).is_some());
        assert!(p.locate(450.0, 250.0).is_some());
    }

    #[test]
    fn test_locate_inverts_value_mapping() {
        let records = vec![record(1990, 100, 80, 120), record(1991, 200, 150, 250)];
        let p = project_with_mode(&records, &ChartConfig::default(), Mode::Year);
        assert!(close(p.locate(100.0, 250.0).unwrap().value, 0.8));
        assert!(close(p.locate(100.0, 50.0).unwrap().value, 2.5));
        let y = p.points[1].y;
        assert!(close(p.locate(100.0, y).unwrap().value, 2.0));
    }

    #[test]
    fn test_locate_picks_rightmost_point_left_of_cursor() {
        let records: Vec<YearRecord> = (0..5).map(|i| record(1900 + i, 0, -1, 1)).collect();
        let p = project_with_mode(&records, &ChartConfig::default(), Mode::Year);
        // points at 50, 150, 250, 350, 450
        assert_eq!(p.locate(50.0, 100.0).unwrap().year_index, 0);
        assert_eq!(p.locate(149.9, 100.0).unwrap().year_index, 0);
        assert_eq!(p.locate(150.0, 100.0).unwrap().year_index, 1);
        assert_eq!(p.locate(449.0, 100.0).unwrap().year_index, 3);
        assert_eq!(p.locate(450.0, 100.0).unwrap().year_index, 4);
    }

    #[test]
    fn test_locate_in_month_mode_resolves_year_group() {
        let records = vec![full_year(1990, 0), full_year(1991, 50)];
        let p = project(&records, &ChartConfig::default());
        assert_eq!(p.locate(240.0, 100.0).unwrap().year_index, 0);
        assert_eq!(p.locate(260.0, 100.0).unwrap().year_index, 1);
    }

    #[test]
    fn test_empty_projection() {
        let p = project(&[], &ChartConfig::default());
        assert!(p.is_empty());
        assert!(p.polyline().is_empty());
        assert!(p.locate(100.0, 100.0).is_none());
    }
}
