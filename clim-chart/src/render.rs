//! Chart drawing against an abstract canvas.
//!
//! Drawing is stateless: every call clears the canvas and redraws axes and
//! series from a [`Projection`].

use crate::projection::{Mode, Projection};
use clim_core::unscale;

/// Stroke/fill settings for one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: &'static str,
    pub width: f64,
    pub dashed: bool,
}

impl Style {
    pub const fn solid(color: &'static str) -> Self {
        Self {
            color,
            width: 1.0,
            dashed: false,
        }
    }

    pub const fn dashed(color: &'static str) -> Self {
        Self {
            color,
            width: 1.0,
            dashed: true,
        }
    }
}

pub const AXIS_STYLE: Style = Style::solid("grey");
pub const YEAR_LINE_STYLE: Style = Style::solid("red");
pub const MONTH_LINE_STYLE: Style = Style::solid("green");
pub const LEVEL_LINE_STYLE: Style = Style::dashed("red");
pub const BAND_STYLE: Style = Style::solid("lightgrey");
pub const LABEL_STYLE: Style = Style::solid("black");
pub const MARKER_STYLE: Style = Style::solid("blue");

/// The drawing primitives the chart needs.
pub trait Canvas {
    fn clear(&mut self, width: f64, height: f64);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), style: &Style);
    fn polyline(&mut self, points: &[(f64, f64)], style: &Style);
    fn text(&mut self, at: (f64, f64), text: &str, style: &Style);
}

/// Text around the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabels {
    pub title: String,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
}

/// Clear the canvas and draw the whole chart.
pub fn draw(canvas: &mut dyn Canvas, projection: &Projection, labels: &AxisLabels) {
    let g = projection.geometry;
    canvas.clear(g.width, g.height);
    draw_axes(canvas, projection, labels);

    if projection.is_empty() {
        return;
    }

    match projection.mode {
        Mode::Year => {
            for p in &projection.points {
                canvas.line((p.x, p.y_min), (p.x, p.y_max), &BAND_STYLE);
            }
            canvas.polyline(&projection.polyline(), &YEAR_LINE_STYLE);
        }
        Mode::Month => {
            for level in &projection.level_lines {
                canvas.line(
                    (level.x_start, level.y),
                    (level.x_end, level.y),
                    &LEVEL_LINE_STYLE,
                );
            }
            canvas.polyline(&projection.polyline(), &MONTH_LINE_STYLE);
            canvas.polyline(&projection.year_polyline(), &YEAR_LINE_STYLE);
        }
    }
}

fn draw_axes(canvas: &mut dyn Canvas, projection: &Projection, labels: &AxisLabels) {
    let g = projection.geometry;
    // y
    canvas.line((g.padding, g.padding), (g.padding, g.bottom()), &AXIS_STYLE);
    // x
    canvas.line((g.padding, g.bottom()), (g.right(), g.bottom()), &AXIS_STYLE);

    canvas.text((g.padding, g.padding / 2.0), &labels.title, &LABEL_STYLE);
    if projection.is_empty() {
        return;
    }
    let bounds = projection.bounds;
    canvas.text(
        (4.0, g.padding),
        &format!("{:.2}", unscale(bounds.max)),
        &LABEL_STYLE,
    );
    canvas.text(
        (4.0, g.bottom()),
        &format!("{:.2}", unscale(bounds.min)),
        &LABEL_STYLE,
    );
    let year_label_y = g.bottom() + g.padding / 2.0;
    if let Some(first) = labels.first_year {
        canvas.text((g.padding, year_label_y), &first.to_string(), &LABEL_STYLE);
    }
    if let Some(last) = labels.last_year {
        canvas.text((g.right(), year_label_y), &last.to_string(), &LABEL_STYLE);
    }
}

/// Highlight the inspected record with a vertical marker and its caption.
pub fn draw_marker(canvas: &mut dyn Canvas, projection: &Projection, year_index: usize, caption: &str) {
    let Some(point) = projection.points.get(year_index) else {
        return;
    };
    let g = projection.geometry;
    canvas.line((point.x, g.padding), (point.x, g.bottom()), &MARKER_STYLE);
    canvas.text((point.x + 4.0, point.y - 4.0), caption, &MARKER_STYLE);
}
