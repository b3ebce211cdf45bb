//! A [`Canvas`] that renders to an SVG document through plotters'
//! `SVGBackend`.
//!
//! Draw calls are kept as a display list and replayed into a fresh backend
//! each time the document is requested, since the backend borrows its
//! output string for as long as it lives.

use crate::render::{Canvas, Style};
use plotters::backend::DrawingBackend;

// Same as `plotters_backend::BackendCoord`, which `plotters::backend` does not re-export.
type BackendCoord = (i32, i32);
use plotters::prelude::*;

const DASH: f64 = 4.0;
const GAP: f64 = 3.0;
const FONT_SIZE: u32 = 11;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Line((f64, f64), (f64, f64), Style),
    Path(Vec<(f64, f64)>, Style),
    Text((f64, f64), String, Style),
}

#[derive(Debug, Default, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    ops: Vec<Op>,
}

fn rgb(name: &str) -> RGBColor {
    match name {
        "red" => RGBColor(255, 0, 0),
        "green" => RGBColor(0, 128, 0),
        "blue" => RGBColor(0, 0, 255),
        "grey" => RGBColor(128, 128, 128),
        "lightgrey" => RGBColor(211, 211, 211),
        _ => RGBColor(0, 0, 0),
    }
}

fn shape(style: &Style) -> ShapeStyle {
    ShapeStyle {
        color: rgb(style.color).to_rgba(),
        filled: false,
        stroke_width: style.width.round().max(1.0) as u32,
    }
}

fn coord((x, y): (f64, f64)) -> BackendCoord {
    (x.round() as i32, y.round() as i32)
}

/// Split `from -> to` into dash segments.
fn dash_segments(from: (f64, f64), to: (f64, f64)) -> Vec<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return Vec::new();
    }
    let (ux, uy) = (dx / length, dy / length);
    let mut segments = Vec::new();
    let mut offset = 0.0;
    while offset < length {
        let end = (offset + DASH).min(length);
        segments.push((
            (from.0 + ux * offset, from.1 + uy * offset),
            (from.0 + ux * end, from.1 + uy * end),
        ));
        offset += DASH + GAP;
    }
    segments
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// The complete SVG document for everything drawn since the last clear.
    pub fn to_svg(&self) -> anyhow::Result<String> {
        let mut out = String::new();
        {
            let size = (self.width.max(0.0) as u32, self.height.max(0.0) as u32);
            let mut backend = SVGBackend::with_string(&mut out, size);
            for op in &self.ops {
                match op {
                    Op::Line(from, to, style) if style.dashed => {
                        for (a, b) in dash_segments(*from, *to) {
                            backend.draw_line(coord(a), coord(b), &shape(style))?;
                        }
                    }
                    Op::Line(from, to, style) => {
                        backend.draw_line(coord(*from), coord(*to), &shape(style))?;
                    }
                    Op::Path(points, style) => {
                        backend.draw_path(points.iter().map(|p| coord(*p)), &shape(style))?;
                    }
                    Op::Text(at, text, style) => {
                        let font = ("sans-serif", FONT_SIZE).into_font().color(&rgb(style.color));
                        backend.draw_text(text, &font, coord(*at))?;
                    }
                }
            }
            backend.present()?;
        }
        Ok(out)
    }
}

impl Canvas for SvgCanvas {
    fn clear(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.ops.clear();
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), style: &Style) {
        self.ops.push(Op::Line(from, to, *style));
    }

    fn polyline(&mut self, points: &[(f64, f64)], style: &Style) {
        if points.is_empty() {
            return;
        }
        self.ops.push(Op::Path(points.to_vec(), *style));
    }

    fn text(&mut self, at: (f64, f64), text: &str, style: &Style) {
        self.ops.push(Op::Text(at, text.to_string(), *style));
    }
}
