//! Chart geometry and drawing for the climate series chart.
//!
//! This crate provides:
//! - `config`: canvas size, padding and mode threshold
//! - `projection`: year records to pixel coordinates and back
//! - `render`: the `Canvas` drawing interface and the chart draw calls
//! - `svg`: a `Canvas` that writes an SVG document

pub mod config;
pub mod projection;
pub mod render;
pub mod svg;

pub use config::{ChartConfig, Geometry, YearLayout};
pub use projection::{project, project_with_mode, CoordinatePoint, Located, Mode, Projection};
pub use render::{Canvas, Style};
pub use svg::SvgCanvas;
