//! The climate chart application.
//!
//! [`App`] owns the single [`clim_state::ChartState`], the record
//! [`clim_db::Store`] and a canvas, and turns `range` events into draws.
//! Draws run as local tasks on the current thread; a monotonic ticket makes
//! sure only the newest request ever reaches the canvas.

pub mod app;
pub mod config;
pub mod navigation;
pub mod notice;

pub use app::{App, DrawOutcome, PointInspection, RangeData};
pub use config::AppConfig;
pub use navigation::Direction;
pub use notice::{Notice, NoticeKind};
