use serde::{Deserialize, Serialize};

/// Default canvas width in pixels.
pub const CANVAS_WIDTH: f64 = 500.0;

/// Default canvas height in pixels.
pub const CANVAS_HEIGHT: f64 = 300.0;

/// Default padding around the plot rectangle, room for axes and labels.
pub const GRAPH_PADDING: f64 = 50.0;

/// Ranges with more records than this are drawn one point per year.
pub const MONTH_MODE_THRESHOLD: usize = 25;

/// Horizontal spacing of year points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearLayout {
    /// First point on the left edge of the plot, last point on the right edge.
    #[default]
    Line,
    /// Leaves one slot of margin at the right edge for bars.
    Bar,
}

/// Canvas size and padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Geometry {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.padding * 2.0
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.padding * 2.0
    }

    /// Pixel y of the x axis.
    pub fn bottom(&self) -> f64 {
        self.padding + self.plot_height()
    }

    /// Pixel x of the right edge of the plot rectangle.
    pub fn right(&self) -> f64 {
        self.padding + self.plot_width()
    }

    /// True if the pixel lies in the plot rectangle, edges included.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.padding && x <= self.right() && y >= self.padding && y <= self.bottom()
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT, GRAPH_PADDING)
    }
}

/// Chart settings, loadable from a JSON config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub month_mode_threshold: usize,
    pub year_layout: YearLayout,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            padding: GRAPH_PADDING,
            month_mode_threshold: MONTH_MODE_THRESHOLD,
            year_layout: YearLayout::Line,
        }
    }
}

impl ChartConfig {
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.width, self.height, self.padding)
    }
}
