use clim_core::YearBounds;

/// Which way the navigation buttons and arrow keys move the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl Direction {
    /// Map a keyboard key name (`KeyboardEvent.key`) to a direction.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Direction::Back),
            "ArrowRight" => Some(Direction::Forward),
            _ => None,
        }
    }

    fn delta(self) -> i32 {
        match self {
            Direction::Back => -1,
            Direction::Forward => 1,
        }
    }
}

/// Both years moved one step, or `None` when either would leave `bounds`.
pub fn shifted(start: i32, end: i32, bounds: YearBounds, direction: Direction) -> Option<(i32, i32)> {
    let d = direction.delta();
    let (start, end) = (start + d, end + d);
    if bounds.contains(start) && bounds.contains(end) {
        Some((start, end))
    } else {
        None
    }
}
