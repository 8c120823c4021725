use serde::{Deserialize, Serialize};

pub const DEFAULT_SHOWN_TIME: f64 = 0.5;
pub const DEFAULT_RETENTION_MARGIN: f64 = 3.5;

/// Position of the simulation time slider, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSlider {
    pub first_shown_time: f64,
    pub shown_time: f64,
    /// How far before the visible window samples are still kept, so that
    /// scrolling back a little does not lose data.
    pub retention_margin: f64,
}

impl Default for TimeSlider {
    fn default() -> Self {
        Self {
            first_shown_time: -DEFAULT_SHOWN_TIME,
            shown_time: DEFAULT_SHOWN_TIME,
            retention_margin: DEFAULT_RETENTION_MARGIN,
        }
    }
}

impl TimeSlider {
    pub fn new(first_shown_time: f64, shown_time: f64) -> Self {
        Self {
            first_shown_time,
            shown_time: shown_time.max(0.0),
            ..Self::default()
        }
    }

    pub fn with_retention_margin(mut self, margin: f64) -> Self {
        self.retention_margin = margin.max(0.0);
        self
    }

    pub fn visible_window(&self) -> VisibleWindow {
        VisibleWindow {
            start: self.first_shown_time,
            end: self.first_shown_time + self.shown_time,
        }
    }

    /// Oldest timestamp worth keeping.
    pub fn retention_start(&self) -> f64 {
        self.first_shown_time - self.retention_margin
    }

    /// Slides the window so that it ends at `latest`, as while the
    /// simulation is running.
    pub fn follow(&mut self, latest: f64) {
        self.first_shown_time = latest - self.shown_time;
    }
}

/// Half-open `[start, end)` time range currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleWindow {
    pub start: f64,
    pub end: f64,
}

impl VisibleWindow {
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}
