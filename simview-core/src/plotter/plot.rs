use crate::error::{PlotError, RangeError, StoreError};
use crate::plotter::data::{Sample, WindowedDataStore};
use crate::plotter::rendering::{
    Axes, PlotFrame, PlotKind, RenderStrategy, SimilarityRenderer, ValueRenderer,
};
use crate::protocol::decode_sample;
use crate::validation::{ValueRange, Validator};
use crate::window::TimeSlider;
use serde::{Deserialize, Serialize};

pub const MIN_WIDTH: f64 = 100.0;
pub const MIN_HEIGHT: f64 = 80.0;
const DEFAULT_WIDTH: f64 = 200.0;
const DEFAULT_HEIGHT: f64 = 150.0;

pub type ValuePlot = WindowedPlot<ValueRenderer>;
pub type SimilarityPlot = WindowedPlot<SimilarityRenderer>;

/// Persisted placement of a plot, restored when the page reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotLayout {
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub min_value: f64,
    pub max_value: f64,
}

/// A streaming line plot over a sliding time window. What the lines mean and
/// how they are labelled is left to the strategy `R`.
#[derive(Debug)]
pub struct WindowedPlot<R: RenderStrategy> {
    label: String,
    store: WindowedDataStore,
    renderer: R,
    axes: Axes,
    needs_update: bool,
    dropped_samples: u64,
}

impl<R: RenderStrategy> WindowedPlot<R> {
    pub fn new(label: impl Into<String>, dimensions: usize, renderer: R) -> Self {
        let axes = Axes::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, renderer.default_range());
        Self {
            label: label.into(),
            store: WindowedDataStore::new(dimensions),
            renderer,
            axes,
            needs_update: false,
            dropped_samples: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn store(&self) -> &WindowedDataStore {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Strategy changes (e.g. new similarity labels) show on the next update.
    pub fn renderer_mut(&mut self) -> &mut R {
        self.needs_update = true;
        &mut self.renderer
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn range(&self) -> ValueRange {
        self.axes.range()
    }

    pub fn size(&self) -> (f64, f64) {
        self.axes.size()
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    pub fn dropped_samples(&self) -> u64 {
        self.dropped_samples
    }

    /// Handles one binary data message. Returns whether the sample was kept;
    /// samples the store refuses are logged and dropped.
    pub fn on_message(&mut self, bytes: &[u8]) -> Result<bool, PlotError> {
        let sample = decode_sample(bytes, self.store.dimensions())?;
        match self.push_sample(sample) {
            Ok(()) => Ok(true),
            Err(err) => {
                self.dropped_samples += 1;
                log::warn!("plot '{}' dropped sample: {err}", self.label);
                Ok(false)
            }
        }
    }

    pub fn push_sample(&mut self, sample: Sample) -> Result<(), StoreError> {
        self.store.push(sample)?;
        self.needs_update = true;
        Ok(())
    }

    /// Evicts data behind the slider's retention margin and projects the
    /// visible window.
    pub fn update(&mut self, slider: &TimeSlider) -> PlotFrame {
        let evicted = self.store.evict_before(slider.retention_start());
        if evicted > 0 {
            log::debug!("plot '{}' evicted {evicted} samples", self.label);
        }
        let window = slider.visible_window();
        self.axes.set_time_range(window.start, window.end);
        let slice = self.store.visible_slice(window.start, window.end);
        let lines = self
            .renderer
            .project(&slice, &self.axes, self.store.dimensions());
        self.needs_update = false;
        PlotFrame {
            kind: self.renderer.kind(),
            time_range: (window.start, window.end),
            range: self.axes.range(),
            size: self.axes.size(),
            first_index: slice.first_index(),
            lines,
        }
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        let width = if width.is_finite() { width.max(MIN_WIDTH) } else { MIN_WIDTH };
        let height = if height.is_finite() { height.max(MIN_HEIGHT) } else { MIN_HEIGHT };
        self.axes.on_resize(width, height);
        self.needs_update = true;
    }

    /// Applies a user-entered `"<min>,<max>"` range. Invalid input leaves the
    /// current range in place; the error text is meant for the user.
    pub fn set_range(&mut self, text: &str) -> Result<ValueRange, RangeError> {
        let range = Validator::parse_range(text)?;
        self.update_range(range);
        Ok(range)
    }

    pub fn update_range(&mut self, range: ValueRange) {
        self.axes.set_range(range);
        self.needs_update = true;
    }

    pub fn layout_info(&self) -> PlotLayout {
        let (width, height) = self.axes.size();
        let range = self.axes.range();
        PlotLayout {
            label: self.label.clone(),
            width,
            height,
            min_value: range.min(),
            max_value: range.max(),
        }
    }

    /// Restores a saved layout. A bad range rejects the whole layout.
    pub fn update_layout(&mut self, layout: &PlotLayout) -> Result<(), RangeError> {
        let range = ValueRange::new(layout.min_value, layout.max_value)?;
        self.update_range(range);
        self.on_resize(layout.width, layout.height);
        self.label = layout.label.clone();
        Ok(())
    }

    /// Forgets all data, e.g. when a new simulation run starts.
    pub fn reset(&mut self) {
        self.store.reset();
        self.needs_update = true;
    }
}

impl ValuePlot {
    pub fn value(label: impl Into<String>, dimensions: usize) -> Self {
        Self::new(label, dimensions, ValueRenderer)
    }
}

impl SimilarityPlot {
    pub fn similarity(label: impl Into<String>, pointers: Vec<String>) -> Self {
        let dimensions = pointers.len();
        Self::new(label, dimensions, SimilarityRenderer::new(pointers))
    }
}

/// Object-safe view of any windowed plot, for callers that hold plots of
/// different kinds side by side.
pub trait PlotComponent {
    fn kind(&self) -> PlotKind;
    fn label(&self) -> &str;
    fn needs_update(&self) -> bool;
    fn on_message(&mut self, bytes: &[u8]) -> Result<bool, PlotError>;
    fn update(&mut self, slider: &TimeSlider) -> PlotFrame;
    fn on_resize(&mut self, width: f64, height: f64);
    fn set_range(&mut self, text: &str) -> Result<ValueRange, RangeError>;
    fn layout_info(&self) -> PlotLayout;
    fn reset(&mut self);
}

impl<R: RenderStrategy> PlotComponent for WindowedPlot<R> {
    fn kind(&self) -> PlotKind {
        self.renderer.kind()
    }

    fn label(&self) -> &str {
        WindowedPlot::label(self)
    }

    fn needs_update(&self) -> bool {
        WindowedPlot::needs_update(self)
    }

    fn on_message(&mut self, bytes: &[u8]) -> Result<bool, PlotError> {
        WindowedPlot::on_message(self, bytes)
    }

    fn update(&mut self, slider: &TimeSlider) -> PlotFrame {
        WindowedPlot::update(self, slider)
    }

    fn on_resize(&mut self, width: f64, height: f64) {
        WindowedPlot::on_resize(self, width, height)
    }

    fn set_range(&mut self, text: &str) -> Result<ValueRange, RangeError> {
        WindowedPlot::set_range(self, text)
    }

    fn layout_info(&self) -> PlotLayout {
        WindowedPlot::layout_info(self)
    }

    fn reset(&mut self) {
        WindowedPlot::reset(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_enforces_minimum_size() {
        let mut plot = ValuePlot::value("x", 1);
        plot.on_resize(10.0, 500.0);
        assert_eq!(plot.size(), (MIN_WIDTH, 500.0));
        plot.on_resize(f64::NAN, 10.0);
        assert_eq!(plot.size(), (MIN_WIDTH, MIN_HEIGHT));
    }

    #[test]
    fn default_ranges_follow_strategy() {
        assert_eq!(ValuePlot::value("v", 1).range().min(), -1.0);
        let similarity = SimilarityPlot::similarity("s", vec!["A".into()]);
        assert_eq!(similarity.range().max(), 1.5);
        assert_eq!(similarity.store().dimensions(), 1);
    }
}
