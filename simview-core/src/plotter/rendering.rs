use crate::plotter::data::VisibleSlice;
use crate::plotter::{palette_color, MAX_LINES};
use crate::validation::ValueRange;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    Value,
    Similarity,
}

/// Linear mapping from data space onto a `width` x `height` drawing area.
/// Time grows to the right; values grow upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axes {
    width: f64,
    height: f64,
    time_start: f64,
    time_end: f64,
    range: ValueRange,
}

impl Axes {
    pub fn new(width: f64, height: f64, range: ValueRange) -> Self {
        Self {
            width,
            height,
            time_start: 0.0,
            time_end: 0.0,
            range,
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn time_range(&self) -> (f64, f64) {
        (self.time_start, self.time_end)
    }

    pub fn set_time_range(&mut self, start: f64, end: f64) {
        self.time_start = start;
        self.time_end = end;
    }

    pub fn set_range(&mut self, range: ValueRange) {
        self.range = range;
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn scale_x(&self, t: f64) -> f64 {
        let span = self.time_end - self.time_start;
        if span <= 0.0 {
            return 0.0;
        }
        (t - self.time_start) / span * self.width
    }

    pub fn scale_y(&self, value: f64) -> f64 {
        self.height - (value - self.range.min()) / self.range.span() * self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotLine {
    pub label: String,
    pub color: Rgb,
    /// Pixel coordinates, left to right.
    pub points: Vec<(f64, f64)>,
}

/// Everything needed to draw one plot at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotFrame {
    pub kind: PlotKind,
    pub time_range: (f64, f64),
    pub range: ValueRange,
    pub size: (f64, f64),
    /// Store index of the first projected sample.
    pub first_index: usize,
    pub lines: Vec<PlotLine>,
}

/// How a windowed plot turns its visible samples into lines.
pub trait RenderStrategy {
    fn kind(&self) -> PlotKind;

    fn default_range(&self) -> ValueRange;

    fn line_label(&self, dimension: usize) -> String;

    fn line_color(&self, dimension: usize) -> Rgb {
        palette_color(dimension)
    }

    /// One line per dimension, capped at a fixed number of lines.
    fn project(&self, slice: &VisibleSlice<'_>, axes: &Axes, dimensions: usize) -> Vec<PlotLine> {
        (0..dimensions.min(MAX_LINES))
            .map(|dimension| PlotLine {
                label: self.line_label(dimension),
                color: self.line_color(dimension),
                points: slice
                    .iter()
                    .filter_map(|sample| {
                        let value = *sample.values().get(dimension)?;
                        Some((axes.scale_x(sample.time()), axes.scale_y(value)))
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Decoded values of an ensemble, one line per dimension.
#[derive(Debug, Clone, Default)]
pub struct ValueRenderer;

impl RenderStrategy for ValueRenderer {
    fn kind(&self) -> PlotKind {
        PlotKind::Value
    }

    fn default_range(&self) -> ValueRange {
        ValueRange::bounded(-1.0, 1.0)
    }

    fn line_label(&self, dimension: usize) -> String {
        dimension.to_string()
    }
}

/// Similarity of a decoded semantic pointer to each vocabulary entry.
#[derive(Debug, Clone, Default)]
pub struct SimilarityRenderer {
    pointers: Vec<String>,
}

impl SimilarityRenderer {
    pub fn new(pointers: Vec<String>) -> Self {
        Self { pointers }
    }

    pub fn pointers(&self) -> &[String] {
        &self.pointers
    }

    pub fn set_pointers(&mut self, pointers: Vec<String>) {
        self.pointers = pointers;
    }
}

impl RenderStrategy for SimilarityRenderer {
    fn kind(&self) -> PlotKind {
        PlotKind::Similarity
    }

    fn default_range(&self) -> ValueRange {
        ValueRange::bounded(-1.5, 1.5)
    }

    fn line_label(&self, dimension: usize) -> String {
        self.pointers
            .get(dimension)
            .cloned()
            .unwrap_or_else(|| format!("#{dimension}"))
    }

    /// Pointers without a vocabulary label are not drawn.
    fn project(&self, slice: &VisibleSlice<'_>, axes: &Axes, dimensions: usize) -> Vec<PlotLine> {
        let labelled = dimensions.min(self.pointers.len()).min(MAX_LINES);
        (0..labelled)
            .map(|dimension| PlotLine {
                label: self.line_label(dimension),
                color: self.line_color(dimension),
                points: slice
                    .times()
                    .zip(slice.column(dimension))
                    .map(|(t, value)| (axes.scale_x(t), axes.scale_y(value)))
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_map_window_onto_pixels() {
        let mut axes = Axes::new(200.0, 100.0, ValueRange::new(-1.0, 1.0).unwrap());
        axes.set_time_range(1.0, 3.0);
        assert_eq!(axes.scale_x(1.0), 0.0);
        assert_eq!(axes.scale_x(2.0), 100.0);
        assert_eq!(axes.scale_y(-1.0), 100.0);
        assert_eq!(axes.scale_y(1.0), 0.0);
        assert_eq!(axes.scale_y(0.0), 50.0);
    }

    #[test]
    fn degenerate_time_range_pins_to_left_edge() {
        let axes = Axes::new(200.0, 100.0, ValueRange::new(0.0, 1.0).unwrap());
        assert_eq!(axes.scale_x(5.0), 0.0);
    }

    #[test]
    fn colors_render_as_hex() {
        assert_eq!(Rgb(31, 119, 180).to_hex(), "#1f77b4");
    }

    #[test]
    fn similarity_labels_fall_back_to_index() {
        let renderer = SimilarityRenderer::new(vec!["A".into(), "B".into()]);
        assert_eq!(renderer.line_label(1), "B");
        assert_eq!(renderer.line_label(2), "#2");
    }
}
