pub mod plot;
pub mod data;
pub mod rendering;

pub use plot::{PlotComponent, PlotLayout, SimilarityPlot, ValuePlot, WindowedPlot};
pub use data::{Sample, VisibleSlice, WindowedDataStore};
pub use rendering::{
    Axes, PlotFrame, PlotKind, PlotLine, RenderStrategy, Rgb, SimilarityRenderer, ValueRenderer,
};

const MAX_LINES: usize = 64;

pub(crate) fn palette_color(idx: usize) -> Rgb {
    const COLORS: [Rgb; 10] = [
        Rgb(31, 119, 180),
        Rgb(255, 127, 14),
        Rgb(44, 160, 44),
        Rgb(214, 39, 40),
        Rgb(148, 103, 189),
        Rgb(140, 86, 75),
        Rgb(227, 119, 194),
        Rgb(127, 127, 127),
        Rgb(188, 189, 34),
        Rgb(23, 190, 207),
    ];
    COLORS[idx % COLORS.len()]
}
