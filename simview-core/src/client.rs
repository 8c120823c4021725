use crate::editor::EditorSession;
use crate::error::{EditorError, PlotError, ProtocolError};
use crate::plotter::{PlotComponent, PlotFrame};
use crate::sync::Clock;
use crate::window::TimeSlider;
use std::collections::BTreeMap;

/// Routes server traffic to the editor and the plots of one page.
pub struct SimClient<C: Clock + Clone> {
    editor: EditorSession<C>,
    plots: BTreeMap<String, Box<dyn PlotComponent>>,
    slider: TimeSlider,
}

impl<C: Clock + Clone> SimClient<C> {
    pub fn new(editor: EditorSession<C>) -> Self {
        Self {
            editor,
            plots: BTreeMap::new(),
            slider: TimeSlider::default(),
        }
    }

    pub fn editor(&self) -> &EditorSession<C> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorSession<C> {
        &mut self.editor
    }

    pub fn slider(&self) -> &TimeSlider {
        &self.slider
    }

    pub fn set_slider(&mut self, slider: TimeSlider) {
        self.slider = slider;
    }

    /// Registers a plot under `uid`, returning any plot it replaces.
    pub fn register_plot(
        &mut self,
        uid: impl Into<String>,
        plot: Box<dyn PlotComponent>,
    ) -> Option<Box<dyn PlotComponent>> {
        self.plots.insert(uid.into(), plot)
    }

    pub fn remove_plot(&mut self, uid: &str) -> Option<Box<dyn PlotComponent>> {
        self.plots.remove(uid)
    }

    pub fn plot(&self, uid: &str) -> Option<&dyn PlotComponent> {
        self.plots.get(uid).map(|plot| plot.as_ref())
    }

    pub fn plot_mut(&mut self, uid: &str) -> Option<&mut (dyn PlotComponent + 'static)> {
        self.plots.get_mut(uid).map(|plot| plot.as_mut())
    }

    pub fn plot_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.plots.keys().map(String::as_str)
    }

    /// A binary data message addressed to plot `uid`.
    pub fn on_binary(&mut self, uid: &str, bytes: &[u8]) -> Result<bool, PlotError> {
        let plot = self
            .plots
            .get_mut(uid)
            .ok_or_else(|| PlotError::UnknownPlot(uid.to_string()))?;
        plot.on_message(bytes)
    }

    /// A text message; all text traffic currently belongs to the editor.
    pub fn on_text(&mut self, text: &str) -> Result<(), ProtocolError> {
        self.editor.handle_text(text)
    }

    /// A new simulation run starts from an empty history.
    pub fn reset_all(&mut self) {
        for plot in self.plots.values_mut() {
            plot.reset();
        }
    }

    /// Frames for the plots whose data or layout changed since their last
    /// update.
    pub fn redraw(&mut self) -> Vec<(String, PlotFrame)> {
        let slider = self.slider;
        self.plots
            .iter_mut()
            .filter(|(_, plot)| plot.needs_update())
            .map(|(uid, plot)| (uid.clone(), plot.update(&slider)))
            .collect()
    }

    /// Frames for every plot, e.g. after the slider moved.
    pub fn redraw_all(&mut self) -> Vec<(String, PlotFrame)> {
        let slider = self.slider;
        self.plots
            .iter_mut()
            .map(|(uid, plot)| (uid.clone(), plot.update(&slider)))
            .collect()
    }

    pub fn poll(&mut self) -> Result<(), EditorError> {
        self.editor.poll()
    }

    pub fn teardown(&mut self) {
        self.editor.teardown();
        self.plots.clear();
    }
}
