//! Client-side model of the simulation GUI: streaming plots over a sliding
//! time window, and a code editor kept in sync with the server.

pub mod client;
pub mod editor;
pub mod error;
pub mod plotter;
pub mod protocol;
pub mod settings;
pub mod sync;
pub mod validation;
pub mod window;

pub use client::SimClient;
pub use editor::{EditorCommand, EditorSession};
pub use error::{
    ConfigError, EditorError, PlotError, ProtocolError, RangeError, StoreError, SyncError,
};
pub use settings::{ConfigContext, ConfigKey, GuiSettings};
pub use validation::{ValueRange, Validator};
pub use window::{TimeSlider, VisibleWindow};
