#![warn(clippy::all, rust_2018_idioms)]

pub mod analysis;
pub mod broadcast;
pub mod control;
pub mod dataset;
pub mod error;
pub mod figure;
pub mod listener;
pub mod logging;
pub mod manager;
pub mod source;
pub mod widgets;
mod window;

pub use control::{ControlState, ParamValue};
pub use dataset::{Dataset, DatasetCore};
pub use error::{ConfigError, ControlError, DatasetError};
pub use figure::{Figure, Trace};
pub use listener::{ControlListener, Controller, DatasetListener, ListenerState};
pub use manager::{DatasetManager, Slot, PRIMARY_SLOT};
pub use source::{DataSource, SourceId};
pub use window::MainWindow;
