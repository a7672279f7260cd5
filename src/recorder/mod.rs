//! Recorder core: capture lifecycle, the recording list and the status line.
//!
//! All state lives in [`AppState`], which handlers receive by reference.

pub mod controller;
pub mod duration;
pub mod list;
pub mod state;
pub mod status;

pub use controller::{RecordingController, StartOutcome, StopOutcome, ToggleOutcome};
pub use duration::format_duration;
pub use list::{Control, ControlLayout, TransportError};
pub use state::AppState;
