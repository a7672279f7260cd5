//! Terminal interface for the recorder.

pub mod error;
pub mod input;
pub mod screen;
pub mod session;

pub use error::ErrorScreen;
pub use screen::RecorderScreen;
pub use session::{Flow, RecorderSession};
