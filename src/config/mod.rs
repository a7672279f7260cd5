//! Configuration management for micdeck.
//!
//! Settings are loaded from `~/.config/micdeck/micdeck.toml`. Command-line
//! flags override the preset and control layout for a single run.

pub mod file;

pub use file::{config_path, MicdeckConfig, PresetName};
