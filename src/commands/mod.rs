//! Command handlers.
//!
//! # Commands
//! - `record`: the recorder screen (default)
//! - `config`: open the configuration file in the user's editor
//! - `list_devices`: list audio input and output devices
//! - `logs`: show recent log entries

pub mod config;
pub mod list_devices;
pub mod logs;
pub mod record;

pub use config::handle_config;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use record::handle_record;
