//! First-run setup.
//!
//! Writes the default configuration file when none exists yet.

use std::path::Path;

/// Embedded default configuration template.
pub const DEFAULT_CONFIG: &str = include_str!("../../environments/micdeck.toml");

/// Creates the config file at `config_path` if it is missing.
///
/// Returns whether a file was written.
///
/// # Errors
/// Returns an error if the directory or file cannot be created.
pub fn ensure_config(config_path: &Path) -> anyhow::Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(config_dir) = config_path.parent() {
        std::fs::create_dir_all(config_dir)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG)?;
    tracing::info!("Default configuration written to {}", config_path.display());
    Ok(true)
}
