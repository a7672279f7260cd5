//! Configuration file management for micdeck.
//!
//! Configuration is read from a TOML file in the user's config directory. Every
//! field has a default, so a missing file or section is not an error.

use crate::audio::CapturePreset;
use crate::recorder::ControlLayout;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Capture quality preset names accepted in the config file.
///
/// Captures use `high` unless the user opts into `low` through the config
/// file or `--preset`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    /// 44.1 kHz stereo, the fixed default
    #[default]
    High,
    /// 22.05 kHz mono, opt-in
    Low,
}

impl PresetName {
    pub fn preset(self) -> CapturePreset {
        match self {
            Self::High => crate::audio::preset::HIGH_QUALITY,
            Self::Low => crate::audio::preset::LOW_QUALITY,
        }
    }
}

/// Audio device and capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioConfig {
    /// Input device: "default", numeric index, or device name from `micdeck list-devices`
    #[serde(default = "default_device")]
    pub input_device: String,
    /// Output device for playback, same format as `input_device`
    #[serde(default = "default_device")]
    pub output_device: String,
    /// Capture preset: "high" or "low"
    #[serde(default)]
    pub preset: PresetName,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            input_device: default_device(),
            output_device: default_device(),
            preset: PresetName::default(),
        }
    }
}

fn default_device() -> String {
    "default".to_string()
}

/// Screen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    /// Controls shown on each recording row: "standard" or "extended"
    #[serde(default)]
    pub controls: ControlLayout,
}

/// Where captured audio is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory for recording files; defaults to the user cache directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recordings_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolves the recordings directory.
    ///
    /// # Errors
    /// - If no directory is configured and the cache directory cannot be determined
    pub fn recordings_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.recordings_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::cache_dir()
                .map(|dir| dir.join("micdeck").join("recordings"))
                .ok_or_else(|| anyhow!("Could not determine cache directory")),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MicdeckConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl MicdeckConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Loads configuration from `path`, falling back to defaults if it doesn't exist.
    ///
    /// # Errors
    /// - If the file exists but cannot be read or parsed
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| anyhow!("{}: {e}", path.display()))
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    /// - If the TOML is malformed or has unknown enum values
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Path to the config file, `~/.config/micdeck/micdeck.toml`.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("micdeck").join("micdeck.toml"))
}
