//! Capture quality presets.

use std::fmt;

/// Container the finalized capture is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    Wav,
}

impl ContainerFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
        }
    }
}

/// Named bundle of capture parameters fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturePreset {
    pub name: &'static str,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub format: ContainerFormat,
}

pub const HIGH_QUALITY: CapturePreset = CapturePreset {
    name: "high",
    sample_rate: 44_100,
    channels: 2,
    bits_per_sample: 16,
    format: ContainerFormat::Wav,
};

pub const LOW_QUALITY: CapturePreset = CapturePreset {
    name: "low",
    sample_rate: 22_050,
    channels: 1,
    bits_per_sample: 16,
    format: ContainerFormat::Wav,
};

impl Default for CapturePreset {
    fn default() -> Self {
        HIGH_QUALITY
    }
}

impl fmt::Display for CapturePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}Hz, {} ch, {}-bit {})",
            self.name,
            self.sample_rate,
            self.channels,
            self.bits_per_sample,
            self.format.extension()
        )
    }
}
