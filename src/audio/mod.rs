//! Platform audio capability used by the recorder.
//!
//! The recorder never talks to sound devices directly. It drives three traits:
//! an [`AudioPlatform`] that grants access and starts captures, the
//! [`CaptureHandle`] of an in-progress recording, and the [`PlayableHandle`]
//! materialized from a finalized capture. [`CpalPlatform`] implements them on
//! top of cpal and hound.

pub mod capture;
pub mod cpal_platform;
pub mod device;
#[cfg(test)]
pub mod fake;
pub mod player;
pub mod preset;
pub mod wav;

use std::time::Duration;

pub use cpal_platform::CpalPlatform;
pub use preset::CapturePreset;

/// Outcome of a microphone access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Session flags applied before a capture begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Route the session for recording.
    pub allow_recording: bool,
    /// Keep capturing and playing while the device is muted.
    pub plays_in_silent_mode: bool,
}

impl SessionOptions {
    /// Options used for every capture started from the screen.
    pub const RECORDING: SessionOptions = SessionOptions {
        allow_recording: true,
        plays_in_silent_mode: true,
    };
}

/// Status reported when a playable handle is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub duration_millis: u64,
}

/// Live playback position of a playable handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackProgress {
    pub position_millis: u64,
    pub duration_millis: u64,
    pub is_playing: bool,
}

/// Errors raised by the platform audio layer.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio input device available")]
    NoInputDevice,
    #[error("No audio output device available")]
    NoOutputDevice,
    #[error("Audio device '{0}' not found. Use 'micdeck list-devices' to see available devices.")]
    DeviceNotFound(String),
    #[error("Device index {index} is out of range (0-{max})")]
    DeviceIndexOutOfRange { index: usize, max: usize },
    #[error("Unsupported device sample format: {0}")]
    UnsupportedSampleFormat(String),
    #[error("Audio session is not configured for recording")]
    SessionNotConfigured,
    #[error("Capture has not been finalized")]
    NotFinalized,
    #[error("Failed to enumerate devices: {0}")]
    Devices(#[from] cpal::DevicesError),
    #[error("Failed to read device configuration: {0}")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("Failed to query supported configurations: {0}")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),
    #[error("Failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("Failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Entry point into the platform: permission, session and capture start.
pub trait AudioPlatform {
    type Capture: CaptureHandle;

    fn request_permission(&mut self) -> Result<Permission, AudioError>;

    fn configure_session(&mut self, options: SessionOptions) -> Result<(), AudioError>;

    fn begin_capture(&mut self, preset: &CapturePreset) -> Result<Self::Capture, AudioError>;
}

/// An in-progress recording.
pub trait CaptureHandle {
    type Playable: PlayableHandle;

    /// Stops capture and flushes the recorded data to storage.
    fn finalize(&mut self) -> Result<(), AudioError>;

    /// Loads the finalized data as a playable clip.
    fn materialize_playable(&mut self) -> Result<(Self::Playable, PlaybackStatus), AudioError>;

    /// Location of the recorded data.
    fn source_uri(&self) -> String;
}

/// Transport over a finalized clip.
pub trait PlayableHandle {
    fn seek(&mut self, position: Duration) -> Result<(), AudioError>;

    fn stop(&mut self) -> Result<(), AudioError>;

    fn pause(&mut self) -> Result<(), AudioError>;

    fn play(&mut self) -> Result<(), AudioError>;

    fn progress(&self) -> PlaybackProgress;
}

/// Playable handle type produced by a platform.
pub type PlayableOf<P> = <<P as AudioPlatform>::Capture as CaptureHandle>::Playable;
