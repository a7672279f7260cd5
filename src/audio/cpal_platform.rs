//! [`AudioPlatform`] backed by the system's default cpal host.

use super::capture::CpalCapture;
use super::device::{find_device, quiet_stderr, Direction};
use super::wav::recording_path;
use super::{AudioError, AudioPlatform, CapturePreset, Permission, SessionOptions};
use cpal::traits::DeviceTrait;
use std::path::PathBuf;

/// Desktop audio platform.
pub struct CpalPlatform {
    input_device: String,
    output_device: String,
    recordings_dir: PathBuf,
    session: Option<SessionOptions>,
}

impl CpalPlatform {
    /// Creates a platform for the given device specs.
    ///
    /// Captures are written to `recordings_dir`, created on first use.
    pub fn new(input_device: String, output_device: String, recordings_dir: PathBuf) -> Self {
        Self {
            input_device,
            output_device,
            recordings_dir,
            session: None,
        }
    }

    fn input(&self) -> Result<cpal::Device, AudioError> {
        quiet_stderr(|| {
            let host = cpal::default_host();
            find_device(&host, Direction::Input, &self.input_device)
        })
    }
}

impl AudioPlatform for CpalPlatform {
    type Capture = CpalCapture;

    fn request_permission(&mut self) -> Result<Permission, AudioError> {
        let device = self.input()?;
        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());

        // A device the OS refuses to describe is one we're not allowed to open.
        let probe = quiet_stderr(|| Ok::<_, AudioError>(device.default_input_config()))?;
        match probe {
            Ok(_) => {
                tracing::debug!("Microphone access granted: {}", device_name);
                Ok(Permission::Granted)
            }
            Err(e) => {
                tracing::warn!("Microphone access denied for {}: {}", device_name, e);
                Ok(Permission::Denied)
            }
        }
    }

    fn configure_session(&mut self, options: SessionOptions) -> Result<(), AudioError> {
        if options.plays_in_silent_mode {
            tracing::debug!("Silent-mode playback requested; desktop hosts ignore the ringer switch");
        }
        self.session = Some(options);
        Ok(())
    }

    fn begin_capture(&mut self, preset: &CapturePreset) -> Result<CpalCapture, AudioError> {
        if !self.session.is_some_and(|session| session.allow_recording) {
            return Err(AudioError::SessionNotConfigured);
        }

        let device = self.input()?;
        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Recording device: {} ({})", device_name, preset);

        let path = recording_path(
            &self.recordings_dir,
            chrono::Local::now(),
            preset.format.extension(),
        );

        quiet_stderr(|| CpalCapture::start(&device, preset, path, self.output_device.clone()))
    }
}
