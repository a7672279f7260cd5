//! Microphone capture through cpal.
//!
//! Samples arrive on cpal's callback thread and are appended, interleaved and
//! converted to i16, to a buffer shared with the capture handle. Finalizing
//! drops the stream and writes the buffer to a WAV file.

use super::player::CpalPlayer;
use super::wav::{read_wav_mono, write_wav};
use super::{AudioError, CaptureHandle, CapturePreset, PlaybackStatus};
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use url::Url;

/// An in-progress cpal capture bound to its output file.
pub struct CpalCapture {
    /// Active input stream (kept alive until finalize)
    stream: Option<cpal::Stream>,
    /// Recorded samples, interleaved with `channels`
    samples: Arc<Mutex<Vec<i16>>>,
    sample_rate: u32,
    channels: u16,
    path: PathBuf,
    output_device: String,
    finalized: bool,
}

impl CpalCapture {
    /// Opens an input stream on `device` and starts capturing.
    ///
    /// Prefers a configuration matching the preset; falls back to the
    /// device default when the preset is not supported.
    ///
    /// # Errors
    /// - If the device configuration cannot be read
    /// - If the device sample format is not i16 or f32
    /// - If the stream cannot be built or started
    pub fn start(
        device: &cpal::Device,
        preset: &CapturePreset,
        path: PathBuf,
        output_device: String,
    ) -> Result<Self, AudioError> {
        let supported = select_config(device, preset)?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        if config.sample_rate.0 != preset.sample_rate || config.channels != preset.channels {
            tracing::warn!(
                "Preset {} not supported by device. Recording at {}Hz, {} channels.",
                preset,
                config.sample_rate.0,
                config.channels
            );
        }

        let samples = Arc::new(Mutex::new(Vec::new()));
        let stream = match sample_format {
            SampleFormat::I16 => build_input::<i16>(device, &config, Arc::clone(&samples))?,
            SampleFormat::F32 => build_input::<f32>(device, &config, Arc::clone(&samples))?,
            other => return Err(AudioError::UnsupportedSampleFormat(other.to_string())),
        };
        stream.play()?;

        tracing::debug!(
            "Capture stream started: {}Hz, {} channels, {} -> {}",
            config.sample_rate.0,
            config.channels,
            sample_format,
            path.display()
        );

        Ok(Self {
            stream: Some(stream),
            samples,
            sample_rate: config.sample_rate.0,
            channels: config.channels,
            path,
            output_device,
            finalized: false,
        })
    }
}

impl CaptureHandle for CpalCapture {
    type Playable = CpalPlayer;

    fn finalize(&mut self) -> Result<(), AudioError> {
        if self.finalized {
            return Ok(());
        }
        self.stream = None;

        let samples = match self.samples.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };

        if samples.is_empty() {
            tracing::warn!("Recording stopped with no samples captured");
        }

        let frames = samples.len() / self.channels.max(1) as usize;
        tracing::info!(
            "Capture finalized: {:.2}s ({} frames at {}Hz)",
            frames as f32 / self.sample_rate.max(1) as f32,
            frames,
            self.sample_rate
        );

        write_wav(&self.path, &samples, self.sample_rate, self.channels)?;
        self.finalized = true;
        Ok(())
    }

    fn materialize_playable(&mut self) -> Result<(CpalPlayer, PlaybackStatus), AudioError> {
        if !self.finalized {
            return Err(AudioError::NotFinalized);
        }
        let clip = read_wav_mono(&self.path)?;
        let status = PlaybackStatus {
            duration_millis: clip.duration_millis(),
        };
        Ok((CpalPlayer::new(clip, self.output_device.clone()), status))
    }

    fn source_uri(&self) -> String {
        file_uri(&self.path)
    }
}

/// Percent-encoded `file://` URI for `path`.
///
/// Relative paths are resolved against the working directory first.
fn file_uri(path: &Path) -> String {
    let absolute = std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf());
    match Url::from_file_path(&absolute) {
        Ok(url) => url.to_string(),
        Err(()) => format!("file://{}", absolute.display()),
    }
}

/// Picks the device configuration closest to the preset.
fn select_config(
    device: &cpal::Device,
    preset: &CapturePreset,
) -> Result<cpal::SupportedStreamConfig, AudioError> {
    let rate = cpal::SampleRate(preset.sample_rate);
    let matching = device.supported_input_configs()?.find(|range| {
        range.channels() == preset.channels
            && range.min_sample_rate() <= rate
            && rate <= range.max_sample_rate()
            && matches!(range.sample_format(), SampleFormat::I16 | SampleFormat::F32)
    });

    match matching {
        Some(range) => Ok(range.with_sample_rate(rate)),
        None => Ok(device.default_input_config()?),
    }
}

fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    samples: Arc<Mutex<Vec<i16>>>,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample,
    i16: FromSample<T>,
{
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            if let Ok(mut buffer) = samples.lock() {
                buffer.extend(data.iter().map(|&s| s.to_sample::<i16>()));
            }
        },
        |err| {
            tracing::error!("Audio input stream error: {}", err);
        },
        None,
    )?;
    Ok(stream)
}
