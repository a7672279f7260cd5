//! WAV storage for finalized captures.

use super::AudioError;
use chrono::{DateTime, Local};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};

/// Decoded clip ready for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl MonoClip {
    pub fn duration_millis(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }
}

/// Builds the file path for a capture started at `started_at`.
pub fn recording_path(dir: &Path, started_at: DateTime<Local>, extension: &str) -> PathBuf {
    dir.join(format!(
        "recording-{}.{extension}",
        started_at.format("%Y%m%d-%H%M%S%.3f")
    ))
}

/// Writes interleaved 16-bit PCM samples.
pub fn write_wav(
    path: &Path,
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
) -> Result<(), AudioError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    tracing::debug!(
        "WAV written: {} ({} samples, {}Hz, {} ch)",
        path.display(),
        samples.len(),
        sample_rate,
        channels
    );
    Ok(())
}

/// Reads a WAV file and averages its channels into one.
pub fn read_wav_mono(path: &Path) -> Result<MonoClip, AudioError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let samples = interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    Ok(MonoClip {
        samples,
        sample_rate: spec.sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stereo_file_is_read_back_as_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("clip.wav");

        // Two frames: (max, 0) and (-max, -max)
        let samples = [i16::MAX, 0, i16::MIN + 1, i16::MIN + 1];
        write_wav(&path, &samples, 8_000, 2).unwrap();

        let clip = read_wav_mono(&path).unwrap();
        assert_eq!(clip.sample_rate, 8_000);
        assert_eq!(clip.samples.len(), 2);
        assert!((clip.samples[0] - 0.5).abs() < 0.001);
        assert!((clip.samples[1] + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_duration_from_frame_count() {
        let clip = MonoClip {
            samples: vec![0.0; 44_100 * 3 / 2],
            sample_rate: 44_100,
        };
        assert_eq!(clip.duration_millis(), 1_500);

        let empty = MonoClip {
            samples: Vec::new(),
            sample_rate: 0,
        };
        assert_eq!(empty.duration_millis(), 0);
    }

    #[test]
    fn test_recording_path_uses_start_time() {
        let started = Local.with_ymd_and_hms(2026, 10, 14, 9, 5, 7).unwrap();
        let path = recording_path(Path::new("/tmp/clips"), started, "wav");
        assert_eq!(
            path,
            PathBuf::from("/tmp/clips/recording-20261014-090507.000.wav")
        );
    }
}
