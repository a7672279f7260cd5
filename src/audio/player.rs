//! Clip playback through cpal.
//!
//! Each player owns a decoded mono clip and a cursor shared with the output
//! callback. The output stream is opened on play and dropped again on pause,
//! stop, or once the clip has run out, so an idle clip never holds the device.

use super::device::{find_device, quiet_stderr, Direction};
use super::wav::MonoClip;
use super::{AudioError, PlayableHandle, PlaybackProgress};
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use std::cell::RefCell;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Read head over a clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackCursor {
    /// Position in clip frames; fractional when the device rate differs
    pub position: f64,
    pub is_playing: bool,
}

/// A finalized clip with transport controls.
pub struct CpalPlayer {
    samples: Arc<[f32]>,
    sample_rate: u32,
    cursor: Arc<Mutex<PlaybackCursor>>,
    output_device: String,
    stream: StreamSlot<cpal::Stream>,
}

/// Holds at most one open output stream.
///
/// Interior mutability lets `progress(&self)` release a stream whose clip
/// has finished.
pub(crate) struct StreamSlot<S> {
    stream: RefCell<Option<S>>,
}

impl<S> StreamSlot<S> {
    pub(crate) fn empty() -> Self {
        Self {
            stream: RefCell::new(None),
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.stream.borrow().is_some()
    }

    pub(crate) fn open(&self, stream: S) {
        *self.stream.borrow_mut() = Some(stream);
    }

    /// Drops the stream. Returns whether one was open.
    pub(crate) fn release(&self) -> bool {
        self.stream.borrow_mut().take().is_some()
    }
}

impl CpalPlayer {
    pub fn new(clip: MonoClip, output_device: String) -> Self {
        Self {
            samples: clip.samples.into(),
            sample_rate: clip.sample_rate,
            cursor: Arc::new(Mutex::new(PlaybackCursor {
                position: 0.0,
                is_playing: false,
            })),
            output_device,
            stream: StreamSlot::empty(),
        }
    }

    fn cursor(&self) -> MutexGuard<'_, PlaybackCursor> {
        lock_cursor(&self.cursor)
    }

    fn frame_count(&self) -> f64 {
        self.samples.len() as f64
    }

    fn release_output(&self) {
        if self.stream.release() {
            tracing::debug!("Playback stream released");
        }
    }

    fn ensure_stream(&mut self) -> Result<(), AudioError> {
        if self.stream.is_open() {
            return Ok(());
        }

        let output_spec = self.output_device.clone();
        let device = quiet_stderr(|| {
            let host = cpal::default_host();
            find_device(&host, Direction::Output, &output_spec)
        })?;

        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let step = self.sample_rate as f64 / config.sample_rate.0.max(1) as f64;

        let stream = match sample_format {
            SampleFormat::I16 => self.build_output::<i16>(&device, &config, step)?,
            SampleFormat::F32 => self.build_output::<f32>(&device, &config, step)?,
            other => return Err(AudioError::UnsupportedSampleFormat(other.to_string())),
        };
        stream.play()?;

        tracing::debug!(
            "Playback stream opened: {}Hz clip on {}Hz, {} channel device",
            self.sample_rate,
            config.sample_rate.0,
            config.channels
        );
        self.stream.open(stream);
        Ok(())
    }

    fn build_output<T>(
        &self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        step: f64,
    ) -> Result<cpal::Stream, AudioError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let samples = Arc::clone(&self.samples);
        let cursor = Arc::clone(&self.cursor);
        let channels = config.channels.max(1) as usize;

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let mut cursor = lock_cursor(&cursor);
                for frame in data.chunks_mut(channels) {
                    let value = next_sample(&samples, &mut cursor, step);
                    frame.fill(T::from_sample(value));
                }
            },
            |err| {
                tracing::error!("Audio output stream error: {}", err);
            },
            None,
        )?;
        Ok(stream)
    }
}

impl PlayableHandle for CpalPlayer {
    fn seek(&mut self, position: Duration) -> Result<(), AudioError> {
        let target = position.as_secs_f64() * self.sample_rate as f64;
        let frames = self.frame_count();
        self.cursor().position = target.clamp(0.0, frames);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        {
            let mut cursor = self.cursor();
            cursor.is_playing = false;
            cursor.position = 0.0;
        }
        self.release_output();
        Ok(())
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        self.cursor().is_playing = false;
        self.release_output();
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let frames = self.frame_count();
        if frames == 0.0 {
            return Ok(());
        }
        self.ensure_stream()?;
        let mut cursor = self.cursor();
        if cursor.position >= frames {
            cursor.position = 0.0;
        }
        cursor.is_playing = true;
        Ok(())
    }

    /// Current position. Releases the output stream once the clip has ended.
    fn progress(&self) -> PlaybackProgress {
        let cursor = *self.cursor();
        if !cursor.is_playing {
            self.release_output();
        }
        let rate = self.sample_rate.max(1) as f64;
        PlaybackProgress {
            position_millis: (cursor.position / rate * 1000.0) as u64,
            duration_millis: (self.frame_count() / rate * 1000.0) as u64,
            is_playing: cursor.is_playing,
        }
    }
}

fn lock_cursor(cursor: &Mutex<PlaybackCursor>) -> MutexGuard<'_, PlaybackCursor> {
    match cursor.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Produces the next output sample and advances the cursor by `step` frames.
///
/// Returns silence while paused. Reaching the end of the clip clears
/// `is_playing` and leaves the cursor at the end.
pub(crate) fn next_sample(samples: &[f32], cursor: &mut PlaybackCursor, step: f64) -> f32 {
    if !cursor.is_playing {
        return 0.0;
    }

    let index = cursor.position as usize;
    match samples.get(index) {
        Some(&value) => {
            cursor.position = (cursor.position + step).min(samples.len() as f64);
            value
        }
        None => {
            cursor.position = samples.len() as f64;
            cursor.is_playing = false;
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn player(samples: Vec<f32>, sample_rate: u32) -> CpalPlayer {
        CpalPlayer::new(
            MonoClip {
                samples,
                sample_rate,
            },
            "default".to_string(),
        )
    }

    #[test]
    fn test_next_sample_is_silent_while_paused() {
        let mut cursor = PlaybackCursor {
            position: 0.0,
            is_playing: false,
        };
        assert_eq!(next_sample(&[0.5, 0.25], &mut cursor, 1.0), 0.0);
        assert_eq!(cursor.position, 0.0);
    }

    #[test]
    fn test_next_sample_steps_and_stops_at_end() {
        let samples = [0.1, 0.2, 0.3, 0.4];
        let mut cursor = PlaybackCursor {
            position: 0.0,
            is_playing: true,
        };

        // Half-rate device: every other clip frame
        assert_eq!(next_sample(&samples, &mut cursor, 2.0), 0.1);
        assert_eq!(next_sample(&samples, &mut cursor, 2.0), 0.3);
        assert!(cursor.is_playing);
        assert_eq!(next_sample(&samples, &mut cursor, 2.0), 0.0);
        assert!(!cursor.is_playing);
        assert_eq!(cursor.position, 4.0);
    }

    #[test]
    fn test_seek_clamps_and_stop_rewinds() {
        let mut player = player(vec![0.0; 1_000], 1_000);

        player.seek(Duration::from_millis(400)).unwrap();
        assert_eq!(player.progress().position_millis, 400);

        player.seek(Duration::from_secs(5)).unwrap();
        assert_eq!(player.progress().position_millis, 1_000);

        player.stop().unwrap();
        let progress = player.progress();
        assert_eq!(progress.position_millis, 0);
        assert_eq!(progress.duration_millis, 1_000);
        assert!(!progress.is_playing);
    }

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_stream_slot_drops_released_stream() {
        let drops = Rc::new(Cell::new(0));
        let slot = StreamSlot::empty();
        assert!(!slot.release());

        slot.open(DropCounter(Rc::clone(&drops)));
        assert!(slot.is_open());
        assert!(slot.release());
        assert!(!slot.is_open());
        assert_eq!(drops.get(), 1);
        assert!(!slot.release());
    }

    #[test]
    fn test_idle_player_holds_no_stream() {
        let mut player = player(vec![0.0; 1_000], 1_000);
        player.seek(Duration::from_millis(300)).unwrap();
        player.pause().unwrap();
        assert!(!player.stream.is_open());
        player.stop().unwrap();
        assert!(!player.stream.is_open());
        let _ = player.progress();
        assert!(!player.stream.is_open());
    }

    #[test]
    fn test_playing_empty_clip_opens_nothing() {
        let mut player = player(Vec::new(), 1_000);
        player.play().unwrap();
        assert!(!player.stream.is_open());
        assert!(!player.progress().is_playing);
    }

    #[test]
    fn test_pause_keeps_position() {
        let mut player = player(vec![0.0; 2_000], 1_000);
        player.seek(Duration::from_millis(1_250)).unwrap();
        player.pause().unwrap();
        assert_eq!(player.progress().position_millis, 1_250);
    }
}
