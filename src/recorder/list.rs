//! Completed recordings and their transport controls.
//!
//! The list is append-only; a recording's index is its identity. Delete and
//! send are exposed as controls but are not implemented and never change the
//! list.

use crate::audio::{AudioError, PlayableHandle, PlaybackProgress};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A transport action on one recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Replay,
    Pause,
    Play,
    Delete,
    Send,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Replay => "replay",
            Self::Pause => "pause",
            Self::Play => "play",
            Self::Delete => "delete",
            Self::Send => "send",
        };
        f.write_str(name)
    }
}

/// Which controls a recording row offers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ControlLayout {
    /// Replay, pause, play, delete
    #[default]
    Standard,
    /// Standard plus send
    Extended,
}

impl ControlLayout {
    pub fn controls(self) -> &'static [Control] {
        match self {
            Self::Standard => &[Control::Replay, Control::Pause, Control::Play, Control::Delete],
            Self::Extended => &[
                Control::Replay,
                Control::Pause,
                Control::Play,
                Control::Delete,
                Control::Send,
            ],
        }
    }

    pub fn offers(self, control: Control) -> bool {
        self.controls().contains(&control)
    }
}

impl fmt::Display for ControlLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Extended => write!(f, "extended"),
        }
    }
}

/// Errors from transport actions.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0} is not implemented")]
    NotImplemented(Control),
    #[error("No recording at position {0}")]
    UnknownRecording(usize),
    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// A finished recording. Immutable once created.
pub struct CompletedRecording<H> {
    playable: H,
    duration: String,
    source_uri: String,
}

impl<H: PlayableHandle> CompletedRecording<H> {
    pub fn new(playable: H, duration: String, source_uri: String) -> Self {
        Self {
            playable,
            duration,
            source_uri,
        }
    }

    /// Duration label, `M:SS`.
    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    pub fn progress(&self) -> PlaybackProgress {
        self.playable.progress()
    }
}

/// Insertion-ordered recordings.
pub struct RecordingList<H> {
    entries: Vec<CompletedRecording<H>>,
}

impl<H> Default for RecordingList<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: PlayableHandle> RecordingList<H> {
    /// Appends a recording and returns its index.
    pub fn push(&mut self, recording: CompletedRecording<H>) -> usize {
        self.entries.push(recording);
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CompletedRecording<H>> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompletedRecording<H>> {
        self.entries.iter()
    }

    fn playable(&mut self, index: usize) -> Result<&mut H, TransportError> {
        self.entries
            .get_mut(index)
            .map(|entry| &mut entry.playable)
            .ok_or(TransportError::UnknownRecording(index))
    }

    /// Dispatches `control` to the recording at `index`.
    pub fn apply(&mut self, index: usize, control: Control) -> Result<(), TransportError> {
        match control {
            Control::Replay => self.replay(index),
            Control::Pause => self.pause(index),
            Control::Play => self.play(index),
            Control::Delete => self.delete(index),
            Control::Send => self.send(index),
        }
    }

    /// Seeks to the start, then stops.
    ///
    /// Stop is issued whether or not the seek succeeded. A seek failure is
    /// reported in preference to a stop failure.
    pub fn replay(&mut self, index: usize) -> Result<(), TransportError> {
        let playable = self.playable(index)?;
        let seek = playable.seek(Duration::ZERO);
        let stop = playable.stop();

        match (seek, stop) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(seek_err), stop) => {
                if let Err(stop_err) = stop {
                    tracing::warn!("Replay stop failed after seek failure: {}", stop_err);
                }
                Err(seek_err.into())
            }
            (Ok(()), Err(stop_err)) => Err(stop_err.into()),
        }
    }

    pub fn pause(&mut self, index: usize) -> Result<(), TransportError> {
        self.playable(index)?.pause()?;
        Ok(())
    }

    pub fn play(&mut self, index: usize) -> Result<(), TransportError> {
        self.playable(index)?.play()?;
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<(), TransportError> {
        self.playable(index)?;
        Err(TransportError::NotImplemented(Control::Delete))
    }

    pub fn send(&mut self, index: usize) -> Result<(), TransportError> {
        self.playable(index)?;
        Err(TransportError::NotImplemented(Control::Send))
    }
}
