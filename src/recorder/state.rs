//! Screen state owned by the recorder and passed to every handler.

use super::list::RecordingList;
use super::status::StatusReporter;
use crate::audio::{AudioPlatform, PlayableOf};
use std::time::{Duration, Instant};

/// A capture that has started and not yet been stopped.
pub struct ActiveCapture<C> {
    pub handle: C,
    pub started_at: Instant,
}

/// Microphone state. At most one capture is in progress.
pub enum CaptureState<C> {
    Idle,
    Recording(ActiveCapture<C>),
}

impl<C> CaptureState<C> {
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording(_))
    }

    /// Time since the current capture started.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            Self::Idle => None,
            Self::Recording(active) => Some(active.started_at.elapsed()),
        }
    }
}

/// Everything the recorder screen displays.
pub struct AppState<P: AudioPlatform> {
    pub capture: CaptureState<P::Capture>,
    pub recordings: RecordingList<PlayableOf<P>>,
    pub status: StatusReporter,
}

impl<P: AudioPlatform> Default for AppState<P> {
    fn default() -> Self {
        Self {
            capture: CaptureState::Idle,
            recordings: RecordingList::default(),
            status: StatusReporter::default(),
        }
    }
}

impl<P: AudioPlatform> AppState<P> {
    pub fn is_recording(&self) -> bool {
        self.capture.is_recording()
    }
}
