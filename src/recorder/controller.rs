//! Recording lifecycle: `Idle -> Recording -> Idle`.
//!
//! Calls that don't fit the current state are ignored rather than queued, so
//! the single capture slot can never hold two handles.

use super::duration::format_duration;
use super::list::CompletedRecording;
use super::state::{ActiveCapture, AppState, CaptureState};
use super::status::PERMISSION_PROMPT;
use crate::audio::{
    AudioError, AudioPlatform, CaptureHandle, CapturePreset, Permission, SessionOptions,
};
use std::time::Instant;

/// Result of a start request.
#[derive(Debug)]
pub enum StartOutcome {
    Started,
    /// Access refused; the status message was updated.
    PermissionDenied,
    /// Setup failed; logged only.
    Failed(AudioError),
    /// A capture is already in progress.
    Ignored,
}

/// Result of a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The capture became a new recording at `index`.
    Appended { index: usize },
    /// Nothing was recording.
    Ignored,
}

/// Result of the mic toggle.
#[derive(Debug)]
pub enum ToggleOutcome {
    Start(StartOutcome),
    Stop(StopOutcome),
}

/// Starts and stops captures on a platform.
pub struct RecordingController<P: AudioPlatform> {
    platform: P,
    preset: CapturePreset,
    session: SessionOptions,
}

impl<P: AudioPlatform> RecordingController<P> {
    pub fn new(platform: P, preset: CapturePreset) -> Self {
        Self {
            platform,
            preset,
            session: SessionOptions::RECORDING,
        }
    }

    #[cfg(test)]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Requests access and begins a capture.
    pub fn start_capture(&mut self, state: &mut AppState<P>) -> StartOutcome {
        if state.is_recording() {
            tracing::debug!("Start ignored: already recording");
            return StartOutcome::Ignored;
        }

        match self.begin() {
            Ok(Some(handle)) => {
                state.capture = CaptureState::Recording(ActiveCapture {
                    handle,
                    started_at: Instant::now(),
                });
                tracing::info!("Recording started ({})", self.preset);
                StartOutcome::Started
            }
            Ok(None) => {
                tracing::info!("Microphone permission denied");
                state.status.set(PERMISSION_PROMPT);
                StartOutcome::PermissionDenied
            }
            Err(e) => {
                tracing::error!("Failed to start recording: {}", e);
                StartOutcome::Failed(e)
            }
        }
    }

    fn begin(&mut self) -> Result<Option<P::Capture>, AudioError> {
        if self.platform.request_permission()? == Permission::Denied {
            return Ok(None);
        }
        self.platform.configure_session(self.session)?;
        let handle = self.platform.begin_capture(&self.preset)?;
        Ok(Some(handle))
    }

    /// Finalizes the current capture and appends it to the list.
    ///
    /// The capture slot is cleared before teardown starts and stays cleared
    /// if teardown fails.
    ///
    /// # Errors
    /// - If the capture cannot be finalized
    /// - If the finalized data cannot be loaded for playback
    pub fn stop_capture(&mut self, state: &mut AppState<P>) -> Result<StopOutcome, AudioError> {
        let mut active = match std::mem::replace(&mut state.capture, CaptureState::Idle) {
            CaptureState::Recording(active) => active,
            CaptureState::Idle => {
                tracing::debug!("Stop ignored: not recording");
                return Ok(StopOutcome::Ignored);
            }
        };

        active.handle.finalize()?;
        let (playable, status) = active.handle.materialize_playable()?;
        let duration = format_duration(status.duration_millis);
        let source_uri = active.handle.source_uri();

        tracing::info!(
            "Recording stopped: {} ({}ms) at {}",
            duration,
            status.duration_millis,
            source_uri
        );

        let index = state
            .recordings
            .push(CompletedRecording::new(playable, duration, source_uri));
        Ok(StopOutcome::Appended { index })
    }

    /// Starts when idle, stops when recording.
    ///
    /// # Errors
    /// - If stopping fails (see [`Self::stop_capture`])
    pub fn toggle(&mut self, state: &mut AppState<P>) -> Result<ToggleOutcome, AudioError> {
        if state.is_recording() {
            self.stop_capture(state).map(ToggleOutcome::Stop)
        } else {
            Ok(ToggleOutcome::Start(self.start_capture(state)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fake::FakePlatform;

    fn setup(platform: FakePlatform) -> (RecordingController<FakePlatform>, AppState<FakePlatform>) {
        (
            RecordingController::new(platform, CapturePreset::default()),
            AppState::default(),
        )
    }

    #[test]
    fn test_cycle_appends_one_recording() {
        let (mut controller, mut state) = setup(FakePlatform::granting().with_durations(&[125_000]));

        assert!(matches!(controller.start_capture(&mut state), StartOutcome::Started));
        assert!(state.is_recording());
        assert!(state.recordings.is_empty());

        let outcome = controller.stop_capture(&mut state).unwrap();
        assert_eq!(outcome, StopOutcome::Appended { index: 0 });
        assert!(!state.is_recording());
        assert_eq!(state.recordings.len(), 1);

        let recording = state.recordings.get(0).unwrap();
        assert_eq!(recording.duration(), "2:05");
        assert_eq!(recording.source_uri(), "file:///fake/recording-1.wav");
        assert_eq!(
            controller.platform().calls(),
            vec![
                "request_permission",
                "configure_session(recording=true, silent=true)",
                "begin_capture(high)",
                "finalize(1)",
                "materialize_playable(1)",
            ]
        );
    }

    #[test]
    fn test_cycles_append_in_completion_order() {
        let (mut controller, mut state) =
            setup(FakePlatform::granting().with_durations(&[5_000, 90_000, 60_000]));

        for expected in 0..3 {
            controller.start_capture(&mut state);
            let outcome = controller.stop_capture(&mut state).unwrap();
            assert_eq!(outcome, StopOutcome::Appended { index: expected });
            assert_eq!(state.recordings.len(), expected + 1);
        }

        let durations: Vec<&str> = state.recordings.iter().map(|r| r.duration()).collect();
        assert_eq!(durations, vec!["0:05", "1:30", "1:00"]);
    }

    #[test]
    fn test_permission_denied_sets_status() {
        let (mut controller, mut state) = setup(FakePlatform::denying());

        assert!(matches!(
            controller.start_capture(&mut state),
            StartOutcome::PermissionDenied
        ));
        assert!(!state.is_recording());
        assert!(state.recordings.is_empty());
        assert_eq!(state.status.message(), PERMISSION_PROMPT);
        assert_eq!(controller.platform().calls(), vec!["request_permission"]);
    }

    #[test]
    fn test_start_failure_is_not_surfaced() {
        let mut platform = FakePlatform::granting();
        platform.fail_begin = true;
        let (mut controller, mut state) = setup(platform);

        assert!(matches!(
            controller.start_capture(&mut state),
            StartOutcome::Failed(AudioError::NoInputDevice)
        ));
        assert!(!state.is_recording());
        assert_eq!(state.status.message(), "");
    }

    #[test]
    fn test_start_while_recording_keeps_handle() {
        let (mut controller, mut state) = setup(FakePlatform::granting());

        controller.start_capture(&mut state);
        assert!(matches!(controller.start_capture(&mut state), StartOutcome::Ignored));

        match &state.capture {
            CaptureState::Recording(active) => assert_eq!(active.handle.id, 1),
            CaptureState::Idle => panic!("expected an active capture"),
        }
        let begins = controller
            .platform()
            .calls()
            .iter()
            .filter(|call| call.starts_with("begin_capture"))
            .count();
        assert_eq!(begins, 1);
    }

    #[test]
    fn test_stop_while_idle_is_ignored() {
        let (mut controller, mut state) = setup(FakePlatform::granting());

        assert_eq!(controller.stop_capture(&mut state).unwrap(), StopOutcome::Ignored);
        assert!(state.recordings.is_empty());
        assert!(controller.platform().calls().is_empty());
    }

    #[test]
    fn test_failed_stop_leaves_state_idle() {
        let mut platform = FakePlatform::granting();
        platform.fail_finalize = true;
        let (mut controller, mut state) = setup(platform);

        controller.start_capture(&mut state);
        assert!(controller.stop_capture(&mut state).is_err());
        assert!(!state.is_recording());
        assert!(state.recordings.is_empty());
    }

    #[test]
    fn test_materialize_failure_adds_no_row() {
        let mut platform = FakePlatform::granting();
        platform.fail_materialize = true;
        let (mut controller, mut state) = setup(platform);

        controller.start_capture(&mut state);
        assert!(matches!(
            controller.stop_capture(&mut state),
            Err(AudioError::NotFinalized)
        ));
        assert!(!state.is_recording());
        assert!(state.recordings.is_empty());
        assert_eq!(
            controller.platform().calls(),
            vec![
                "request_permission",
                "configure_session(recording=true, silent=true)",
                "begin_capture(high)",
                "finalize(1)",
                "materialize_playable(1)",
            ]
        );

        // The cleared slot accepts a new capture
        assert!(matches!(controller.start_capture(&mut state), StartOutcome::Started));
    }

    #[test]
    fn test_toggle_alternates() {
        let (mut controller, mut state) = setup(FakePlatform::granting());

        assert!(matches!(
            controller.toggle(&mut state).unwrap(),
            ToggleOutcome::Start(StartOutcome::Started)
        ));
        assert!(matches!(
            controller.toggle(&mut state).unwrap(),
            ToggleOutcome::Stop(StopOutcome::Appended { index: 0 })
        ));
        assert!(!state.is_recording());
    }
}
