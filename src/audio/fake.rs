//! Scripted platform for tests; records every call in order.

use super::{
    AudioError, AudioPlatform, CaptureHandle, CapturePreset, Permission, PlayableHandle,
    PlaybackProgress, PlaybackStatus, SessionOptions,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// Shared call log.
pub type CallLog = Rc<RefCell<Vec<String>>>;

pub struct FakePlatform {
    pub permission: Permission,
    pub fail_begin: bool,
    pub fail_finalize: bool,
    pub fail_materialize: bool,
    pub fail_seek: bool,
    /// Durations reported by successive captures; 1000ms once exhausted
    pub durations: VecDeque<u64>,
    pub calls: CallLog,
    captures: usize,
}

impl FakePlatform {
    pub fn granting() -> Self {
        Self {
            permission: Permission::Granted,
            fail_begin: false,
            fail_finalize: false,
            fail_materialize: false,
            fail_seek: false,
            durations: VecDeque::new(),
            calls: Rc::new(RefCell::new(Vec::new())),
            captures: 0,
        }
    }

    pub fn denying() -> Self {
        Self {
            permission: Permission::Denied,
            ..Self::granting()
        }
    }

    pub fn with_durations(mut self, durations: &[u64]) -> Self {
        self.durations = durations.iter().copied().collect();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl AudioPlatform for FakePlatform {
    type Capture = FakeCapture;

    fn request_permission(&mut self) -> Result<Permission, AudioError> {
        self.calls.borrow_mut().push("request_permission".to_string());
        Ok(self.permission)
    }

    fn configure_session(&mut self, options: SessionOptions) -> Result<(), AudioError> {
        self.calls.borrow_mut().push(format!(
            "configure_session(recording={}, silent={})",
            options.allow_recording, options.plays_in_silent_mode
        ));
        Ok(())
    }

    fn begin_capture(&mut self, preset: &CapturePreset) -> Result<FakeCapture, AudioError> {
        self.calls
            .borrow_mut()
            .push(format!("begin_capture({})", preset.name));
        if self.fail_begin {
            return Err(AudioError::NoInputDevice);
        }
        self.captures += 1;
        Ok(FakeCapture {
            id: self.captures,
            duration_millis: self.durations.pop_front().unwrap_or(1_000),
            fail_finalize: self.fail_finalize,
            fail_materialize: self.fail_materialize,
            fail_seek: self.fail_seek,
            calls: Rc::clone(&self.calls),
        })
    }
}

pub struct FakeCapture {
    pub id: usize,
    duration_millis: u64,
    fail_finalize: bool,
    fail_materialize: bool,
    fail_seek: bool,
    calls: CallLog,
}

impl CaptureHandle for FakeCapture {
    type Playable = FakePlayable;

    fn finalize(&mut self) -> Result<(), AudioError> {
        self.calls
            .borrow_mut()
            .push(format!("finalize({})", self.id));
        if self.fail_finalize {
            return Err(AudioError::NotFinalized);
        }
        Ok(())
    }

    fn materialize_playable(&mut self) -> Result<(FakePlayable, PlaybackStatus), AudioError> {
        self.calls
            .borrow_mut()
            .push(format!("materialize_playable({})", self.id));
        if self.fail_materialize {
            return Err(AudioError::NotFinalized);
        }
        let playable = FakePlayable {
            id: self.id,
            fail_seek: self.fail_seek,
            progress: PlaybackProgress {
                position_millis: 0,
                duration_millis: self.duration_millis,
                is_playing: false,
            },
            calls: Rc::clone(&self.calls),
        };
        Ok((
            playable,
            PlaybackStatus {
                duration_millis: self.duration_millis,
            },
        ))
    }

    fn source_uri(&self) -> String {
        format!("file:///fake/recording-{}.wav", self.id)
    }
}

pub struct FakePlayable {
    pub id: usize,
    fail_seek: bool,
    progress: PlaybackProgress,
    calls: CallLog,
}

impl FakePlayable {
    fn log(&self, call: &str) {
        self.calls
            .borrow_mut()
            .push(format!("{call}({})", self.id));
    }
}

impl PlayableHandle for FakePlayable {
    fn seek(&mut self, position: Duration) -> Result<(), AudioError> {
        self.log("seek");
        if self.fail_seek {
            return Err(AudioError::NoOutputDevice);
        }
        self.progress.position_millis = position.as_millis() as u64;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.log("stop");
        self.progress.is_playing = false;
        self.progress.position_millis = 0;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        self.log("pause");
        self.progress.is_playing = false;
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.log("play");
        self.progress.is_playing = true;
        Ok(())
    }

    fn progress(&self) -> PlaybackProgress {
        self.progress
    }
}
