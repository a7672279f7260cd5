//! Screen session: routes commands to the recorder and builds render snapshots.

use super::input::ScreenCommand;
use crate::audio::{AudioPlatform, PlaybackProgress};
use crate::recorder::{
    AppState, Control, ControlLayout, RecordingController, StartOutcome, StopOutcome,
    ToggleOutcome, TransportError,
};
use std::time::{Duration, Instant};

/// How long a notice stays on screen.
const NOTICE_TTL: Duration = Duration::from_millis(1500);

/// Whether the event loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One recording row as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub label: String,
    pub progress: PlaybackProgress,
}

/// Everything the screen needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub status: String,
    pub is_recording: bool,
    pub elapsed: Option<Duration>,
    pub rows: Vec<RowView>,
    pub selected: Option<usize>,
    pub layout: ControlLayout,
    pub notice: Option<String>,
}

/// State and controller for one run of the recorder screen.
pub struct RecorderSession<P: AudioPlatform> {
    controller: RecordingController<P>,
    state: AppState<P>,
    layout: ControlLayout,
    selected: Option<usize>,
    notice: Option<(String, Instant)>,
}

impl<P: AudioPlatform> RecorderSession<P> {
    pub fn new(controller: RecordingController<P>, layout: ControlLayout) -> Self {
        Self {
            controller,
            state: AppState::default(),
            layout,
            selected: None,
            notice: None,
        }
    }

    pub fn state(&self) -> &AppState<P> {
        &self.state
    }

    /// Applies one command.
    pub fn handle(&mut self, command: ScreenCommand) -> Flow {
        match command {
            ScreenCommand::ToggleMic => self.toggle_mic(),
            ScreenCommand::SelectPrevious => {
                self.selected = self.selected.map(|i| i.saturating_sub(1));
            }
            ScreenCommand::SelectNext => {
                if !self.state.recordings.is_empty() {
                    let last = self.state.recordings.len() - 1;
                    self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
                }
            }
            ScreenCommand::Transport(control) => self.transport(control),
            ScreenCommand::Quit => {
                self.finish();
                return Flow::Quit;
            }
            ScreenCommand::None => {}
        }
        Flow::Continue
    }

    /// Stops a capture still running at exit so its file is flushed.
    pub fn finish(&mut self) {
        if !self.state.is_recording() {
            return;
        }
        tracing::info!("Exiting while recording; finalizing capture");
        if let Err(e) = self.controller.stop_capture(&mut self.state) {
            tracing::error!("Failed to finalize recording on exit: {}", e);
        }
    }

    fn toggle_mic(&mut self) {
        match self.controller.toggle(&mut self.state) {
            Ok(ToggleOutcome::Stop(StopOutcome::Appended { index })) => {
                self.selected = Some(index);
            }
            Ok(ToggleOutcome::Start(StartOutcome::Failed(_))) => {
                // Already logged by the controller; nothing is shown.
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Failed to save recording: {}", e);
                self.show_notice(format!("Could not save recording: {e}"));
            }
        }
    }

    fn transport(&mut self, control: Control) {
        let Some(index) = self.selected else {
            return;
        };
        let target = self
            .state
            .recordings
            .get(index)
            .map_or_else(|| format!("#{}", index + 1), |r| r.source_uri().to_string());

        match self.state.recordings.apply(index, control) {
            Ok(()) => tracing::debug!("{} {}", control, target),
            Err(TransportError::NotImplemented(control)) => {
                tracing::info!("{} requested for {}: not implemented", control, target);
                self.show_notice(format!("{control} is not implemented"));
            }
            Err(e) => {
                tracing::warn!("{} failed for {}: {}", control, target, e);
                self.show_notice(format!("{control} failed: {e}"));
            }
        }
    }

    fn show_notice(&mut self, message: String) {
        self.notice = Some((message, Instant::now()));
    }

    /// Snapshot for rendering. Drops an expired notice.
    pub fn view(&mut self) -> ScreenView {
        if self
            .notice
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() >= NOTICE_TTL)
        {
            self.notice = None;
        }

        ScreenView {
            status: self.state.status.message().to_string(),
            is_recording: self.state.is_recording(),
            elapsed: self.state.capture.elapsed(),
            rows: self
                .state
                .recordings
                .iter()
                .enumerate()
                .map(|(i, recording)| RowView {
                    label: format!("Recording {} - {}", i + 1, recording.duration()),
                    progress: recording.progress(),
                })
                .collect(),
            selected: self.selected,
            layout: self.layout,
            notice: self.notice.as_ref().map(|(message, _)| message.clone()),
        }
    }
}
