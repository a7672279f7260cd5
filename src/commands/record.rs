//! The recorder screen.
//!
//! Records clips from the microphone into an in-memory list with per-row
//! playback controls. `SIGUSR1` toggles the microphone from outside.

use crate::audio::CpalPlatform;
use crate::config::{MicdeckConfig, PresetName};
use crate::recorder::{ControlLayout, RecordingController};
use crate::ui::input::ScreenCommand;
use crate::ui::{ErrorScreen, Flow, RecorderScreen, RecorderSession};
use anyhow::Context;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Redraw interval.
const TICK: Duration = Duration::from_millis(50);

/// Runs the recorder screen until the user quits.
///
/// `preset` and `controls` override the configured values.
pub async fn handle_record(
    preset: Option<PresetName>,
    controls: Option<ControlLayout>,
) -> Result<(), anyhow::Error> {
    tracing::info!("=== micdeck recorder started ===");

    let config = match MicdeckConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err:#}");
            let error_message = format!(
                "Configuration Error:\n\n{err:#}\n\nPlease check your ~/.config/micdeck/micdeck.toml file and try again."
            );
            let mut error_screen = ErrorScreen::new()?;
            error_screen.show_error(&error_message)?;
            error_screen.cleanup()?;
            return Err(err.context("Configuration error"));
        }
    };

    let preset = preset.unwrap_or(config.audio.preset).preset();
    let layout = controls.unwrap_or(config.ui.controls);
    let recordings_dir = config.storage.recordings_dir()?;

    tracing::info!(
        "Configuration loaded: input={}, output={}, preset={}, controls={}, recordings={}",
        config.audio.input_device,
        config.audio.output_device,
        preset,
        layout,
        recordings_dir.display()
    );

    let platform = CpalPlatform::new(
        config.audio.input_device,
        config.audio.output_device,
        recordings_dir,
    );
    let mut session = RecorderSession::new(RecordingController::new(platform, preset), layout);

    let toggle_requested = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&toggle_requested))
        .context("Failed to register signal handler")?;

    let mut screen = RecorderScreen::new().context("Failed to initialize UI")?;
    let result = run_loop(&mut screen, &mut session, &toggle_requested, layout).await;

    session.finish();
    screen.cleanup().context("Cleanup failed")?;

    tracing::info!(
        "=== micdeck recorder exited with {} recording(s) ===",
        session.state().recordings.len()
    );
    result
}

/// Redraws once per tick and drains pending key presses in between.
async fn run_loop(
    screen: &mut RecorderScreen,
    session: &mut RecorderSession<CpalPlatform>,
    toggle_requested: &AtomicBool,
    layout: ControlLayout,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        if toggle_requested.swap(false, Ordering::Relaxed) {
            tracing::info!("Received SIGUSR1: toggling microphone");
            session.handle(ScreenCommand::ToggleMic);
        }

        screen.draw(&session.view()).context("Render failed")?;

        while let Some(command) = screen
            .pending_command(layout)
            .context("Input handling error")?
        {
            if session.handle(command) == Flow::Quit {
                return Ok(());
            }
        }
    }
}
