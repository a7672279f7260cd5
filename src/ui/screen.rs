//! Recorder screen: title, status line, mic toggle and the recordings list.

use super::input::{command_for_key, key_hint, ScreenCommand};
use super::session::{RowView, ScreenView};
use crate::recorder::{format_duration, Control, ControlLayout};
use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, ListState, Padding, Paragraph},
};
use std::io::{self, Stdout};
use std::time::Duration;

pub const TITLE: &str = "RECORDING APP";

const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const DIM_FG: Color = Color::Rgb(100, 100, 100);
const HIGHLIGHT_BG: Color = Color::Rgb(20, 20, 20);
const MIC_ACTIVE: Color = Color::Rgb(255, 0, 0);
const MIC_IDLE: Color = Color::Rgb(128, 128, 128);
const CONTROL_FG: Color = Color::Rgb(255, 182, 193);
const NOTICE_BG: Color = Color::Yellow;

/// Owns the terminal while the recorder screen is up.
pub struct RecorderScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl RecorderScreen {
    /// Enters raw mode and the alternate screen.
    ///
    /// # Errors
    /// - If raw mode cannot be enabled
    /// - If the terminal cannot be initialized
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, view: &ScreenView) -> Result<()> {
        self.terminal.draw(|frame| render(frame, view))?;
        Ok(())
    }

    /// Decodes the next pending key press without blocking.
    pub fn pending_command(&mut self, layout: ControlLayout) -> Result<Option<ScreenCommand>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                return Ok(Some(command_for_key(key, layout)));
            }
        }
        Ok(None)
    }

    /// Restores the terminal.
    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        tracing::debug!("Recorder screen terminal cleanup complete");
        Ok(())
    }
}

impl Drop for RecorderScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Draws one frame from `view`.
pub fn render(frame: &mut Frame, view: &ScreenView) {
    let area = frame.area();

    let padding_block = Block::default()
        .padding(Padding::uniform(1))
        .style(Style::default().fg(FG).bg(BG));
    frame.render_widget(&padding_block, area);
    let inner_area = padding_block.inner(area);

    let [title_area, status_area, mic_area, state_area, list_area, footer_area] =
        Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner_area);

    let title = Paragraph::new(TITLE)
        .style(Style::default().fg(FG).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, title_area);

    let status = Paragraph::new(view.status.as_str())
        .style(Style::default().fg(MIC_ACTIVE))
        .alignment(Alignment::Center);
    frame.render_widget(status, status_area);

    render_mic(frame, mic_area, view.is_recording);

    let state_label = match view.elapsed {
        Some(elapsed) if view.is_recording => format!("stop  {}", clock(elapsed)),
        _ if view.is_recording => "stop".to_string(),
        _ => "start".to_string(),
    };
    let state = Paragraph::new(state_label)
        .style(Style::default().fg(FG))
        .alignment(Alignment::Center);
    frame.render_widget(state, state_area);

    render_recordings(frame, list_area, view);

    let help = Paragraph::new(help_text(view.layout))
        .alignment(Alignment::Center)
        .style(Style::default().fg(DIM_FG));
    frame.render_widget(help, footer_area);

    if let Some(message) = &view.notice {
        render_notice(frame, area, message);
    }
}

fn render_mic(frame: &mut Frame, area: Rect, is_recording: bool) {
    let color = if is_recording { MIC_ACTIVE } else { MIC_IDLE };
    let mic = Paragraph::new(vec![
        Line::from("╭───╮"),
        Line::from(vec![
            Span::raw("│ "),
            Span::styled("●", Style::default().fg(color)),
            Span::raw(" │"),
        ]),
        Line::from("╰───╯"),
    ])
    .style(Style::default().fg(color))
    .alignment(Alignment::Center);
    frame.render_widget(mic, area);
}

fn render_recordings(frame: &mut Frame, area: Rect, view: &ScreenView) {
    let block = Block::default()
        .title(" Recordings ")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1));

    if view.rows.is_empty() {
        let empty = Paragraph::new("No recordings yet")
            .style(Style::default().fg(DIM_FG))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = view
        .rows
        .iter()
        .map(|row| ListItem::new(row_line(row, view.layout)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(HIGHLIGHT_BG))
        .highlight_symbol("> ")
        .highlight_spacing(HighlightSpacing::Always);

    let mut list_state = ListState::default();
    list_state.select(view.selected);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn row_line(row: &RowView, layout: ControlLayout) -> Line<'static> {
    let mut spans = vec![Span::styled(row.label.clone(), Style::default().fg(FG))];

    for &control in layout.controls() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} {}", control_icon(control), key_hint(control)),
            Style::default().fg(CONTROL_FG),
        ));
    }

    let progress = row.progress;
    if progress.is_playing || progress.position_millis > 0 {
        let marker = if progress.is_playing { "▶" } else { "⏸" };
        spans.push(Span::styled(
            format!(
                "   {} {} / {}",
                marker,
                format_duration(progress.position_millis),
                format_duration(progress.duration_millis)
            ),
            Style::default().fg(DIM_FG),
        ));
    }

    Line::from(spans)
}

fn control_icon(control: Control) -> &'static str {
    match control {
        Control::Replay => "⟲",
        Control::Pause => "⏸",
        Control::Play => "▶",
        Control::Delete => "✕",
        Control::Send => "➤",
    }
}

fn help_text(layout: ControlLayout) -> &'static str {
    match layout {
        ControlLayout::Standard => {
            "space mic, ↑↓ select, r replay, p pause, ↵ play, d delete, esc/q exit"
        }
        ControlLayout::Extended => {
            "space mic, ↑↓ select, r replay, p pause, ↵ play, d delete, s send, esc/q exit"
        }
    }
}

/// Live capture timer, `M:SS`.
fn clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Centered notice modal.
fn render_notice(frame: &mut Frame, screen_area: Rect, message: &str) {
    let modal_width = (message.chars().count() as u16).saturating_add(4);
    let modal_height = 3;

    let modal_area = Rect {
        x: screen_area.x + (screen_area.width.saturating_sub(modal_width)) / 2,
        y: screen_area.y + (screen_area.height.saturating_sub(modal_height)) / 2,
        width: modal_width.min(screen_area.width),
        height: modal_height.min(screen_area.height),
    };

    let modal_block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(NOTICE_BG).fg(Color::Black));
    frame.render_widget(&modal_block, modal_area);

    let text = Paragraph::new(message)
        .style(Style::default().bg(NOTICE_BG).fg(Color::Black))
        .alignment(Alignment::Center);
    frame.render_widget(text, modal_block.inner(modal_area));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::PlaybackProgress;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn screen_text(buffer: &Buffer) -> String {
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(view: &ScreenView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 24)).unwrap();
        terminal.draw(|frame| render(frame, view)).unwrap();
        screen_text(terminal.backend().buffer())
    }

    fn view() -> ScreenView {
        ScreenView {
            status: String::new(),
            is_recording: false,
            elapsed: None,
            rows: Vec::new(),
            selected: None,
            layout: ControlLayout::Standard,
            notice: None,
        }
    }

    #[test]
    fn test_idle_screen() {
        let text = draw(&view());
        assert!(text.contains(TITLE));
        assert!(text.contains("start"));
        assert!(text.contains("No recordings yet"));
    }

    #[test]
    fn test_recording_screen_with_rows() {
        let mut view = view();
        view.is_recording = true;
        view.elapsed = Some(Duration::from_secs(75));
        view.status = "Please grant permission to app to access microphone".to_string();
        view.selected = Some(1);
        view.rows = vec![
            RowView {
                label: "Recording 1 - 0:05".to_string(),
                progress: PlaybackProgress::default(),
            },
            RowView {
                label: "Recording 2 - 1:30".to_string(),
                progress: PlaybackProgress {
                    position_millis: 2_000,
                    duration_millis: 90_000,
                    is_playing: true,
                },
            },
        ];

        let text = draw(&view);
        assert!(text.contains("stop  1:15"));
        assert!(text.contains("Please grant permission"));
        assert!(text.contains("Recording 1 - 0:05"));
        assert!(text.contains("> Recording 2 - 1:30"));
        assert!(text.contains("0:02 / 1:30"));
    }

    #[test]
    fn test_notice_is_drawn() {
        let mut view = view();
        view.notice = Some("delete is not implemented".to_string());
        assert!(draw(&view).contains("delete is not implemented"));
    }
}
