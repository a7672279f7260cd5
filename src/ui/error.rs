//! Full-screen error message shown before the recorder screen can start.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::time::Duration;

const ERROR_BG: Color = Color::Rgb(255, 0, 0);
const ERROR_FG: Color = Color::Rgb(255, 255, 255);

/// Red screen with a centered message, dismissed by any key.
pub struct ErrorScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl ErrorScreen {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Shows `message` until a key is pressed.
    ///
    /// # Errors
    /// - If rendering or reading terminal events fails
    pub fn show_error(&mut self, message: &str) -> Result<()> {
        loop {
            self.terminal.draw(|frame| render_error(frame, message))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Release {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ErrorScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Paints the whole frame red and wraps `message` to 80% of the width.
pub fn render_error(frame: &mut Frame, message: &str) {
    let area = frame.area();
    frame
        .buffer_mut()
        .set_style(area, Style::default().bg(ERROR_BG));

    let text_area = Rect {
        x: area.x + area.width / 10,
        y: area.y + area.height / 2,
        width: (u32::from(area.width) * 80 / 100) as u16,
        height: area.height - area.height / 2,
    };

    let paragraph = Paragraph::new(Line::from(message))
        .style(Style::default().fg(ERROR_FG).bg(ERROR_BG))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, text_area);
}
