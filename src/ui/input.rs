//! Key bindings for the recorder screen.

use crate::recorder::{Control, ControlLayout};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// User intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenCommand {
    /// Mic icon: start when idle, stop when recording
    ToggleMic,
    SelectPrevious,
    SelectNext,
    /// Transport action on the selected recording
    Transport(Control),
    Quit,
    None,
}

/// Maps a key event to a command.
///
/// Controls not offered by `layout` map to [`ScreenCommand::None`].
pub fn command_for_key(key: KeyEvent, layout: ControlLayout) -> ScreenCommand {
    if key.kind == KeyEventKind::Release {
        return ScreenCommand::None;
    }

    let command = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => ScreenCommand::Quit,
        KeyCode::Char('q') | KeyCode::Esc => ScreenCommand::Quit,
        KeyCode::Char(' ') | KeyCode::Char('m') => ScreenCommand::ToggleMic,
        KeyCode::Up | KeyCode::Char('k') => ScreenCommand::SelectPrevious,
        KeyCode::Down | KeyCode::Char('j') => ScreenCommand::SelectNext,
        KeyCode::Char('r') => ScreenCommand::Transport(Control::Replay),
        KeyCode::Char('p') => ScreenCommand::Transport(Control::Pause),
        KeyCode::Enter | KeyCode::Char('l') => ScreenCommand::Transport(Control::Play),
        KeyCode::Char('d') => ScreenCommand::Transport(Control::Delete),
        KeyCode::Char('s') => ScreenCommand::Transport(Control::Send),
        _ => ScreenCommand::None,
    };

    match command {
        ScreenCommand::Transport(control) if !layout.offers(control) => ScreenCommand::None,
        other => other,
    }
}

/// Key hint shown next to a control icon.
pub fn key_hint(control: Control) -> &'static str {
    match control {
        Control::Replay => "r",
        Control::Pause => "p",
        Control::Play => "⏎",
        Control::Delete => "d",
        Control::Send => "s",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_mic_and_quit_keys() {
        let layout = ControlLayout::Standard;
        assert_eq!(command_for_key(key(KeyCode::Char(' ')), layout), ScreenCommand::ToggleMic);
        assert_eq!(command_for_key(key(KeyCode::Esc), layout), ScreenCommand::Quit);
        assert_eq!(
            command_for_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                layout
            ),
            ScreenCommand::Quit
        );
    }

    #[test]
    fn test_transport_keys() {
        let layout = ControlLayout::Standard;
        assert_eq!(
            command_for_key(key(KeyCode::Char('r')), layout),
            ScreenCommand::Transport(Control::Replay)
        );
        assert_eq!(
            command_for_key(key(KeyCode::Enter), layout),
            ScreenCommand::Transport(Control::Play)
        );
        assert_eq!(
            command_for_key(key(KeyCode::Char('d')), layout),
            ScreenCommand::Transport(Control::Delete)
        );
    }

    #[test]
    fn test_send_only_in_extended_layout() {
        assert_eq!(
            command_for_key(key(KeyCode::Char('s')), ControlLayout::Standard),
            ScreenCommand::None
        );
        assert_eq!(
            command_for_key(key(KeyCode::Char('s')), ControlLayout::Extended),
            ScreenCommand::Transport(Control::Send)
        );
    }
}
