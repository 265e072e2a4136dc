//! Global keyboard shortcuts
//!
//! Only consulted when no dialog is open, so shortcuts never leak into a
//! text field.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Start,
    Reset,
    CustomDuration,
    TogglePanel(Panel),
}

fn is_command(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::SUPER)
}

/// Map a key press to a shortcut
///
/// Without keyboard enhancement Ctrl+M is indistinguishable from Enter, so
/// a plain `m` opens the messages panel instead.
pub fn shortcut_for(key: &KeyEvent, keyboard_enhanced: bool) -> Option<Shortcut> {
    match key.code {
        KeyCode::Char(' ') if key.modifiers.is_empty() => Some(Shortcut::Start),
        KeyCode::Esc => Some(Shortcut::Reset),
        KeyCode::Char(c) if is_command(key) => match c.to_ascii_lowercase() {
            'r' => Some(Shortcut::Reset),
            'e' => Some(Shortcut::CustomDuration),
            'b' => Some(Shortcut::TogglePanel(Panel::Badges)),
            't' => Some(Shortcut::TogglePanel(Panel::Tasks)),
            'm' => Some(Shortcut::TogglePanel(Panel::Messages)),
            _ => None,
        },
        KeyCode::Char('m') if !keyboard_enhanced && key.modifiers.is_empty() => {
            Some(Shortcut::TogglePanel(Panel::Messages))
        }
        _ => None,
    }
}
