//! Dialog key handlers
//!
//! One handler per dialog. Each returns the controller command the key
//! maps to, if any.

use crossterm::event::{KeyCode, KeyEvent};

use super::commands::Command;
use crate::app::{AppState, InputMode};
use crate::focus_timing::Modal;

/// Route a key to the handler for the open controller dialog
pub fn handle_modal_key(
    state: &mut AppState,
    modal: Modal,
    preset_count: usize,
    key: KeyEvent,
) -> Option<Command> {
    match modal {
        Modal::RecoverOngoing => handle_recover_ongoing_key(key),
        Modal::ConfirmReset(_) => handle_confirm_reset_key(key),
        Modal::CustomDuration => handle_custom_duration_key(state, key),
        Modal::CustomWorkComplete => handle_custom_work_complete_key(key, preset_count),
        Modal::LastCycleWorkComplete => handle_last_cycle_key(key),
        Modal::SessionComplete | Modal::CustomBreakComplete => handle_acknowledge_key(key),
    }
}

fn handle_recover_ongoing_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Enter => Some(Command::ContinueOngoing),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::DiscardOngoing),
        _ => None,
    }
}

fn handle_confirm_reset_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Command::ConfirmReset),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Command::CancelModal),
        _ => None,
    }
}

/// Digits and Backspace edit the input; Enter applies, Esc cancels
fn handle_custom_duration_key(state: &mut AppState, key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Esc => {
            state.custom_duration_input.clear();
            Some(Command::CancelModal)
        }
        KeyCode::Enter => match state.parsed_duration() {
            Some(minutes) => {
                state.custom_duration_input.clear();
                Some(Command::ApplyCustomDuration(minutes))
            }
            None => {
                state.show_error("Enter a length of at least 1 minute");
                None
            }
        },
        KeyCode::Char(c) if c.is_ascii_digit() => {
            state.push_duration_digit(c);
            None
        }
        KeyCode::Backspace => {
            state.custom_duration_input.pop();
            None
        }
        _ => None,
    }
}

fn handle_custom_work_complete_key(key: KeyEvent, preset_count: usize) -> Option<Command> {
    match key.code {
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            (index < preset_count.min(3)).then_some(Command::TakeUiBreak(index))
        }
        KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Enter | KeyCode::Esc => {
            Some(Command::FinishSession)
        }
        _ => None,
    }
}

fn handle_last_cycle_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Enter => Some(Command::TakeLastBreak),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(Command::FinishSession),
        _ => None,
    }
}

fn handle_acknowledge_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Command::Acknowledge),
        _ => None,
    }
}

/// Handle key when confirming application quit
pub fn handle_confirming_quit_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            state.should_quit = true;
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
        }
        _ => {}
    }
}

/// Any of `?`, Esc or `q` closes the help overlay
pub fn handle_help_key(state: &mut AppState, key: KeyEvent) {
    if matches!(
        key.code,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')
    ) {
        state.input_mode = InputMode::Normal;
    }
}
