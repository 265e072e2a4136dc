//! Main input dispatch logic
//!
//! Routes keyboard events to the handler for the current mode. UI-only keys
//! are applied to the app state directly; anything the controller has to do
//! comes back as a [`Command`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::commands::Command;
use super::dialogs::{handle_confirming_quit_key, handle_help_key, handle_modal_key};
use super::shortcuts::{shortcut_for, Shortcut};
use crate::api::SessionApi;
use crate::app::{AppState, InputMode, ListFocus};
use crate::focus_timing::FocusController;

/// Handle a key event by routing to the appropriate mode handler
pub fn handle_key_event<A: SessionApi>(
    state: &mut AppState,
    controller: &FocusController<A>,
    key: KeyEvent,
) -> Option<Command> {
    // Only process key press events (not release/repeat)
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.show_error("Ctrl+C disabled. Press 'q' to quit.");
        return None;
    }

    match state.input_mode {
        InputMode::ConfirmingQuit => {
            handle_confirming_quit_key(state, key);
            return None;
        }
        InputMode::Help => {
            handle_help_key(state, key);
            return None;
        }
        InputMode::Normal => {}
    }

    // An open dialog swallows every key, shortcuts included
    if let Some(modal) = controller.modal() {
        let presets = controller.settings().break_presets_minutes.len();
        return handle_modal_key(state, modal, presets, key);
    }

    if let Some(shortcut) = shortcut_for(&key, state.keyboard_enhanced) {
        return match shortcut {
            Shortcut::Start => Some(Command::Start),
            Shortcut::Reset => Some(Command::RequestReset),
            Shortcut::CustomDuration => {
                state.custom_duration_input.clear();
                Some(Command::OpenCustomDuration)
            }
            Shortcut::TogglePanel(panel) => {
                state.toggle_panel(panel);
                None
            }
        };
    }

    handle_normal_key(state, controller, key)
}

fn focused_len<A: SessionApi>(state: &AppState, controller: &FocusController<A>) -> usize {
    let catalog = controller.catalog();
    match state.list_focus {
        ListFocus::SessionTypes => catalog.session_types.len(),
        ListFocus::Tags => catalog.tags.len(),
        ListFocus::Plans => catalog.plans.len(),
    }
}

/// Navigation and selection on the main screen
fn handle_normal_key<A: SessionApi>(
    state: &mut AppState,
    controller: &FocusController<A>,
    key: KeyEvent,
) -> Option<Command> {
    let len = focused_len(state, controller);
    match key.code {
        KeyCode::Char('q') => state.input_mode = InputMode::ConfirmingQuit,
        KeyCode::Char('?') => state.input_mode = InputMode::Help,
        KeyCode::Tab => state.cycle_focus(),
        KeyCode::Char('j') | KeyCode::Down => state.select_next(len),
        KeyCode::Char('k') | KeyCode::Up => state.select_prev(len),
        KeyCode::Enter if len > 0 => {
            let index = state.current_selected_index().min(len - 1);
            return Some(match state.list_focus {
                ListFocus::SessionTypes => Command::SelectSessionType(index),
                ListFocus::Tags => Command::ToggleTag(index),
                ListFocus::Plans => Command::SelectPlan(index),
            });
        }
        _ => {}
    }
    None
}
