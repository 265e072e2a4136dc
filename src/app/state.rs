//! Application state
//!
//! UI-only state: which list is focused, highlighted rows, open panels and
//! transient messages. Session state lives in the focus controller.

use super::input_mode::InputMode;
use super::view::{ListFocus, Panel, Panels};
use crate::tui::NotificationManager;

/// Longest custom duration input, in digits
pub const MAX_DURATION_DIGITS: usize = 3;

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    pub input_mode: InputMode,
    pub list_focus: ListFocus,
    pub selected_session_type: usize,
    pub selected_tag: usize,
    pub selected_plan: usize,
    pub panels: Panels,
    /// Digits typed into the custom duration dialog
    pub custom_duration_input: String,
    /// Error banner, cleared on the next key press
    pub error_message: Option<String>,
    pub notifications: NotificationManager,
    /// Shown as an overlay while awaiting the server
    pub loading_message: Option<String>,
    /// Whether the terminal reports Super and key event kinds
    pub keyboard_enhanced: bool,
    /// Set whenever something on screen may have changed
    pub needs_render: bool,
    pub should_quit: bool,
}

impl AppState {
    /// Highlighted row in the focused list
    pub fn current_selected_index(&self) -> usize {
        match self.list_focus {
            ListFocus::SessionTypes => self.selected_session_type,
            ListFocus::Tags => self.selected_tag,
            ListFocus::Plans => self.selected_plan,
        }
    }

    pub fn set_current_selected_index(&mut self, index: usize) {
        match self.list_focus {
            ListFocus::SessionTypes => self.selected_session_type = index,
            ListFocus::Tags => self.selected_tag = index,
            ListFocus::Plans => self.selected_plan = index,
        }
    }

    /// Select the next item in the focused list
    pub fn select_next(&mut self, item_count: usize) {
        if item_count > 0 {
            // Clamp current index to valid range first to handle stale indices
            let current = self
                .current_selected_index()
                .min(item_count.saturating_sub(1));
            self.set_current_selected_index((current + 1) % item_count);
        } else {
            self.set_current_selected_index(0);
        }
    }

    /// Select the previous item in the focused list
    pub fn select_prev(&mut self, item_count: usize) {
        if item_count > 0 {
            let current = self
                .current_selected_index()
                .min(item_count.saturating_sub(1));
            let prev = current.checked_sub(1).unwrap_or(item_count - 1);
            self.set_current_selected_index(prev);
        } else {
            self.set_current_selected_index(0);
        }
    }

    pub fn cycle_focus(&mut self) {
        self.list_focus = self.list_focus.next(self.panels.tasks);
    }

    /// Toggle a side panel; closing Tasks moves focus off the plan list
    pub fn toggle_panel(&mut self, panel: Panel) -> bool {
        let open = self.panels.toggle(panel);
        if panel == Panel::Tasks && !open && self.list_focus == ListFocus::Plans {
            self.list_focus = ListFocus::SessionTypes;
        }
        open
    }

    /// Append a digit to the custom duration input
    pub fn push_duration_digit(&mut self, c: char) {
        if c.is_ascii_digit() && self.custom_duration_input.len() < MAX_DURATION_DIGITS {
            self.custom_duration_input.push(c);
        }
    }

    /// Parsed minutes, if the input is a positive number
    pub fn parsed_duration(&self) -> Option<u64> {
        self.custom_duration_input
            .parse::<u64>()
            .ok()
            .filter(|m| *m > 0)
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_default() {
        let state = AppState::default();
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.list_focus, ListFocus::SessionTypes);
        assert!(!state.panels.any_open());
        assert!(!state.should_quit);
    }

    #[test]
    fn test_select_next_wraps() {
        let mut state = AppState::default();
        state.select_next(3);
        assert_eq!(state.selected_session_type, 1);
        state.select_next(3);
        state.select_next(3);
        assert_eq!(state.selected_session_type, 0);
    }

    #[test]
    fn test_select_prev_wraps_per_list() {
        let mut state = AppState::default();
        state.list_focus = ListFocus::Tags;
        state.select_prev(4);
        assert_eq!(state.selected_tag, 3);
        assert_eq!(state.selected_session_type, 0);
    }

    #[test]
    fn test_select_with_empty_list() {
        let mut state = AppState::default();
        state.selected_session_type = 5;
        state.select_next(0);
        assert_eq!(state.selected_session_type, 0);
        state.select_prev(0);
        assert_eq!(state.selected_session_type, 0);
    }

    #[test]
    fn test_stale_index_clamped() {
        let mut state = AppState::default();
        state.selected_session_type = 9;
        state.select_next(3);
        assert_eq!(state.selected_session_type, 0);
    }

    #[test]
    fn test_closing_tasks_moves_focus() {
        let mut state = AppState::default();
        state.toggle_panel(Panel::Tasks);
        state.cycle_focus();
        state.cycle_focus();
        assert_eq!(state.list_focus, ListFocus::Plans);

        state.toggle_panel(Panel::Tasks);
        assert_eq!(state.list_focus, ListFocus::SessionTypes);
    }

    #[test]
    fn test_duration_input() {
        let mut state = AppState::default();
        for c in ['4', 'x', '5', '0', '1'] {
            state.push_duration_digit(c);
        }
        assert_eq!(state.custom_duration_input, "450");
        assert_eq!(state.parsed_duration(), Some(450));

        state.custom_duration_input = "0".to_string();
        assert_eq!(state.parsed_duration(), None);
        state.custom_duration_input.clear();
        assert_eq!(state.parsed_duration(), None);
    }
}
