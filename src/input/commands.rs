//! Controller commands produced by key handling
//!
//! Keys are translated synchronously; commands that touch the server are
//! then awaited by the event loop behind a loading overlay.

use crate::api::SessionApi;
use crate::app::AppState;
use crate::focus_timing::{FocusController, SelectionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    RequestReset,
    ConfirmReset,
    CancelModal,
    OpenCustomDuration,
    ApplyCustomDuration(u64),
    ContinueOngoing,
    DiscardOngoing,
    TakeUiBreak(usize),
    TakeLastBreak,
    FinishSession,
    Acknowledge,
    SelectSessionType(usize),
    ToggleTag(usize),
    SelectPlan(usize),
}

impl Command {
    /// Overlay text for commands that wait on the server
    pub fn loading_message(&self) -> Option<&'static str> {
        match self {
            Command::Start => Some("Starting session..."),
            Command::ConfirmReset => Some("Resetting..."),
            Command::DiscardOngoing => Some("Discarding session..."),
            Command::TakeLastBreak => Some("Starting break..."),
            Command::FinishSession => Some("Finishing session..."),
            _ => None,
        }
    }
}

fn report(state: &mut AppState, result: Result<(), SelectionError>) {
    if let Err(e) = result {
        state.show_error(e.to_string());
    }
}

/// Apply a command to the controller
pub async fn execute<A: SessionApi>(
    command: Command,
    state: &mut AppState,
    controller: &mut FocusController<A>,
) {
    match command {
        Command::Start => controller.start().await,
        Command::RequestReset => controller.request_reset(),
        Command::ConfirmReset => controller.confirm_reset().await,
        Command::CancelModal => controller.cancel_modal(),
        Command::OpenCustomDuration => controller.open_custom_duration(),
        Command::ApplyCustomDuration(minutes) => {
            report(state, controller.apply_custom_duration(minutes))
        }
        Command::ContinueOngoing => controller.continue_ongoing(),
        Command::DiscardOngoing => controller.discard_ongoing().await,
        Command::TakeUiBreak(preset) => controller.take_ui_break(preset),
        Command::TakeLastBreak => controller.take_last_break().await,
        Command::FinishSession => controller.finish_session().await,
        Command::Acknowledge => controller.acknowledge(),
        Command::SelectSessionType(index) => report(state, controller.select_session_type(index)),
        Command::ToggleTag(index) => report(state, controller.toggle_tag(index)),
        Command::SelectPlan(index) => report(state, controller.select_plan(index)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::api::SessionLength;
    use crate::focus_timing::{create_channel, ControllerSettings, Mode};

    #[test]
    fn test_loading_only_for_server_commands() {
        assert!(Command::Start.loading_message().is_some());
        assert!(Command::FinishSession.loading_message().is_some());
        assert!(Command::ToggleTag(0).loading_message().is_none());
        assert!(Command::Acknowledge.loading_message().is_none());
    }

    #[tokio::test]
    async fn test_frozen_selection_shows_error() {
        let (tx, _rx) = create_channel();
        let mut controller = FocusController::new(FakeApi::new(), tx, ControllerSettings::default());
        let mut state = AppState::default();

        execute(Command::ApplyCustomDuration(30), &mut state, &mut controller).await;
        assert_eq!(controller.selection().mode(), Mode::Custom);
        assert!(state.error_message.is_none());

        execute(Command::Start, &mut state, &mut controller).await;
        execute(Command::ApplyCustomDuration(10), &mut state, &mut controller).await;
        assert_eq!(
            state.error_message.as_deref(),
            Some(SelectionError::Frozen.to_string().as_str())
        );
        assert_eq!(controller.selection().length(), SessionLength::Custom(1800));
    }
}
