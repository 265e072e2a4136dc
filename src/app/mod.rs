//! Application state and main event loop
//!
//! Ties the focus controller, the terminal UI and the log buffer together.

// Submodules
mod event_loop;
mod input_mode;
mod state;
mod view;

// Re-exports from submodules
pub use input_mode::InputMode;
pub use state::{AppState, MAX_DURATION_DIGITS};
pub use view::{ListFocus, Panel, Panels};

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{ApiClient, Credentials};
use crate::config::Config;
use crate::focus_timing::{create_channel, FocusController, TimerEventReceiver};
use crate::logging::{LogBuffer, LogFileInfo};
use crate::tui::views::{
    render_error_banner, render_help_overlay, render_loading_indicator, render_modal,
    render_notifications, render_quit_confirm_dialog, render_timer_view,
};
use crate::tui::{init_theme, Tui};

/// Main application struct
pub struct App {
    pub(crate) config: Config,
    pub(crate) state: AppState,
    /// Owns the session, its countdowns and the open dialog
    pub(crate) controller: FocusController<ApiClient>,
    /// Ticks and expiries from the countdown tasks
    timer_rx: TimerEventReceiver,
    pub(crate) tui: Tui,
    /// Log buffer backing the Messages panel
    pub(crate) log_buffer: Arc<LogBuffer>,
    /// Information about the current log file
    pub(crate) log_file_info: LogFileInfo,
}

impl App {
    /// Create a new application instance
    pub async fn new(log_buffer: Arc<LogBuffer>, log_file_info: LogFileInfo) -> Result<Self> {
        let config = Config::load()?;
        init_theme(&config.theme_preset);

        let credentials = Credentials::load(config.token_source());
        let client = ApiClient::new(
            config.api_base_url.clone(),
            credentials,
            config.request_timeout(),
        )
        .context("Failed to create API client")?;
        tracing::debug!(base_url = %config.api_base_url, "API client ready");

        let (timer_tx, timer_rx) = create_channel();
        let controller = FocusController::new(client, timer_tx, config.controller_settings());

        let tui = Tui::new().context("Failed to initialize terminal")?;

        Ok(Self {
            config,
            state: AppState::default(),
            controller,
            timer_rx,
            tui,
            log_buffer,
            log_file_info,
        })
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        self.state.keyboard_enhanced = self.tui.keyboard_enhanced();

        tracing::info!(
            log_file = %self.log_file_info.path.display(),
            "pomotui started. Press Space to start a session, 'q' to quit."
        );

        let result = match self.startup().await {
            Ok(()) => self.event_loop().await,
            Err(e) => Err(e),
        };

        // A running session is left on the server; it is offered for recovery next launch
        if self.controller.active_session().is_some() {
            tracing::info!("Exiting with a session still running on the server");
        }

        self.tui.exit()?;
        result
    }

    /// Load reference data and check for a session left running
    async fn startup(&mut self) -> Result<()> {
        self.show_loading("Loading...")?;
        self.controller.load_catalog().await;
        self.controller.recover_ongoing().await;
        self.clear_loading();
        self.drain_notices();
        Ok(())
    }

    /// Show a loading indicator with the given message and force a render
    ///
    /// Used before awaiting the server so the user sees that something is
    /// happening.
    pub(crate) fn show_loading(&mut self, message: &str) -> Result<()> {
        self.state.loading_message = Some(message.to_string());
        self.render()
    }

    pub(crate) fn clear_loading(&mut self) {
        self.state.loading_message = None;
        self.state.needs_render = true;
    }

    /// Move controller notices into toasts, ringing the bell for finished timers
    pub(crate) fn drain_notices(&mut self) {
        for notice in self.controller.take_notices() {
            if matches!(notice, crate::focus_timing::Notice::TimerFinished(_))
                && self.config.bell_enabled()
            {
                print!("\x07");
                let _ = std::io::Write::flush(&mut std::io::stdout());
            }
            self.state.notifications.notify(notice.into());
            self.state.needs_render = true;
        }
    }

    /// Render the current state
    pub(crate) fn render(&mut self) -> Result<()> {
        let state = &self.state;
        let controller = &self.controller;
        let log_buffer = &self.log_buffer;

        self.tui.draw(|frame| {
            let area = frame.size();

            render_timer_view(frame, area, controller, state, log_buffer);

            if let Some(modal) = controller.modal() {
                render_modal(frame, area, modal, controller, state);
            }

            match state.input_mode {
                InputMode::ConfirmingQuit => {
                    render_quit_confirm_dialog(frame, area, controller.active_session().is_some())
                }
                InputMode::Help => render_help_overlay(frame, area, state.keyboard_enhanced),
                InputMode::Normal => {}
            }

            let visible_notifications = state.notifications.visible();
            if !visible_notifications.is_empty() {
                render_notifications(frame, area, &visible_notifications);
            }

            if let Some(message) = &state.error_message {
                render_error_banner(frame, area, message);
            }

            // Render loading overlay if a blocking operation is in progress
            if let Some(message) = &state.loading_message {
                render_loading_indicator(frame, area, message);
            }
        })?;

        Ok(())
    }
}
