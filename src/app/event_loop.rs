//! Main event loop
//!
//! Interleaves terminal input with countdown events. Server calls are
//! awaited inline, so their results are applied in the order issued.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use tokio::sync::mpsc::error::TryRecvError;

use super::App;
use crate::focus_timing::{CountdownSource, TimerEvent};
use crate::input;

/// Terminal poll timeout (~60fps)
const POLL_INTERVAL: Duration = Duration::from_millis(16);

impl App {
    pub(crate) async fn event_loop(&mut self) -> Result<()> {
        // Always render on first frame
        self.state.needs_render = true;

        loop {
            if self.state.needs_render {
                self.render()?;
                self.state.needs_render = false;
            }

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        // Clear error message on any keypress
                        self.state.error_message = None;
                        if let Some(command) =
                            input::handle_key_event(&mut self.state, &self.controller, key)
                        {
                            self.run_command(command).await?;
                        }
                        self.state.needs_render = true;
                    }
                    Event::Resize(_, _) => self.state.needs_render = true,
                    _ => {}
                }
            }

            self.process_timer_events().await?;
            self.drain_notices();

            // Opening the Messages panel marks alerts as seen
            if self.state.panels.messages && self.log_buffer.alert_count() > 0 {
                self.log_buffer.clear_alerts();
                self.state.needs_render = true;
            }

            if self.state.notifications.tick() {
                self.state.needs_render = true;
            }

            if self.state.should_quit {
                break;
            }
        }
        Ok(())
    }

    async fn run_command(&mut self, command: input::Command) -> Result<()> {
        if let Some(message) = command.loading_message() {
            self.show_loading(message)?;
        }
        input::execute(command, &mut self.state, &mut self.controller).await;
        self.clear_loading();
        Ok(())
    }

    /// Apply every pending countdown event
    async fn process_timer_events(&mut self) -> Result<()> {
        loop {
            let event = match self.timer_rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => return Ok(()),
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("Countdown channel closed");
                    return Ok(());
                }
            };

            // Session expiry may call the server
            if matches!(
                event,
                TimerEvent::Expired {
                    source: CountdownSource::Session,
                    ..
                }
            ) {
                self.show_loading("Updating session...")?;
                self.controller.handle_timer_event(event).await;
                self.clear_loading();
            } else {
                self.controller.handle_timer_event(event).await;
            }
            self.state.needs_render = true;
        }
    }
}
