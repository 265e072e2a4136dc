//! Terminal UI module
//!
//! This module handles all terminal rendering and UI components using Ratatui.

pub mod notifications;
pub mod theme;
pub mod views;

pub use notifications::{Notification, NotificationManager, NotificationType};
pub use theme::{init_theme, theme, Theme};

use anyhow::Result;
use crossterm::{
    event::{self, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Terminal UI wrapper
///
/// Handles terminal setup, teardown, and provides the rendering surface.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    /// Whether the terminal reports Super/Cmd and key event types
    keyboard_enhancement_enabled: bool,
}

/// Error handler for terminal cleanup operations
/// Used during both normal exit and panic/drop scenarios
enum ErrorHandler {
    /// Log errors via tracing (normal exit)
    Tracing,
    /// Print errors to stderr (panic/drop, tracing may be unavailable)
    Stderr,
}

impl ErrorHandler {
    fn handle(&self, context: &str, error: impl std::fmt::Display) {
        match self {
            ErrorHandler::Tracing => tracing::warn!("{}: {}", context, error),
            ErrorHandler::Stderr => eprintln!("TUI teardown: {}: {}", context, error),
        }
    }
}

/// Disable keyboard enhancement and drain any pending terminal responses
fn disable_keyboard_enhancement(handler: &ErrorHandler) {
    if let Err(e) = stdout().execute(PopKeyboardEnhancementFlags) {
        handler.handle("failed to pop keyboard enhancement flags", e);
    }
    if let Err(e) = stdout().flush() {
        handler.handle("failed to flush stdout after keyboard enhancement", e);
    }
    // Drain any pending terminal responses (CSI u sequences)
    while event::poll(Duration::from_millis(10)).unwrap_or(false) {
        let _ = event::read();
    }
}

impl Tui {
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            keyboard_enhancement_enabled: false,
        })
    }

    /// Enter TUI mode (raw mode + alternate screen)
    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        // Needed to see Cmd (SUPER) and to tell presses from releases
        if supports_keyboard_enhancement().unwrap_or(false)
            && stdout()
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok()
        {
            self.keyboard_enhancement_enabled = true;
        }

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Exit TUI mode (restore terminal)
    pub fn exit(&mut self) -> Result<()> {
        tracing::debug!("Starting TUI exit sequence");
        let handler = ErrorHandler::Tracing;

        // Pop keyboard enhancement FIRST (while still in raw mode)
        if self.keyboard_enhancement_enabled {
            disable_keyboard_enhancement(&handler);
            self.keyboard_enhancement_enabled = false;
        }

        self.terminal.show_cursor()?;
        stdout().execute(LeaveAlternateScreen)?;
        disable_raw_mode()?;

        tracing::debug!("TUI exit sequence completed");
        Ok(())
    }

    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhancement_enabled
    }

    /// Draw a frame
    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // During drop tracing may not be available, so errors go to stderr
        let handler = ErrorHandler::Stderr;

        if self.keyboard_enhancement_enabled {
            disable_keyboard_enhancement(&handler);
        }

        if let Err(e) = self.terminal.show_cursor() {
            handler.handle("failed to show cursor", e);
        }
        if let Err(e) = stdout().execute(LeaveAlternateScreen) {
            handler.handle("failed to leave alternate screen", e);
        }
        if let Err(e) = disable_raw_mode() {
            handler.handle("failed to disable raw mode", e);
        }
    }
}
