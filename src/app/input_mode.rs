//! Input mode enum
//!
//! Session dialogs are owned by the focus controller; these are the
//! app-level modes layered on top of them.

/// Input mode determines how keyboard input is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - keys are handled as commands
    #[default]
    Normal,
    /// Confirming application quit
    ConfirmingQuit,
    /// Keyboard shortcut overlay
    Help,
}

impl InputMode {
    /// Whether this mode covers the screen with its own dialog
    pub fn is_overlay(&self) -> bool {
        !matches!(self, InputMode::Normal)
    }
}
