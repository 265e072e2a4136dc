//! Input handling module
//!
//! Handles keyboard dispatching based on the current mode and open dialog.

pub mod commands;
pub mod dialogs;
pub mod dispatcher;
pub mod shortcuts;

// Re-export commonly used items
pub use commands::{execute, Command};
pub use dispatcher::handle_key_event;
pub use shortcuts::{shortcut_for, Shortcut};
