//! Focus session timing
//!
//! This module provides:
//! - A countdown engine driven by a server-supplied end time
//! - A local break timer for breaks after custom sessions
//! - Mode/selection state for the next session
//! - The session lifecycle manager (create, cancel, complete, transition)
//! - Expiry classification and the orchestrating controller

pub mod classify;
pub mod controller;
pub mod countdown;
pub mod lifecycle;
pub mod selection;
pub mod ui_break;

pub use classify::{classify, Completion};
pub use controller::{
    Catalog, ControllerSettings, FocusController, Modal, Notice, Phase, ResetVariant,
};
pub use countdown::{
    compute_display, create_channel, CountdownEngine, CountdownSource, TimerDisplay, TimerEvent,
    TimerEventReceiver, TimerEventSender, DEFAULT_BREAK_SECS, DEFAULT_WORK_SECS, MAX_PHASE_MINUTES,
};
pub use lifecycle::SessionLifecycle;
pub use selection::{Mode, ModeSelection, SelectionError, SelectionLock};
pub use ui_break::UiBreakTimer;
