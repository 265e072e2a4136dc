//! View rendering modules
//!
//! The main timer screen, its side panels, and the overlays drawn on top.

use ratatui::prelude::*;

use crate::tui::theme::theme;

mod confirm;
mod dialogs;
mod help;
mod notifications;
mod panels;
mod timer;

pub use confirm::{render_confirm_dialog, ConfirmDialogConfig};
pub use dialogs::{
    render_error_banner, render_loading_indicator, render_modal, render_quit_confirm_dialog,
};
pub use help::render_help_overlay;
pub use notifications::render_notifications;
pub use panels::render_side_panels;
pub use timer::render_timer_view;

/// Centered dialog area, shrunk to fit small terminals
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// `key` highlighted, followed by its description
pub fn key_hint<'a>(key: &'a str, description: &'a str) -> Vec<Span<'a>> {
    let t = theme();
    vec![
        Span::styled(key, Style::default().fg(t.accent).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {}  ", description), Style::default().fg(t.text)),
    ]
}
