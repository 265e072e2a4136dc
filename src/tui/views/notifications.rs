//! Notification rendering for TUI
//!
//! Renders notifications in the top-right corner of the screen.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::notifications::{Notification, NotificationType};
use crate::tui::theme::theme;

/// Width of notification popups
const NOTIFICATION_WIDTH: u16 = 45;
/// Height of each notification
const NOTIFICATION_HEIGHT: u16 = 4;
/// Margin from screen edge
const NOTIFICATION_MARGIN: u16 = 2;

fn border_color(notification_type: &NotificationType) -> Color {
    let t = theme();
    match notification_type {
        NotificationType::TimerFinished { .. } => t.phase_break,
        NotificationType::Success { .. } => t.active,
        NotificationType::Info { .. } => t.accent,
        NotificationType::Warning { .. } => t.border_warning,
        NotificationType::Error { .. } => t.error_bg,
    }
}

/// Area for the `index`-th toast, or None if it would fall off screen
fn toast_area(area: Rect, index: usize) -> Option<Rect> {
    let y = NOTIFICATION_MARGIN + (index as u16 * (NOTIFICATION_HEIGHT + 1));
    if y + NOTIFICATION_HEIGHT > area.height {
        return None;
    }
    let width = NOTIFICATION_WIDTH.min(area.width);
    Some(Rect {
        x: area.x + area.width.saturating_sub(width + NOTIFICATION_MARGIN),
        y: area.y + y,
        width,
        height: NOTIFICATION_HEIGHT,
    })
}

/// Render notifications in the top-right corner, newest on top
pub fn render_notifications(frame: &mut Frame, area: Rect, notifications: &[&Notification]) {
    for (i, notification) in notifications.iter().enumerate() {
        let Some(notif_area) = toast_area(area, i) else {
            break;
        };

        let color = border_color(&notification.notification_type);
        let title = format!(" {} ", notification.notification_type.title());

        frame.render_widget(Clear, notif_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(title, Style::default().fg(color).bold()));

        let paragraph = Paragraph::new(notification.notification_type.message())
            .style(Style::default().fg(theme().text))
            .block(block)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, notif_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_area_stacks_and_clips() {
        let screen = Rect::new(0, 0, 100, 12);
        let first = toast_area(screen, 0).unwrap();
        assert_eq!(first.y, NOTIFICATION_MARGIN);
        assert_eq!(first.x, 100 - NOTIFICATION_WIDTH - NOTIFICATION_MARGIN);

        let second = toast_area(screen, 1).unwrap();
        assert_eq!(second.y, first.y + NOTIFICATION_HEIGHT + 1);

        assert!(toast_area(screen, 2).is_none());
    }

    #[test]
    fn test_toast_area_narrow_screen() {
        let screen = Rect::new(0, 0, 20, 30);
        let area = toast_area(screen, 0).unwrap();
        assert_eq!(area.width, 20);
        assert_eq!(area.x, 0);
    }
}
