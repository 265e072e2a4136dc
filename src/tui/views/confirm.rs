//! Unified confirmation dialog component
//!
//! Provides a consistent look and feel for all y/n confirmations.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::theme::theme;

/// Configuration for a confirmation dialog
pub struct ConfirmDialogConfig<'a> {
    /// Dialog title (e.g., "Reset")
    pub title: &'a str,
    /// Question shown in bold (e.g., "Cancel the running session?")
    pub question: &'a str,
    /// Warning lines (displayed in yellow with ⚠ prefix)
    pub warnings: Vec<String>,
    /// Note lines (displayed in muted gray)
    pub notes: Vec<String>,
}

impl ConfirmDialogConfig<'_> {
    /// Rows needed to show everything, borders included
    pub fn height(&self) -> u16 {
        let body = 3 + 2 * (self.warnings.len() + self.notes.len()) + 1;
        body as u16 + 2
    }
}

/// Render a unified confirmation dialog into `area`
///
/// - Border: warning color, the action is destructive
/// - Warnings: bold with ⚠ prefix; notes: muted
/// - Prompt: "Press y to confirm, n or Esc to cancel"
pub fn render_confirm_dialog(frame: &mut Frame, area: Rect, config: ConfirmDialogConfig) {
    let t = theme();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            config.question,
            Style::default().fg(t.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for warning in &config.warnings {
        lines.push(Line::from(Span::styled(
            format!("⚠  {}", warning),
            Style::default()
                .fg(t.border_warning)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    for note in &config.notes {
        lines.push(Line::from(Span::styled(
            note.as_str(),
            Style::default().fg(t.text_muted),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(t.text)),
        Span::styled(
            "y",
            Style::default().fg(t.active).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to confirm, ", Style::default().fg(t.text)),
        Span::styled(
            "n",
            Style::default().fg(t.error_bg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" or ", Style::default().fg(t.text)),
        Span::styled(
            "Esc",
            Style::default().fg(t.error_bg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to cancel", Style::default().fg(t.text)),
    ]));

    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.border_warning))
                .title(format!(" {} ", config.title)),
        );

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_grows_with_lines() {
        let bare = ConfirmDialogConfig {
            title: "Quit",
            question: "Quit?",
            warnings: vec![],
            notes: vec![],
        };
        let full = ConfirmDialogConfig {
            title: "Reset",
            question: "Cancel?",
            warnings: vec!["a".to_string()],
            notes: vec!["b".to_string()],
        };
        assert_eq!(bare.height(), 6);
        assert_eq!(full.height(), 10);
    }
}
