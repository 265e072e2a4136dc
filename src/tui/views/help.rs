//! Help overlay showing keyboard shortcuts
//!
//! Dismissible with `?` or `Esc`.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered_rect;
use crate::tui::theme::theme;

/// Render the help overlay
pub fn render_help_overlay(frame: &mut Frame, area: Rect, keyboard_enhanced: bool) {
    let t = theme();
    let content = shortcut_lines(keyboard_enhanced);

    let width = (area.width * 70 / 100).clamp(40, 64);
    let dialog_area = centered_rect(area, width, content.len() as u16 + 2);

    frame.render_widget(Clear, dialog_area);
    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent))
            .title(" Keyboard Shortcuts "),
    );
    frame.render_widget(paragraph, dialog_area);
}

/// Format a shortcut line with key and description
fn shortcut_line(key: &str, description: &str) -> Line<'static> {
    let t = theme();
    Line::from(vec![
        Span::styled(
            format!("  {:<14}", key),
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(description.to_string(), Style::default().fg(t.text)),
    ])
}

fn section(title: &str) -> Line<'static> {
    Line::styled(title.to_string(), theme().header_style())
}

fn shortcut_lines(keyboard_enhanced: bool) -> Vec<Line<'static>> {
    let messages_key = if keyboard_enhanced { "Ctrl+M" } else { "Ctrl+M / m" };
    vec![
        section("Timer"),
        shortcut_line("Space", "Start a session"),
        shortcut_line("Esc, Ctrl+R", "Reset (asks first when running)"),
        shortcut_line("Ctrl+E", "Custom duration"),
        Line::from(""),
        section("Selection"),
        shortcut_line("Tab", "Next list"),
        shortcut_line("j/k, ↓/↑", "Move"),
        shortcut_line("Enter", "Pick session type, tag or task"),
        Line::from(""),
        section("Panels"),
        shortcut_line("Ctrl+B", "Badges"),
        shortcut_line("Ctrl+T", "Tasks"),
        shortcut_line(messages_key, "Messages"),
        Line::from(""),
        shortcut_line("?", "Toggle this help"),
        shortcut_line("q", "Quit"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_key_depends_on_terminal() {
        let render = |lines: Vec<Line>| -> String {
            lines
                .iter()
                .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
                .collect()
        };
        assert!(render(shortcut_lines(false)).contains("Ctrl+M / m"));
        assert!(!render(shortcut_lines(true)).contains("Ctrl+M / m"));
    }
}
