//! Main timer screen
//!
//! Header with mode and cycle, the progress gauge, a large MM:SS readout and
//! the session-type / tag lists used to pick the next session.

use std::sync::Arc;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};

use super::key_hint;
use super::panels::render_side_panels;
use crate::api::SessionApi;
use crate::app::{AppState, ListFocus};
use crate::focus_timing::{FocusController, Phase};
use crate::logging::LogBuffer;
use crate::tui::theme::{parse_hex_color, theme};

/// Width of the side panel column
const SIDE_PANEL_WIDTH: u16 = 42;

/// 3x5 block glyphs for the large readout
fn glyph(c: char) -> [&'static str; 5] {
    match c {
        '0' => ["███", "█ █", "█ █", "█ █", "███"],
        '1' => ["  █", "  █", "  █", "  █", "  █"],
        '2' => ["███", "  █", "███", "█  ", "███"],
        '3' => ["███", "  █", "███", "  █", "███"],
        '4' => ["█ █", "█ █", "███", "  █", "  █"],
        '5' => ["███", "█  ", "███", "  █", "███"],
        '6' => ["███", "█  ", "███", "█ █", "███"],
        '7' => ["███", "  █", "  █", "  █", "  █"],
        '8' => ["███", "█ █", "███", "█ █", "███"],
        '9' => ["███", "█ █", "███", "  █", "███"],
        ':' => ["   ", " █ ", "   ", " █ ", "   "],
        _ => ["   "; 5],
    }
}

/// Render `text` as five rows of block glyphs
pub fn big_text(text: &str) -> Vec<String> {
    (0..5)
        .map(|row| {
            text.chars()
                .map(|c| glyph(c)[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Render the whole main screen
pub fn render_timer_view<A: SessionApi>(
    frame: &mut Frame,
    area: Rect,
    controller: &FocusController<A>,
    state: &AppState,
    log_buffer: &Arc<LogBuffer>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], controller, log_buffer.alert_count());

    let body = if state.panels.any_open() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(SIDE_PANEL_WIDTH)])
            .split(chunks[1]);
        render_side_panels(frame, cols[1], controller, state, log_buffer);
        cols[0]
    } else {
        chunks[1]
    };

    render_body(frame, body, controller, state);
    render_footer(frame, chunks[2], controller, state);
}

fn render_header<A: SessionApi>(
    frame: &mut Frame,
    area: Rect,
    controller: &FocusController<A>,
    alert_count: usize,
) {
    let t = theme();
    let phase = controller.phase();

    let mut spans = vec![
        Span::styled(" pomotui ", t.header_style()),
        Span::styled("│ ", t.muted_style()),
        Span::styled(
            phase.label(),
            Style::default()
                .fg(t.phase_color(phase))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", t.muted_style()),
        Span::styled(controller.selection().mode().label(), Style::default().fg(t.text)),
    ];

    if let Some((current, total)) = controller.cycle_position() {
        spans.push(Span::styled(" │ ", t.muted_style()));
        spans.push(Span::styled(
            format!("Cycle {}/{}", current, total),
            Style::default().fg(t.text),
        ));
    }

    if alert_count > 0 {
        spans.push(Span::styled(" │ ", t.muted_style()));
        spans.push(Span::styled(
            format!("⚠ {}", alert_count),
            Style::default().fg(t.border_warning).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_body<A: SessionApi>(
    frame: &mut Frame,
    area: Rect,
    controller: &FocusController<A>,
    state: &AppState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Gauge
            Constraint::Length(7), // Clock
            Constraint::Length(2), // Selection summary
            Constraint::Min(4),    // Lists
        ])
        .split(area);

    render_gauge(frame, chunks[0], controller);
    render_clock(frame, chunks[1], controller);
    render_summary(frame, chunks[2], controller);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[3]);
    render_session_types(frame, lists[0], controller, state);
    render_tags(frame, lists[1], controller, state);
}

fn render_gauge<A: SessionApi>(frame: &mut Frame, area: Rect, controller: &FocusController<A>) {
    let t = theme();
    let phase = controller.phase();
    let display = controller.display();

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(t.border_style(phase != Phase::Idle))
                .title(format!(" {} ", phase.label())),
        )
        .gauge_style(Style::default().fg(t.phase_color(phase)))
        .ratio(display.progress / 100.0)
        .label(format!("{:.0}%", display.progress));
    frame.render_widget(gauge, area);
}

fn render_clock<A: SessionApi>(frame: &mut Frame, area: Rect, controller: &FocusController<A>) {
    let t = theme();
    let phase = controller.phase();
    let style = Style::default()
        .fg(t.phase_color(phase))
        .add_modifier(Modifier::BOLD);

    let text = controller.display().format();
    let mut lines = vec![Line::from("")];
    if area.width as usize >= text.len() * 4 + 2 {
        lines.extend(big_text(&text).into_iter().map(|row| Line::styled(row, style)));
    } else {
        lines.push(Line::styled(text, style));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_summary<A: SessionApi>(frame: &mut Frame, area: Rect, controller: &FocusController<A>) {
    let t = theme();
    let selection = controller.selection();
    let catalog = controller.catalog();

    let mut parts = Vec::new();
    if let Some(st) = catalog.session_type(selection.session_type_id()) {
        parts.push(st.name.clone());
    } else if let Some(secs) = selection.custom_duration_secs() {
        parts.push(format!("{} min custom", secs / 60));
    }
    if let Some(plan) = selection
        .plan_id()
        .and_then(|id| catalog.plans.iter().find(|p| p.id == id))
    {
        parts.push(format!("task: {}", plan.title));
    }
    if !selection.tags().is_empty() {
        let tags: Vec<&str> = selection.tags().iter().map(String::as_str).collect();
        parts.push(format!("#{}", tags.join(" #")));
    }

    let text = if parts.is_empty() {
        "Pick a session type or press Ctrl+E for a custom length".to_string()
    } else {
        parts.join("  ·  ")
    };

    let mut style = Style::default().fg(t.text);
    if controller.is_selection_frozen() {
        style = t.muted_style();
    }
    frame.render_widget(
        Paragraph::new(text).style(style).alignment(Alignment::Center),
        area,
    );
}

fn list_block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme().border_style(focused))
        .title(format!(" {} ", title))
}

fn row_style(highlighted: bool, chosen: bool, frozen: bool) -> Style {
    let t = theme();
    if highlighted {
        t.selected_style()
    } else if chosen {
        Style::default().fg(t.active).add_modifier(Modifier::BOLD)
    } else if frozen {
        t.muted_style()
    } else {
        Style::default().fg(t.text)
    }
}

fn render_session_types<A: SessionApi>(
    frame: &mut Frame,
    area: Rect,
    controller: &FocusController<A>,
    state: &AppState,
) {
    let focused = state.list_focus == ListFocus::SessionTypes;
    let frozen = controller.is_selection_frozen();
    let chosen_id = controller.selection().session_type_id();
    let block = list_block(ListFocus::SessionTypes.title(), focused);

    let session_types = &controller.catalog().session_types;
    if session_types.is_empty() {
        let empty = Paragraph::new("No session types")
            .style(theme().muted_style())
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = session_types
        .iter()
        .enumerate()
        .map(|(i, st)| {
            let chosen = chosen_id == Some(st.id);
            let marker = if chosen { "● " } else { "  " };
            let text = format!(
                "{}{}  {}/{} min ×{}",
                marker,
                st.name,
                st.work_duration / 60,
                st.break_duration / 60,
                st.number_of_cycles
            );
            let highlighted = focused && i == state.selected_session_type;
            ListItem::new(text).style(row_style(highlighted, chosen, frozen))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_tags<A: SessionApi>(
    frame: &mut Frame,
    area: Rect,
    controller: &FocusController<A>,
    state: &AppState,
) {
    let t = theme();
    let focused = state.list_focus == ListFocus::Tags;
    let frozen = controller.is_selection_frozen();
    let block = list_block(ListFocus::Tags.title(), focused);

    let tags = &controller.catalog().tags;
    if tags.is_empty() {
        let empty = Paragraph::new("No tags").style(t.muted_style()).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let chosen = controller.selection().has_tag(&tag.name);
            let dot_color = parse_hex_color(&tag.color).unwrap_or(t.text_muted);
            let highlighted = focused && i == state.selected_tag;
            let line = Line::from(vec![
                Span::styled(if chosen { "[x] " } else { "[ ] " }, row_style(highlighted, chosen, frozen)),
                Span::styled("● ", Style::default().fg(dot_color)),
                Span::styled(tag.name.as_str(), row_style(highlighted, chosen, frozen)),
            ]);
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_footer<A: SessionApi>(
    frame: &mut Frame,
    area: Rect,
    controller: &FocusController<A>,
    state: &AppState,
) {
    let mut spans = Vec::new();
    if controller.is_running() {
        spans.extend(key_hint("Esc", "reset"));
    } else {
        spans.extend(key_hint("Space", "start"));
        spans.extend(key_hint("Ctrl+E", "custom"));
        spans.extend(key_hint("Tab", "list"));
        spans.extend(key_hint("Enter", "pick"));
    }
    let panels_key = if state.keyboard_enhanced {
        "Ctrl+B/T/M"
    } else {
        "Ctrl+B/T, m"
    };
    spans.extend(key_hint(panels_key, "panels"));
    spans.extend(key_hint("?", "help"));
    spans.extend(key_hint("q", "quit"));

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}
