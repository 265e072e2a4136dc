//! Side panels: tasks, badges and messages
//!
//! Open panels share the right-hand column, stacked top to bottom.

use std::sync::Arc;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use crate::api::SessionApi;
use crate::app::{AppState, ListFocus, Panel};
use crate::focus_timing::FocusController;
use crate::logging::{LogBuffer, LogLevel};
use crate::tui::theme::theme;

pub fn render_side_panels<A: SessionApi>(
    frame: &mut Frame,
    area: Rect,
    controller: &FocusController<A>,
    state: &AppState,
    log_buffer: &Arc<LogBuffer>,
) {
    let open = state.panels.open();
    if open.is_empty() {
        return;
    }

    let constraints = vec![Constraint::Ratio(1, open.len() as u32); open.len()];
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (panel, chunk) in open.iter().zip(chunks.iter()) {
        match panel {
            Panel::Tasks => render_tasks(frame, *chunk, controller, state),
            Panel::Badges => render_badges(frame, *chunk, controller),
            Panel::Messages => render_messages(frame, *chunk, log_buffer),
        }
    }
}

fn panel_block(panel: Panel, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme().border_style(focused))
        .title(format!(" {} ", panel.title()))
}

fn render_tasks<A: SessionApi>(
    frame: &mut Frame,
    area: Rect,
    controller: &FocusController<A>,
    state: &AppState,
) {
    let t = theme();
    let focused = state.list_focus == ListFocus::Plans;
    let block = panel_block(Panel::Tasks, focused);
    let plans = &controller.catalog().plans;

    if plans.is_empty() {
        let empty = Paragraph::new("No open tasks")
            .style(t.muted_style())
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let chosen_id = controller.selection().plan_id();
    let items: Vec<ListItem> = plans
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            let chosen = chosen_id == Some(plan.id);
            let minutes = plan.duration_minutes.unwrap_or(25);
            let mut spans = vec![
                Span::raw(if chosen { "● " } else { "  " }),
                Span::raw(plan.title.clone()),
                Span::styled(format!("  {}m", minutes), t.muted_style()),
            ];
            if let Some(tag) = &plan.tag_name {
                spans.push(Span::styled(format!(" #{}", tag), t.muted_style()));
            }

            let style = if focused && i == state.selected_plan {
                t.selected_style()
            } else if chosen {
                Style::default().fg(t.active)
            } else {
                Style::default().fg(t.text)
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_badges<A: SessionApi>(frame: &mut Frame, area: Rect, controller: &FocusController<A>) {
    let t = theme();
    let block = panel_block(Panel::Badges, false);
    let badges = &controller.catalog().badges;

    if badges.is_empty() {
        let empty = Paragraph::new("No badges yet")
            .style(t.muted_style())
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines = Vec::new();
    for badge in badges {
        let earned = badge
            .earned_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "locked".to_string());
        let name_style = if badge.earned_at.is_some() {
            Style::default().fg(t.active).add_modifier(Modifier::BOLD)
        } else {
            t.muted_style()
        };
        lines.push(Line::from(vec![
            Span::styled(badge.name.clone(), name_style),
            Span::styled(format!("  {}", earned), t.muted_style()),
        ]));
        if !badge.description.is_empty() {
            lines.push(Line::styled(
                format!("  {}", badge.description),
                Style::default().fg(t.text),
            ));
        }
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Trace => Color::DarkGray,
        LogLevel::Debug => Color::Gray,
        LogLevel::Info => Color::Blue,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Error => Color::Red,
    }
}

fn render_messages(frame: &mut Frame, area: Rect, log_buffer: &Arc<LogBuffer>) {
    let t = theme();
    let block = panel_block(Panel::Messages, false);
    let visible = area.height.saturating_sub(2) as usize;
    let entries = log_buffer.recent(visible, LogLevel::Info);

    if entries.is_empty() {
        let empty = Paragraph::new("No messages yet")
            .style(t.muted_style())
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let time = entry.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S");
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", time), t.muted_style()),
                Span::styled(
                    format!("{:5} ", entry.level.as_str()),
                    Style::default().fg(level_color(entry.level)).bold(),
                ),
                Span::raw(entry.message.clone()),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
