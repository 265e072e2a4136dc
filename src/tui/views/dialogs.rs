//! Session dialogs and transient overlays
//!
//! One renderer per controller modal, plus quit confirmation, the loading
//! indicator and the error banner.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::confirm::{render_confirm_dialog, ConfirmDialogConfig};
use super::{centered_rect, key_hint};
use crate::api::{SessionApi, SessionStatus};
use crate::app::AppState;
use crate::focus_timing::{FocusController, Modal, ResetVariant};
use crate::tui::theme::theme;

const DIALOG_WIDTH: u16 = 56;

/// Framed, centered dialog with a title, body lines and a hint row
fn render_dialog<'a>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border: Color,
    mut lines: Vec<Line<'a>>,
    hints: Line<'a>,
) {
    lines.push(Line::from(""));
    lines.push(hints);

    let height = lines.len() as u16 + 4;
    let dialog_area = centered_rect(area, DIALOG_WIDTH, height);
    frame.render_widget(Clear, dialog_area);

    let mut body = vec![Line::from("")];
    body.extend(lines);

    let paragraph = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" {} ", title)),
        );
    frame.render_widget(paragraph, dialog_area);
}

fn text(s: impl Into<String>) -> Line<'static> {
    Line::styled(s.into(), Style::default().fg(theme().text))
}

fn bold(s: impl Into<String>) -> Line<'static> {
    Line::styled(
        s.into(),
        Style::default().fg(theme().text).add_modifier(Modifier::BOLD),
    )
}

/// Render the controller's current dialog
pub fn render_modal<A: SessionApi>(
    frame: &mut Frame,
    area: Rect,
    modal: Modal,
    controller: &FocusController<A>,
    state: &AppState,
) {
    let t = theme();
    match modal {
        Modal::RecoverOngoing => {
            let mut lines = vec![bold("A focus session is still running")];
            if let Some(session) = controller.ongoing_session() {
                let phase = match session.status {
                    SessionStatus::Break => "on a break",
                    _ => "working",
                };
                let ends = session
                    .current_state_end_time
                    .map(|end| {
                        end.with_timezone(&chrono::Local)
                            .format("%H:%M")
                            .to_string()
                    })
                    .unwrap_or_else(|| "--:--".to_string());
                lines.push(text(format!("Currently {}, phase ends at {}", phase, ends)));
            }
            let mut hints = key_hint("c/Enter", "continue");
            hints.extend(key_hint("d", "discard"));
            render_dialog(frame, area, "Ongoing session", t.accent, lines, Line::from(hints));
        }
        Modal::ConfirmReset(variant) => {
            let config = match variant {
                ResetVariant::Session => ConfirmDialogConfig {
                    title: "Reset",
                    question: "Cancel the running session?",
                    warnings: vec!["The session is cancelled on the server".to_string()],
                    notes: vec![],
                },
                ResetVariant::UiBreak => ConfirmDialogConfig {
                    title: "Reset",
                    question: "Stop the break?",
                    warnings: vec![],
                    notes: vec!["The timer returns to the default length".to_string()],
                },
            };
            let dialog_area = centered_rect(area, DIALOG_WIDTH, config.height());
            render_confirm_dialog(frame, dialog_area, config);
        }
        Modal::CustomDuration => {
            let input = if state.custom_duration_input.is_empty() {
                Span::styled("_", t.muted_style())
            } else {
                Span::styled(
                    format!("{}_", state.custom_duration_input),
                    t.input_style().add_modifier(Modifier::BOLD),
                )
            };
            let lines = vec![
                text("Session length in minutes"),
                Line::from(""),
                Line::from(vec![input, Span::styled(" min", Style::default().fg(t.text))]),
            ];
            let mut hints = key_hint("Enter", "apply");
            hints.extend(key_hint("Esc", "cancel"));
            render_dialog(frame, area, "Custom duration", t.input_prompt, lines, Line::from(hints));
        }
        Modal::CustomWorkComplete => {
            let lines = vec![bold("Focus block complete"), text("Take a break?")];
            let presets = &controller.settings().break_presets_minutes;
            let labels: Vec<(String, String)> = presets
                .iter()
                .take(3)
                .enumerate()
                .map(|(i, m)| ((i + 1).to_string(), format!("{} min", m)))
                .collect();
            let mut hints = Vec::new();
            for (key, label) in &labels {
                hints.extend(key_hint(key, label));
            }
            hints.extend(key_hint("f", "finish"));
            render_dialog(frame, area, "Nice work", t.phase_break, lines, Line::from(hints));
        }
        Modal::LastCycleWorkComplete => {
            let lines = vec![
                bold("Last work cycle done"),
                text("Take one more break or finish the session now"),
            ];
            let mut hints = key_hint("b", "take break");
            hints.extend(key_hint("f", "finish"));
            render_dialog(frame, area, "Final cycle", t.phase_break, lines, Line::from(hints));
        }
        Modal::SessionComplete => {
            let lines = vec![bold("Session complete"), text("Every cycle is done")];
            render_dialog(
                frame,
                area,
                "Well done",
                t.active,
                lines,
                Line::from(key_hint("Enter", "continue")),
            );
        }
        Modal::CustomBreakComplete => {
            let lines = vec![bold("Break is over"), text("Ready for the next focus block")];
            render_dialog(
                frame,
                area,
                "Break finished",
                t.phase_ui_break,
                lines,
                Line::from(key_hint("Enter", "continue")),
            );
        }
    }
}

/// Render the quit confirmation dialog
pub fn render_quit_confirm_dialog(frame: &mut Frame, area: Rect, session_running: bool) {
    let mut notes = Vec::new();
    if session_running {
        notes.push("The session keeps running on the server and can be resumed on the next launch".to_string());
    }
    let config = ConfirmDialogConfig {
        title: "Quit",
        question: "Quit pomotui?",
        warnings: vec![],
        notes,
    };
    let dialog_area = centered_rect(area, DIALOG_WIDTH, config.height() + 1);
    render_confirm_dialog(frame, dialog_area, config);
}

/// Small centered box shown while awaiting the server
pub fn render_loading_indicator(frame: &mut Frame, area: Rect, message: &str) {
    let t = theme();
    let width = (message.chars().count() as u16 + 8).max(24);
    let dialog_area = centered_rect(area, width, 3);
    frame.render_widget(Clear, dialog_area);

    let paragraph = Paragraph::new(format!("⏳ {}", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(t.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.accent)),
        );
    frame.render_widget(paragraph, dialog_area);
}

/// One-line error banner across the bottom of `area`
pub fn render_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    if area.height == 0 {
        return;
    }
    let banner_area = Rect {
        x: area.x,
        y: area.y + area.height - 1,
        width: area.width,
        height: 1,
    };
    let banner = Paragraph::new(format!(" ✖ {} ", message)).style(theme().error_banner_style());
    frame.render_widget(Clear, banner_area);
    frame.render_widget(banner, banner_area);
}
