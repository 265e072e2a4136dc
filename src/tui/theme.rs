//! Theme module for centralized color and style definitions
//!
//! Semantic colors used throughout the UI, with the presets selectable
//! through `theme_preset` in the config.

use ratatui::style::{Color, Modifier, Style};

use crate::focus_timing::Phase;

/// Application theme with all color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    // === Phases ===
    pub phase_idle: Color,
    pub phase_work: Color,
    pub phase_break: Color,
    pub phase_ui_break: Color,

    // === UI Elements ===
    /// Primary accent color (headers, titles)
    pub accent: Color,
    pub text: Color,
    pub text_muted: Color,
    /// Color for selected/focused items
    pub selected: Color,
    /// Items chosen for the next session
    pub active: Color,
    pub input_prompt: Color,

    // === Banners ===
    pub error_bg: Color,
    pub error_fg: Color,
    pub warning_bg: Color,
    pub warning_fg: Color,

    // === Borders ===
    pub border: Color,
    pub border_focused: Color,
    pub border_warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            phase_idle: Color::DarkGray,
            phase_work: Color::Red,
            phase_break: Color::Green,
            phase_ui_break: Color::Cyan,

            accent: Color::Cyan,
            text: Color::White,
            text_muted: Color::DarkGray,
            selected: Color::White,
            active: Color::Green,
            input_prompt: Color::Magenta,

            error_bg: Color::Red,
            error_fg: Color::White,
            warning_bg: Color::Yellow,
            warning_fg: Color::Black,

            border: Color::White,
            border_focused: Color::Cyan,
            border_warning: Color::Yellow,
        }
    }

    pub fn light() -> Self {
        Self {
            phase_idle: Color::Gray,
            phase_work: Color::Red,
            phase_break: Color::Green,
            phase_ui_break: Color::Blue,

            accent: Color::Blue,
            text: Color::Black,
            text_muted: Color::Gray,
            selected: Color::Black,
            active: Color::Green,
            input_prompt: Color::Magenta,

            error_bg: Color::Red,
            error_fg: Color::White,
            warning_bg: Color::Yellow,
            warning_fg: Color::Black,

            border: Color::Black,
            border_focused: Color::Blue,
            border_warning: Color::Red,
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            phase_idle: Color::White,
            phase_work: Color::LightRed,
            phase_break: Color::LightGreen,
            phase_ui_break: Color::LightCyan,

            accent: Color::LightYellow,
            text: Color::White,
            text_muted: Color::Gray,
            selected: Color::LightYellow,
            active: Color::LightGreen,
            input_prompt: Color::LightMagenta,

            error_bg: Color::LightRed,
            error_fg: Color::Black,
            warning_bg: Color::LightYellow,
            warning_fg: Color::Black,

            border: Color::White,
            border_focused: Color::LightYellow,
            border_warning: Color::LightRed,
        }
    }

    /// Theme for a `theme_preset` value; unknown names fall back to dark
    pub fn from_preset(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "high-contrast" => Self::high_contrast(),
            _ => Self::dark(),
        }
    }

    pub fn phase_color(&self, phase: Phase) -> Color {
        match phase {
            Phase::Idle => self.phase_idle,
            Phase::Work => self.phase_work,
            Phase::Break => self.phase_break,
            Phase::UiBreak => self.phase_ui_break,
        }
    }

    // === Style Builders ===

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn input_style(&self) -> Style {
        Style::default().fg(self.input_prompt)
    }

    pub fn error_banner_style(&self) -> Style {
        Style::default().fg(self.error_fg).bg(self.error_bg)
    }

    pub fn warning_banner_style(&self) -> Style {
        Style::default().fg(self.warning_fg).bg(self.warning_bg)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        let color = if focused {
            self.border_focused
        } else {
            self.border
        };
        Style::default().fg(color)
    }
}

/// Parse a `#rrggbb` tag color
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

static THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

/// Select the theme once at startup; later calls are ignored
pub fn init_theme(preset: &str) {
    if THEME.set(Theme::from_preset(preset)).is_err() {
        tracing::debug!("Theme already initialized");
    }
}

/// Get the current theme
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}
