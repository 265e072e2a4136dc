//! Configuration management for pomotui

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::TokenSource;
use crate::focus_timing::{
    ControllerSettings, DEFAULT_BREAK_SECS, DEFAULT_WORK_SECS, MAX_PHASE_MINUTES,
};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the session API, including the `/api` prefix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// File holding the bearer token (`~` is expanded). `POMOTUI_TOKEN` wins over it.
    #[serde(default = "default_token_file")]
    pub token_file: String,

    /// Request timeout in seconds; 0 disables the timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Work length shown when nothing is selected (default: 25)
    #[serde(default = "default_work_minutes")]
    pub default_work_minutes: u64,

    /// Local break length used when no preset applies (default: 5)
    #[serde(default = "default_break_minutes")]
    pub default_break_minutes: u64,

    /// Break lengths offered after a custom session
    #[serde(default = "default_break_presets")]
    pub break_presets_minutes: Vec<u64>,

    /// Theme preset: "dark" (default), "light", or "high-contrast"
    #[serde(default = "default_theme_preset")]
    pub theme_preset: String,

    /// Notification method: "bell" (terminal bell) or "none"
    #[serde(default = "default_notification_method")]
    pub notification_method: String,

    /// Countdown refresh cadence in milliseconds (default: 1000)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_token_file() -> String {
    "~/.pomotui/token".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_work_minutes() -> u64 {
    25 // Pomodoro-style default
}

fn default_break_minutes() -> u64 {
    5
}

fn default_break_presets() -> Vec<u64> {
    vec![5, 10, 15]
}

fn default_theme_preset() -> String {
    "dark".to_string()
}

fn default_notification_method() -> String {
    "bell".to_string()
}

fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token_file: default_token_file(),
            request_timeout_secs: default_request_timeout_secs(),
            default_work_minutes: default_work_minutes(),
            default_break_minutes: default_break_minutes(),
            break_presets_minutes: default_break_presets(),
            theme_preset: default_theme_preset(),
            notification_method: default_notification_method(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Default work length; 0 falls back to 25 minutes, capped at a day
    pub fn work_duration(&self) -> Duration {
        match self.default_work_minutes {
            0 => Duration::from_secs(DEFAULT_WORK_SECS),
            m => Duration::from_secs(m.min(MAX_PHASE_MINUTES) * 60),
        }
    }

    /// Default break length; 0 falls back to 5 minutes, capped at a day
    pub fn break_duration(&self) -> Duration {
        match self.default_break_minutes {
            0 => Duration::from_secs(DEFAULT_BREAK_SECS),
            m => Duration::from_secs(m.min(MAX_PHASE_MINUTES) * 60),
        }
    }

    /// `None` when timeouts are disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            s => Some(Duration::from_secs(s)),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        match self.tick_interval_ms {
            0 => Duration::from_millis(default_tick_interval_ms()),
            ms => Duration::from_millis(ms),
        }
    }

    /// Token file with `~` and env vars expanded
    pub fn token_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.token_file).into_owned())
    }

    pub fn token_source(&self) -> TokenSource {
        TokenSource::EnvOrFile(self.token_path())
    }

    pub fn bell_enabled(&self) -> bool {
        self.notification_method == "bell"
    }

    /// Break presets with zero entries removed and each capped at a day;
    /// defaults if none remain
    pub fn break_presets(&self) -> Vec<u64> {
        let presets: Vec<u64> = self
            .break_presets_minutes
            .iter()
            .copied()
            .filter(|m| *m > 0)
            .map(|m| m.min(MAX_PHASE_MINUTES))
            .collect();
        if presets.is_empty() {
            default_break_presets()
        } else {
            presets
        }
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            default_work_minutes: self.work_duration().as_secs() / 60,
            break_presets_minutes: self.break_presets(),
            default_break_minutes: self.break_duration().as_secs() / 60,
            tick_interval: self.tick_interval(),
        }
    }
}

/// Get the base configuration directory (~/.pomotui)
/// Falls back to ./.pomotui if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".pomotui")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".pomotui"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Ensure all required directories exist
pub fn ensure_directories() -> Result<()> {
    std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;
    std::fs::create_dir_all(logs_dir()).context("Failed to create logs directory")?;
    Ok(())
}
