//! In-memory log buffer backing the Messages panel
//!
//! Thread-safe ring buffer of recent log entries plus a smaller ring of
//! warnings and errors, which the header counts until the panel is opened.

use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

/// Log level for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Parse the level column written by the fmt layer
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "TRACE" => Some(LogLevel::Trace),
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" => Some(LogLevel::Warn),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Warnings and errors count as alerts
    pub fn is_alert(&self) -> bool {
        matches!(self, LogLevel::Warn | LogLevel::Error)
    }
}

/// A single log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Module that produced the log
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            target: target.into(),
            message: message.into(),
        }
    }
}

/// Thread-safe ring buffer for storing log entries
#[derive(Debug)]
pub struct LogBuffer {
    entries: RwLock<VecDeque<LogEntry>>,
    /// Warnings and errors not yet seen in the Messages panel
    alerts: RwLock<VecDeque<LogEntry>>,
    max_entries: usize,
    max_alerts: usize,
}

impl LogBuffer {
    /// Create a new log buffer with specified capacities
    pub fn new(max_entries: usize, max_alerts: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_entries)),
            alerts: RwLock::new(VecDeque::with_capacity(max_alerts)),
            max_entries,
            max_alerts,
        }
    }

    pub fn push(&self, entry: LogEntry) {
        if entry.level.is_alert() {
            if let Ok(mut alerts) = self.alerts.write() {
                if alerts.len() >= self.max_alerts {
                    alerts.pop_front();
                }
                alerts.push_back(entry.clone());
            }
        }

        if let Ok(mut entries) = self.entries.write() {
            if entries.len() >= self.max_entries {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }

    /// Last `limit` entries at or above `min_level`, oldest first
    pub fn recent(&self, limit: usize, min_level: LogLevel) -> Vec<LogEntry> {
        let Ok(entries) = self.entries.read() else {
            return Vec::new();
        };
        let mut selected: Vec<LogEntry> = entries
            .iter()
            .rev()
            .filter(|e| e.level >= min_level)
            .take(limit)
            .cloned()
            .collect();
        selected.reverse();
        selected
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.read().map(|a| a.len()).unwrap_or(0)
    }

    /// Mark alerts as seen (when the Messages panel opens)
    pub fn clear_alerts(&self) {
        if let Ok(mut alerts) = self.alerts.write() {
            alerts.clear();
        }
    }
}
