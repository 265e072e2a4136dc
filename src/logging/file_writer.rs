//! File-based logging with tracing integration
//!
//! Every formatted line goes to a timestamped file and is parsed back into
//! the [`LogBuffer`] for the Messages panel.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use super::buffer::{LogBuffer, LogEntry, LogLevel};

/// Prefix shared by all log files we create (and clean up)
pub const LOG_FILE_PREFIX: &str = "pomotui-";

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "pomotui=info";

const DEFAULT_TARGET: &str = "pomotui";

/// Information about the current log file
#[derive(Debug, Clone)]
pub struct LogFileInfo {
    pub path: PathBuf,
}

/// Generate a timestamped log file path
pub fn create_log_file_path(logs_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    logs_dir.join(format!("{}{}.log", LOG_FILE_PREFIX, timestamp))
}

/// Writes to the log file and mirrors parsed lines into the buffer
struct DualWriter {
    file: Arc<Mutex<File>>,
    buffer: Arc<LogBuffer>,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(buf);
            let _ = file.flush();
        }

        if let Ok(text) = std::str::from_utf8(buf) {
            for line in text.lines() {
                if let Some(entry) = parse_log_line(line) {
                    self.buffer.push(entry);
                }
            }
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.file.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => Ok(()),
        }
    }
}

/// Parse a fmt-layer line: `<rfc3339> <LEVEL> <target>: <message>`
///
/// Lines that do not follow the layout are kept whole at INFO.
fn parse_log_line(line: &str) -> Option<LogEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (timestamp, rest) = match line.split_once(char::is_whitespace) {
        Some((first, rest)) => match DateTime::parse_from_rfc3339(first) {
            Ok(ts) => (ts.with_timezone(&Utc), rest.trim_start()),
            Err(_) => (Utc::now(), line),
        },
        None => (Utc::now(), line),
    };

    let (level, rest) = match rest.split_once(char::is_whitespace) {
        Some((word, tail)) => match LogLevel::parse(word) {
            Some(level) => (level, tail.trim_start()),
            None => (LogLevel::Info, rest),
        },
        None => (LogLevel::Info, rest),
    };

    // A target is a module path without spaces, followed by ": "
    let (target, message) = match rest.split_once(": ") {
        Some((target, message)) if !target.contains(' ') => {
            (target.to_string(), message.to_string())
        }
        _ => (DEFAULT_TARGET.to_string(), rest.to_string()),
    };

    Some(LogEntry {
        timestamp,
        level,
        target,
        message,
    })
}

/// Writer factory for tracing-subscriber
struct DualWriterMaker {
    file: Arc<Mutex<File>>,
    buffer: Arc<LogBuffer>,
}

impl<'a> MakeWriter<'a> for DualWriterMaker {
    type Writer = DualWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DualWriter {
            file: Arc::clone(&self.file),
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Keeps the log file open for the lifetime of the app
pub struct LoggingGuard {
    _file: Arc<Mutex<File>>,
}

/// Initialize file logging with buffer integration
///
/// Returns the log file info and a guard that must be kept alive for the duration of logging.
pub fn init_file_logging(
    logs_dir: PathBuf,
    buffer: Arc<LogBuffer>,
) -> Result<(LogFileInfo, LoggingGuard)> {
    fs::create_dir_all(&logs_dir).context("Failed to create logs directory")?;

    let log_path = create_log_file_path(&logs_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;
    let file = Arc::new(Mutex::new(file));

    let writer = DualWriterMaker {
        file: Arc::clone(&file),
        buffer,
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok((LogFileInfo { path: log_path }, LoggingGuard { _file: file }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_info_line() {
        let line = "2026-01-21T14:30:45.123456Z  INFO pomotui: Starting pomotui";
        let entry = parse_log_line(line).unwrap();
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.target, "pomotui");
        assert_eq!(entry.message, "Starting pomotui");
        assert_eq!(entry.timestamp.to_rfc3339(), "2026-01-21T14:30:45.123456+00:00");
    }

    #[test]
    fn test_parse_structured_fields() {
        let line = "2026-01-21T14:30:45.123456Z ERROR pomotui::focus_timing::lifecycle: \
                    Failed to transition session: Server error (HTTP 503) session_id=7b1e";
        let entry = parse_log_line(line).unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.target, "pomotui::focus_timing::lifecycle");
        assert!(entry.message.starts_with("Failed to transition session"));
    }

    #[test]
    fn test_parse_unstructured_line() {
        let entry = parse_log_line("something odd happened here").unwrap();
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.target, "pomotui");
        assert_eq!(entry.message, "something odd happened here");

        assert!(parse_log_line("   ").is_none());
    }

    #[test]
    fn test_create_log_file_path() {
        let logs_dir = PathBuf::from("/tmp/pomotui/logs");
        let path = create_log_file_path(&logs_dir);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(LOG_FILE_PREFIX));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_dual_writer_feeds_buffer() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = File::create(dir.path().join("pomotui-test.log")).unwrap();
        let buffer = Arc::new(LogBuffer::new(10, 10));
        let mut writer = DualWriter {
            file: Arc::new(Mutex::new(file)),
            buffer: Arc::clone(&buffer),
        };

        writer
            .write_all(b"2026-01-21T14:30:45Z  WARN pomotui::app: Signed out\n")
            .unwrap();
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.alert_count(), 1);

        let written = fs::read_to_string(dir.path().join("pomotui-test.log")).unwrap();
        assert!(written.contains("Signed out"));
    }
}
