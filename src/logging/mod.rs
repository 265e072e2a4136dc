//! Logging for pomotui
//!
//! Timestamped log files with a 7-day retention, mirrored into an in-memory
//! buffer shown in the Messages panel.

mod buffer;
mod file_writer;
mod retention;

pub use buffer::{LogBuffer, LogEntry, LogLevel};
pub use file_writer::{init_file_logging, LogFileInfo, LoggingGuard, DEFAULT_FILTER};
pub use retention::cleanup_old_logs;
