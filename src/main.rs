use std::sync::Arc;

use anyhow::Result;

use pomotui::app::App;
use pomotui::config;
use pomotui::logging::{self, LogBuffer};

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure config directory exists (creates logs dir too)
    config::ensure_directories()?;

    // Backs the Messages panel
    let log_buffer = Arc::new(LogBuffer::new(2_000, 100));

    // Initialize file logging BEFORE any tracing calls
    let (log_file_info, _guard) =
        logging::init_file_logging(config::logs_dir(), Arc::clone(&log_buffer))?;

    // Clean up old logs (7-day retention)
    match logging::cleanup_old_logs(&config::logs_dir()) {
        Ok(count) if count > 0 => tracing::info!("Cleaned up {} old log files", count),
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to clean up old logs: {}", e),
    }

    tracing::info!("Logging to: {}", log_file_info.path.display());

    let mut app = App::new(log_buffer, log_file_info).await?;
    app.run().await
}
