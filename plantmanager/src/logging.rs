//! Logging configuration using tracing
//!
//! Logs go to daily files under `<data-dir>/logs/` so the terminal UI is
//! never drawn over. The filter comes from `RUST_LOG`, then the settings.

use crate::config::{LOG_FILE, MAX_LOG_FILES};
use crate::error::{AppError, Result};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Daily rotating appender keeping the last `MAX_LOG_FILES` files
pub fn file_appender(log_dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE)
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .map_err(|e| AppError::Generic(format!("Failed to create log appender: {}", e)))
}

/// Initialize the logging subsystem
pub fn init(log_dir: &Path, default_filter: &str) -> Result<()> {
    let file_appender = file_appender(log_dir)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("Log directory: {}", log_dir.display());
    Ok(())
}
