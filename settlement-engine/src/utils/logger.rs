//! Logging Infrastructure
//!
//! Structured logging setup for development and production. `RUST_LOG`, when
//! set, takes precedence over the configured level.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger from engine configuration
pub fn init_logger_from_config(config: &Config) {
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
}

/// Initialize the logger with optional file output
///
/// Only the first call in a process installs a subscriber; later calls are
/// no-ops.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Add file output if log_dir is provided
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "settlement-engine");
            let _ = subscriber.with_ansi(false).with_writer(file_appender).try_init();
            return;
        }
    }

    let _ = subscriber.try_init();
}
