//! Logging setup.
//!
//! Installs a global `tracing` subscriber that writes to a daily-rolling
//! `trajtok.log` in the configured directory. `RUST_LOG` takes precedence over
//! the configured level.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

pub use tracing_appender::non_blocking::WorkerGuard;

/// Log file name prefix inside the log directory.
pub const LOG_FILE_PREFIX: &str = "trajtok.log";

/// Timestamp layout for log lines.
const TIME_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]";

/// Errors that can occur while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {}: {source}", path.display())]
    CreateDirectoryFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid time format: {0}")]
    TimeFormat(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the background writer.
pub fn init_logging(settings: &LoggingSettings) -> Result<WorkerGuard, LoggingError> {
    fs::create_dir_all(&settings.directory).map_err(|e| LoggingError::CreateDirectoryFailed {
        path: settings.directory.clone(),
        source: e,
    })?;

    let timer = time::format_description::parse(TIME_FORMAT)
        .map(LocalTime::new)
        .map_err(|e| LoggingError::TimeFormat(e.to_string()))?;

    let appender = tracing_appender::rolling::daily(&settings.directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(timer)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_time_format_parses() {
        assert!(time::format_description::parse(TIME_FORMAT).is_ok());
    }

    #[test]
    fn test_unwritable_directory_reported() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, b"").unwrap();

        let settings = LoggingSettings {
            directory: blocker.join("logs"),
            level: "info".to_string(),
        };
        let err = init_logging(&settings).unwrap_err();
        assert!(matches!(err, LoggingError::CreateDirectoryFailed { .. }));
    }
}
