//! Shared command setup: configuration and logging.

use tracing::info;
use trajtok::config::ConfigFile;
use trajtok::logging::{init_logging, WorkerGuard};

use crate::error::CliError;

/// Loaded configuration plus the live log writer.
///
/// Commands that do real work build one of these first so that library
/// events land in the log file.
pub struct CliRunner {
    config: ConfigFile,
    _log_guard: WorkerGuard,
}

impl CliRunner {
    /// Load `config.ini` and install logging.
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load()?;
        let guard = init_logging(&config.logging)?;
        Ok(Self {
            config,
            _log_guard: guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Record which command is running.
    pub fn log_startup(&self, command: &str) {
        info!(
            version = trajtok::VERSION,
            command,
            log_dir = %self.config.logging.directory.display(),
            "trajtok starting"
        );
    }
}
