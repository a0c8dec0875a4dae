//! CLI error type.

use std::fmt;

use trajtok::config::ConfigError;
use trajtok::dataset::DatasetError;
use trajtok::logging::LoggingError;
use trajtok::model::ModelError;
use trajtok::pipeline::PipelineError;
use trajtok::store::StoreError;

/// Errors reported to the user before exiting with status 1.
#[derive(Debug)]
pub enum CliError {
    /// Bad configuration or conflicting arguments.
    Config(String),
    /// Logging could not be set up.
    Logging(LoggingError),
    /// Tokenization or detokenization failed.
    Pipeline(PipelineError),
    /// Reading or writing a stored dataset failed.
    Store(StoreError),
    /// Model artifacts could not be loaded.
    Model(ModelError),
    /// Trajectory input could not be parsed.
    Dataset(DatasetError),
    /// Writing output failed.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::Pipeline(e) => write!(f, "{}", e),
            CliError::Store(e) => write!(f, "Store error: {}", e),
            CliError::Model(e) => write!(f, "Model error: {}", e),
            CliError::Dataset(e) => write!(f, "Input error: {}", e),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Logging(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::Store(e) => Some(e),
            CliError::Model(e) => Some(e),
            CliError::Dataset(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<ModelError> for CliError {
    fn from(e: ModelError) -> Self {
        CliError::Model(e)
    }
}

impl From<DatasetError> for CliError {
    fn from(e: DatasetError) -> Self {
        CliError::Dataset(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
