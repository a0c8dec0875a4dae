//! Configuration file.
//!
//! Settings live in `<config_dir>/trajtok/config.ini`:
//!
//! ```ini
//! [tokenizer]
//! resolution = 10
//!
//! [detokenizer]
//! clusters = /data/h3_clusters.json
//! classifiers = /data/h3_classifiers.bin
//! min_cluster_samples = 20
//! precision = 6
//!
//! [store]
//! directory = /home/user/.local/share/trajtok/store
//!
//! [logging]
//! directory = /home/user/.local/share/trajtok/logs
//! level = info
//! ```
//!
//! A missing file means all defaults; a missing key means that key's default.

mod keys;

pub use keys::ConfigKey;

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::detokenizer::{DetokenizerConfig, DEFAULT_MIN_CLUSTER_SAMPLES, DEFAULT_PRECISION};
use crate::tokenizer::DEFAULT_RESOLUTION;

/// Application directory name under the platform config/data dirs.
const APP_DIR: &str = "trajtok";

/// Configuration filename.
const CONFIG_FILE: &str = "config.ini";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: ini::Error },

    #[error("Failed to write config {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `[tokenizer]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerSettings {
    pub resolution: u8,
}

/// `[detokenizer]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetokenizerSettings {
    pub clusters: Option<PathBuf>,
    pub classifiers: Option<PathBuf>,
    pub min_cluster_samples: u64,
    pub precision: u32,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub directory: PathBuf,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub level: String,
}

/// Parsed `config.ini`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub tokenizer: TokenizerSettings,
    pub detokenizer: DetokenizerSettings,
    pub store: StoreSettings,
    pub logging: LoggingSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let data = data_dir();
        Self {
            tokenizer: TokenizerSettings {
                resolution: DEFAULT_RESOLUTION,
            },
            detokenizer: DetokenizerSettings {
                clusters: None,
                classifiers: None,
                min_cluster_samples: DEFAULT_MIN_CLUSTER_SAMPLES,
                precision: DEFAULT_PRECISION,
            },
            store: StoreSettings {
                directory: data.join("store"),
            },
            logging: LoggingSettings {
                directory: data.join("logs"),
                level: "info".to_string(),
            },
        }
    }
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(config_file_path())
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::default();
        if !path.exists() {
            return Ok(config);
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }

        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(config_file_path())
    }

    /// Save to `path`, creating parent directories. Unset keys are omitted.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_failed = |e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }

        ini.write_to_file(path).map_err(write_failed)
    }

    /// Detokenizer tunables from the `[detokenizer]` section.
    pub fn detokenizer_config(&self) -> DetokenizerConfig {
        DetokenizerConfig::default()
            .with_min_cluster_samples(self.detokenizer.min_cluster_samples)
            .with_precision(self.detokenizer.precision)
    }
}

/// Directory holding `config.ini`.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Full path of `config.ini`.
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Default root for the store and logs.
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
