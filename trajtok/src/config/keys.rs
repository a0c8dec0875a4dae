//! Typed configuration keys.
//!
//! Every setting in `config.ini` has a [`ConfigKey`] addressed as
//! `section.key`. Keys know how to read their value out of a [`ConfigFile`]
//! and how to validate and write a new one.

use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};
use crate::detokenizer::MAX_PRECISION;
use crate::grid::MAX_RESOLUTION;

/// Log levels accepted by `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    TokenizerResolution,
    DetokenizerClusters,
    DetokenizerClassifiers,
    DetokenizerMinClusterSamples,
    DetokenizerPrecision,
    StoreDirectory,
    LoggingDirectory,
    LoggingLevel,
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::TokenizerResolution,
            ConfigKey::DetokenizerClusters,
            ConfigKey::DetokenizerClassifiers,
            ConfigKey::DetokenizerMinClusterSamples,
            ConfigKey::DetokenizerPrecision,
            ConfigKey::StoreDirectory,
            ConfigKey::LoggingDirectory,
            ConfigKey::LoggingLevel,
        ]
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::TokenizerResolution => "tokenizer",
            ConfigKey::DetokenizerClusters
            | ConfigKey::DetokenizerClassifiers
            | ConfigKey::DetokenizerMinClusterSamples
            | ConfigKey::DetokenizerPrecision => "detokenizer",
            ConfigKey::StoreDirectory => "store",
            ConfigKey::LoggingDirectory | ConfigKey::LoggingLevel => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::TokenizerResolution => "resolution",
            ConfigKey::DetokenizerClusters => "clusters",
            ConfigKey::DetokenizerClassifiers => "classifiers",
            ConfigKey::DetokenizerMinClusterSamples => "min_cluster_samples",
            ConfigKey::DetokenizerPrecision => "precision",
            ConfigKey::StoreDirectory | ConfigKey::LoggingDirectory => "directory",
            ConfigKey::LoggingLevel => "level",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        let path_value = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        match self {
            ConfigKey::TokenizerResolution => config.tokenizer.resolution.to_string(),
            ConfigKey::DetokenizerClusters => path_value(&config.detokenizer.clusters),
            ConfigKey::DetokenizerClassifiers => path_value(&config.detokenizer.classifiers),
            ConfigKey::DetokenizerMinClusterSamples => {
                config.detokenizer.min_cluster_samples.to_string()
            }
            ConfigKey::DetokenizerPrecision => config.detokenizer.precision.to_string(),
            ConfigKey::StoreDirectory => config.store.directory.display().to_string(),
            ConfigKey::LoggingDirectory => config.logging.directory.display().to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
        }
    }

    /// Validate and apply `value`.
    ///
    /// An empty value clears optional paths.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason,
        };
        let optional_path = |v: &str| (!v.is_empty()).then(|| PathBuf::from(v));

        match self {
            ConfigKey::TokenizerResolution => {
                let resolution: u8 = value
                    .parse()
                    .map_err(|_| invalid("expected an integer".to_string()))?;
                if resolution > MAX_RESOLUTION {
                    return Err(invalid(format!("must be at most {}", MAX_RESOLUTION)));
                }
                config.tokenizer.resolution = resolution;
            }
            ConfigKey::DetokenizerClusters => config.detokenizer.clusters = optional_path(value),
            ConfigKey::DetokenizerClassifiers => {
                config.detokenizer.classifiers = optional_path(value)
            }
            ConfigKey::DetokenizerMinClusterSamples => {
                config.detokenizer.min_cluster_samples = value
                    .parse()
                    .map_err(|_| invalid("expected a non-negative integer".to_string()))?;
            }
            ConfigKey::DetokenizerPrecision => {
                let precision: u32 = value
                    .parse()
                    .map_err(|_| invalid("expected a non-negative integer".to_string()))?;
                if precision > MAX_PRECISION {
                    return Err(invalid(format!("must be at most {}", MAX_PRECISION)));
                }
                config.detokenizer.precision = precision;
            }
            ConfigKey::StoreDirectory => {
                if value.is_empty() {
                    return Err(invalid("directory cannot be empty".to_string()));
                }
                config.store.directory = PathBuf::from(value);
            }
            ConfigKey::LoggingDirectory => {
                if value.is_empty() {
                    return Err(invalid("directory cannot be empty".to_string()));
                }
                config.logging.directory = PathBuf::from(value);
            }
            ConfigKey::LoggingLevel => {
                let level = value.to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(invalid(format!("expected one of {}", LOG_LEVELS.join(", "))));
                }
                config.logging.level = level;
            }
        }

        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
