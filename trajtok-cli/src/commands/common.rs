//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;

use clap::ValueEnum;
use tracing::warn;
use trajtok::config::ConfigFile;
use trajtok::model::ModelStore;
use trajtok::store::{Operation, TrajectoryStore};

use crate::error::CliError;

/// Dataset purpose selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OperationArg {
    /// Data for pretraining a sequence model
    Pretraining,
    /// Data for finetuning a sequence model
    Finetuning,
    /// Held-out data for evaluation
    Testing,
}

impl From<OperationArg> for Operation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Pretraining => Operation::Pretraining,
            OperationArg::Finetuning => Operation::Finetuning,
            OperationArg::Testing => Operation::Testing,
        }
    }
}

/// Resolve the tokenization resolution from CLI args and config.
pub fn resolve_resolution(cli_resolution: Option<u8>, config: &ConfigFile) -> u8 {
    cli_resolution.unwrap_or(config.tokenizer.resolution)
}

/// Resolve the trajectory store from CLI args and config.
pub fn resolve_store(cli_store: Option<PathBuf>, config: &ConfigFile) -> TrajectoryStore {
    TrajectoryStore::new(cli_store.unwrap_or_else(|| config.store.directory.clone()))
}

/// Resolve and load the model store from CLI args and config.
///
/// With no artifacts configured at all the detokenizer still works, using hex
/// centroids only. Configuring just one of the two artifacts is an error.
pub fn resolve_models(
    cli_clusters: Option<PathBuf>,
    cli_classifiers: Option<PathBuf>,
    config: &ConfigFile,
) -> Result<ModelStore, CliError> {
    // CLI takes precedence, then config
    let clusters = cli_clusters.or_else(|| config.detokenizer.clusters.clone());
    let classifiers = cli_classifiers.or_else(|| config.detokenizer.classifiers.clone());

    match (clusters, classifiers) {
        (Some(clusters), Some(classifiers)) => Ok(ModelStore::load(clusters, classifiers)?),
        (None, None) => {
            warn!("No model artifacts configured, using hex centroids only");
            eprintln!("No model artifacts configured; reconstructing from hex centroids only.");
            Ok(ModelStore::empty())
        }
        (Some(_), None) => Err(CliError::Config(
            "Cluster statistics given without classifiers. \
             Set detokenizer.classifiers in config.ini or use --classifiers."
                .to_string(),
        )),
        (None, Some(_)) => Err(CliError::Config(
            "Classifiers given without cluster statistics. \
             Set detokenizer.clusters in config.ini or use --clusters."
                .to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_resolution_overrides_config() {
        let mut config = ConfigFile::default();
        config.tokenizer.resolution = 8;
        assert_eq!(resolve_resolution(None, &config), 8);
        assert_eq!(resolve_resolution(Some(11), &config), 11);
    }

    #[test]
    fn test_store_falls_back_to_config() {
        let mut config = ConfigFile::default();
        config.store.directory = PathBuf::from("/var/trajtok");
        assert_eq!(resolve_store(None, &config).root(), PathBuf::from("/var/trajtok"));
        assert_eq!(
            resolve_store(Some(PathBuf::from("/tmp/s")), &config).root(),
            PathBuf::from("/tmp/s")
        );
    }

    #[test]
    fn test_no_artifacts_gives_empty_models() {
        let models = resolve_models(None, None, &ConfigFile::default()).unwrap();
        assert!(models.is_empty());
    }

    #[test]
    fn test_half_configured_artifacts_rejected() {
        let result = resolve_models(Some(PathBuf::from("c.json")), None, &ConfigFile::default());
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_operation_conversion() {
        assert_eq!(Operation::from(OperationArg::Testing), Operation::Testing);
        assert_eq!(Operation::from(OperationArg::Pretraining), Operation::Pretraining);
    }
}
