//! Cluster model store.
//!
//! Read-only lookup of precomputed per-token statistics, built once from two
//! artifacts and shared thereafter:
//!
//! - [`ClusterStat`]: the observed data centroid of a token and how many
//!   samples it was computed from.
//! - [`ClassifierEntry`]: a bearing classifier plus the cluster means it picks
//!   between.
//!
//! Loading is all-or-nothing. A malformed entry in either artifact fails the
//! whole load, so a store is never partially populated.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use trajtok::model::ModelStore;
//!
//! let store = Arc::new(ModelStore::load("clusters.json", "classifiers.json")?);
//! if let Some(stat) = store.lookup_stat(&token) {
//!     println!("{} samples", stat.current_count);
//! }
//! ```

mod artifact;
mod classifier;

pub use artifact::{
    read_artifact, write_artifact, ClassifierArtifact, ClassifiersArtifact, ClusterArtifact,
};
pub use classifier::{ClassifierEntry, ClusterMean, NearestCentroid, Predictor};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::geo::Point;
use crate::grid::Token;

/// Observed centroid and sample count for one token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterStat {
    pub x: f64,
    pub y: f64,
    pub current_count: u64,
}

impl ClusterStat {
    pub fn new(x: f64, y: f64, current_count: u64) -> Self {
        Self {
            x,
            y,
            current_count,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Errors that can occur while building a [`ModelStore`].
#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact file could not be opened.
    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Artifact file could not be created.
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON artifact is malformed.
    #[error("Malformed JSON artifact {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Bincode artifact is malformed.
    #[error("Malformed bincode artifact {}: {source}", path.display())]
    Bincode {
        path: PathBuf,
        source: bincode::Error,
    },

    /// Cluster statistic with unusable values.
    #[error("Invalid cluster stat for token {token}: {reason}")]
    InvalidStat { token: String, reason: String },

    /// Classifier entry with unusable values.
    #[error("Invalid classifier for token {token}: {reason}")]
    InvalidClassifier { token: String, reason: String },
}

/// Result type for model store operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Immutable token → statistics / classifier lookup.
///
/// `ModelStore` is `Send + Sync` and has no mutation methods after
/// construction; wrap it in an `Arc` to share between detokenizers.
#[derive(Debug, Default)]
pub struct ModelStore {
    stats: HashMap<Token, ClusterStat>,
    classifiers: HashMap<Token, ClassifierEntry>,
}

impl ModelStore {
    /// A store with no entries. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from already-decoded artifacts, validating every entry.
    pub fn from_artifacts(
        clusters: ClusterArtifact,
        classifiers: ClassifiersArtifact,
    ) -> ModelResult<Self> {
        for (token, stat) in &clusters {
            if !stat.x.is_finite() || !stat.y.is_finite() {
                return Err(ModelError::InvalidStat {
                    token: token.to_string(),
                    reason: format!("non-finite centroid ({}, {})", stat.x, stat.y),
                });
            }
        }

        let classifiers = classifiers
            .into_iter()
            .map(|(token, artifact)| {
                let entry = artifact.into_entry(&token)?;
                Ok((token, entry))
            })
            .collect::<ModelResult<HashMap<_, _>>>()?;

        Ok(Self::from_parts(clusters, classifiers))
    }

    /// Build a store from live entries without validation.
    pub fn from_parts(
        stats: HashMap<Token, ClusterStat>,
        classifiers: HashMap<Token, ClassifierEntry>,
    ) -> Self {
        Self { stats, classifiers }
    }

    /// Load both artifacts from disk.
    ///
    /// # Errors
    ///
    /// Fails if either file is missing, cannot be decoded, or contains an
    /// invalid entry.
    pub fn load(
        clusters_path: impl AsRef<Path>,
        classifiers_path: impl AsRef<Path>,
    ) -> ModelResult<Self> {
        let clusters_path = clusters_path.as_ref();
        let classifiers_path = classifiers_path.as_ref();

        let clusters: ClusterArtifact = read_artifact(clusters_path)?;
        let classifiers: ClassifiersArtifact = read_artifact(classifiers_path)?;
        let store = Self::from_artifacts(clusters, classifiers)?;

        info!(
            clusters = %clusters_path.display(),
            classifiers = %classifiers_path.display(),
            stats = store.stat_count(),
            classifier_count = store.classifier_count(),
            "Loaded model store"
        );

        Ok(store)
    }

    /// Data-derived centroid statistics for `token`.
    pub fn lookup_stat(&self, token: &Token) -> Option<&ClusterStat> {
        self.stats.get(token)
    }

    /// Direction classifier for `token`.
    pub fn lookup_classifier(&self, token: &Token) -> Option<&ClassifierEntry> {
        self.classifiers.get(token)
    }

    pub fn stat_count(&self) -> usize {
        self.stats.len()
    }

    pub fn classifier_count(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty() && self.classifiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn token(raw: &str) -> Token {
        Token::from(raw)
    }

    #[test]
    fn test_empty_store_misses() {
        let store = ModelStore::empty();
        assert!(store.is_empty());
        assert!(store.lookup_stat(&token("8928308280fffff")).is_none());
        assert!(store.lookup_classifier(&token("8928308280fffff")).is_none());
    }

    #[test]
    fn test_from_artifacts_lookups() {
        let mut clusters = ClusterArtifact::new();
        clusters.insert(token("a"), ClusterStat::new(1.0, 2.0, 30));
        let mut classifiers = ClassifiersArtifact::new();
        classifiers.insert(
            token("b"),
            ClassifierArtifact {
                centers: vec![0.0],
                means: vec![[5.0, 6.0, 7.0]],
            },
        );

        let store = ModelStore::from_artifacts(clusters, classifiers).unwrap();
        assert_eq!(store.stat_count(), 1);
        assert_eq!(store.classifier_count(), 1);
        assert_eq!(store.lookup_stat(&token("a")).unwrap().current_count, 30);
        assert!(store.lookup_stat(&token("b")).is_none());
        assert!(store.lookup_classifier(&token("b")).is_some());
        assert!(store.lookup_classifier(&token("a")).is_none());
    }

    #[test]
    fn test_non_finite_stat_rejected() {
        let mut clusters = ClusterArtifact::new();
        clusters.insert(token("a"), ClusterStat::new(f64::NAN, 2.0, 30));

        let err = ModelStore::from_artifacts(clusters, ClassifiersArtifact::new()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidStat { .. }));
    }

    #[test]
    fn test_one_bad_classifier_fails_whole_store() {
        let mut classifiers = ClassifiersArtifact::new();
        classifiers.insert(
            token("good"),
            ClassifierArtifact {
                centers: vec![0.0],
                means: vec![[1.0, 1.0, 1.0]],
            },
        );
        classifiers.insert(
            token("bad"),
            ClassifierArtifact {
                centers: vec![0.0, 1.0],
                means: vec![[1.0, 1.0, 1.0]],
            },
        );

        let result = ModelStore::from_artifacts(ClusterArtifact::new(), classifiers);
        assert!(matches!(result, Err(ModelError::InvalidClassifier { .. })));
    }

    #[test]
    fn test_load_from_files() {
        let temp = TempDir::new().unwrap();
        let clusters_path = temp.path().join("clusters.json");
        let classifiers_path = temp.path().join("classifiers.bin");

        let mut clusters = ClusterArtifact::new();
        clusters.insert(token("8928308280fffff"), ClusterStat::new(-122.4, 37.7, 21));
        write_artifact(&clusters_path, &clusters).unwrap();

        let mut classifiers = ClassifiersArtifact::new();
        classifiers.insert(
            token("8928308280fffff"),
            ClassifierArtifact {
                centers: vec![90.0, 270.0],
                means: vec![[-122.41, 37.71, 10.0], [-122.39, 37.69, 11.0]],
            },
        );
        write_artifact(&classifiers_path, &classifiers).unwrap();

        let store = ModelStore::load(&clusters_path, &classifiers_path).unwrap();
        assert_eq!(store.stat_count(), 1);
        assert_eq!(store.classifier_count(), 1);
    }

    #[test]
    fn test_load_missing_classifiers_is_fatal() {
        let temp = TempDir::new().unwrap();
        let clusters_path = temp.path().join("clusters.json");
        write_artifact(&clusters_path, &ClusterArtifact::new()).unwrap();

        let result = ModelStore::load(&clusters_path, temp.path().join("missing.json"));
        assert!(matches!(result, Err(ModelError::ReadFailed { .. })));
    }

    #[test]
    fn test_store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModelStore>();
    }
}
