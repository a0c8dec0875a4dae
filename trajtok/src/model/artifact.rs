//! On-disk shapes of the precomputed model artifacts.
//!
//! Two artifacts feed a [`ModelStore`](super::ModelStore):
//!
//! - **clusters**: token → `{ x, y, current_count }`
//! - **classifiers**: token → `{ centers, means }`, where `centers[i]` is the
//!   bearing centre of cluster `i` and `means[i]` is its `[x, y, count]`
//!
//! Files ending in `.bin` are read as bincode; everything else as JSON.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{ClassifierEntry, ClusterMean, ClusterStat, ModelError, ModelResult};
use crate::grid::Token;

/// Extension selecting the bincode encoding.
const BINCODE_EXTENSION: &str = "bin";

/// Serialized form of a direction classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    /// Bearing centre per cluster label.
    pub centers: Vec<f64>,
    /// `[x, y, count]` per cluster label.
    pub means: Vec<[f64; 3]>,
}

impl ClassifierArtifact {
    /// Check the artifact is usable and convert it into a live entry.
    pub(crate) fn into_entry(self, token: &Token) -> ModelResult<ClassifierEntry> {
        let invalid = |reason: String| ModelError::InvalidClassifier {
            token: token.to_string(),
            reason,
        };

        if self.centers.is_empty() {
            return Err(invalid("no cluster centers".to_string()));
        }
        if self.centers.len() != self.means.len() {
            return Err(invalid(format!(
                "{} centers but {} means",
                self.centers.len(),
                self.means.len()
            )));
        }
        if let Some(center) = self.centers.iter().find(|c| !c.is_finite()) {
            return Err(invalid(format!("non-finite center {}", center)));
        }
        if let Some(mean) = self.means.iter().find(|m| m.iter().any(|v| !v.is_finite())) {
            return Err(invalid(format!("non-finite mean {:?}", mean)));
        }

        let means = self
            .means
            .into_iter()
            .map(|[x, y, count]| ClusterMean::new(x, y, count))
            .collect();
        Ok(ClassifierEntry::nearest_centroid(self.centers, means))
    }
}

/// Cluster statistics artifact.
pub type ClusterArtifact = HashMap<Token, ClusterStat>;

/// Classifier artifact.
pub type ClassifiersArtifact = HashMap<Token, ClassifierArtifact>;

/// Read an artifact, picking the decoder from the file extension.
pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> ModelResult<T> {
    let file = File::open(path).map_err(|e| ModelError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    if is_bincode(path) {
        bincode::deserialize_from(reader).map_err(|e| ModelError::Bincode {
            path: path.to_path_buf(),
            source: e,
        })
    } else {
        serde_json::from_reader(reader).map_err(|e| ModelError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Write an artifact, picking the encoder from the file extension.
pub fn write_artifact<T: Serialize>(path: &Path, artifact: &T) -> ModelResult<()> {
    let file = File::create(path).map_err(|e| ModelError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    if is_bincode(path) {
        bincode::serialize_into(&mut writer, artifact).map_err(|e| ModelError::Bincode {
            path: path.to_path_buf(),
            source: e,
        })?;
    } else {
        serde_json::to_writer(&mut writer, artifact).map_err(|e| ModelError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    writer.flush().map_err(|e| ModelError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn is_bincode(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(BINCODE_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn token() -> Token {
        Token::from("8928308280fffff")
    }

    #[test]
    fn test_valid_classifier_converts() {
        let artifact = ClassifierArtifact {
            centers: vec![90.0, 270.0],
            means: vec![[1.0, 2.0, 5.0], [3.0, 4.0, 6.0]],
        };
        let entry = artifact.into_entry(&token()).unwrap();
        assert_eq!(entry.means().len(), 2);
        assert_eq!(entry.predictor().label_count(), 2);
    }

    #[test]
    fn test_classifier_without_centers_rejected() {
        let artifact = ClassifierArtifact {
            centers: vec![],
            means: vec![],
        };
        let err = artifact.into_entry(&token()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidClassifier { .. }));
        assert!(err.to_string().contains("no cluster centers"));
    }

    #[test]
    fn test_classifier_length_mismatch_rejected() {
        let artifact = ClassifierArtifact {
            centers: vec![10.0, 20.0],
            means: vec![[1.0, 2.0, 3.0]],
        };
        let err = artifact.into_entry(&token()).unwrap_err();
        assert!(err.to_string().contains("2 centers but 1 means"));
    }

    #[test]
    fn test_classifier_non_finite_rejected() {
        let artifact = ClassifierArtifact {
            centers: vec![f64::NAN],
            means: vec![[1.0, 2.0, 3.0]],
        };
        assert!(artifact.into_entry(&token()).is_err());

        let artifact = ClassifierArtifact {
            centers: vec![1.0],
            means: vec![[1.0, f64::INFINITY, 3.0]],
        };
        assert!(artifact.into_entry(&token()).is_err());
    }

    #[test]
    fn test_json_cluster_artifact_shape() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("clusters.json");
        std::fs::write(
            &path,
            r#"{"8928308280fffff": {"x": -122.41, "y": 37.77, "current_count": 42}}"#,
        )
        .unwrap();

        let clusters: ClusterArtifact = read_artifact(&path).unwrap();
        let stat = clusters.get("8928308280fffff").unwrap();
        assert_eq!(stat.current_count, 42);
        assert_eq!(stat.point().x, -122.41);
    }

    #[test]
    fn test_bincode_selected_by_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("classifiers.bin");

        let mut artifact = ClassifiersArtifact::new();
        artifact.insert(
            token(),
            ClassifierArtifact {
                centers: vec![12.5],
                means: vec![[1.0, 2.0, 3.0]],
            },
        );
        write_artifact(&path, &artifact).unwrap();

        // A bincode file is not JSON
        let raw = std::fs::read(&path).unwrap();
        assert!(serde_json::from_slice::<serde_json::Value>(&raw).is_err());

        let loaded: ClassifiersArtifact = read_artifact(&path).unwrap();
        assert_eq!(loaded, artifact);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_artifact::<ClusterArtifact>(Path::new("/nonexistent/clusters.json")).unwrap_err();
        assert!(matches!(err, ModelError::ReadFailed { .. }));
        assert!(err.to_string().contains("/nonexistent/clusters.json"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("clusters.json");
        std::fs::write(&path, r#"{"abc": {"x": 1.0}}"#).unwrap();

        let err = read_artifact::<ClusterArtifact>(&path).unwrap_err();
        assert!(matches!(err, ModelError::Json { .. }));
    }
}
