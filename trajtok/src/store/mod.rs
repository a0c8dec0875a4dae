//! Tokenized trajectory store.
//!
//! A store is a directory holding tokenized datasets grouped by the operation
//! they were produced for:
//!
//! ```text
//! <root>/
//!   pretraining/
//!     3fa9c1d2e0.bin.gz            gzip'd bincode Vec<Vec<Token>>
//!     3fa9c1d2e0_metadata.txt      key: value summary
//!   testing/
//!     ...
//! ```
//!
//! Dataset names are the first 10 hex digits of a SHA-256 over the encoded
//! dataset and the save time.

mod metadata;

pub use metadata::{load_metadata, parse_metadata, DatasetMetadata};

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use semver::Version;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use crate::grid::Token;

/// Extension of dataset files.
const DATASET_EXTENSION: &str = ".bin.gz";

/// Suffix of metadata sidecar files.
const METADATA_SUFFIX: &str = "_metadata.txt";

/// Hex digits in a dataset name.
const NAME_LENGTH: usize = 10;

/// Date format for `date_of_data_storage`.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Current on-disk format version.
pub const FORMAT_VERSION: Version = Version::new(1, 0, 0);

/// Errors that can occur in the trajectory store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDirectoryFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode dataset {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: bincode::Error,
    },

    #[error("Failed to decode dataset {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: bincode::Error,
    },

    #[error("Malformed metadata in {} at line {line}: '{content}'", path.display())]
    MalformedMetadata {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("Metadata {} is missing '{key}'", path.display())]
    MissingMetadataKey { path: PathBuf, key: String },

    #[error("Metadata {} has invalid {key}: '{value}'", path.display())]
    InvalidMetadataValue {
        path: PathBuf,
        key: String,
        value: String,
    },

    #[error("Not a dataset file: {}", .0.display())]
    NotADataset(PathBuf),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// What a stored dataset is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Pretraining,
    Finetuning,
    Testing,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::Pretraining,
        Operation::Finetuning,
        Operation::Testing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Pretraining => "pretraining",
            Operation::Finetuning => "finetuning",
            Operation::Testing => "testing",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretraining" => Ok(Operation::Pretraining),
            "finetuning" => Ok(Operation::Finetuning),
            "testing" => Ok(Operation::Testing),
            other => Err(format!("unknown operation '{}'", other)),
        }
    }
}

/// Paths of a freshly saved dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDataset {
    pub name: String,
    pub data_path: PathBuf,
    pub metadata_path: PathBuf,
}

/// Directory-backed store of tokenized datasets.
#[derive(Debug, Clone)]
pub struct TrajectoryStore {
    root: PathBuf,
}

impl TrajectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding datasets for `operation`.
    pub fn operation_dir(&self, operation: Operation) -> PathBuf {
        self.root.join(operation.as_str())
    }

    /// Save a tokenized dataset and its metadata.
    pub fn save(&self, dataset: &[Vec<Token>], operation: Operation) -> StoreResult<SavedDataset> {
        let dir = self.operation_dir(operation);
        fs::create_dir_all(&dir).map_err(|e| StoreError::CreateDirectoryFailed {
            path: dir.clone(),
            source: e,
        })?;

        let now = Local::now();
        let encoded = bincode::serialize(dataset).map_err(|e| StoreError::Encode {
            path: dir.clone(),
            source: e,
        })?;
        let name = dataset_name(&encoded, &now.to_rfc3339());

        let data_path = dir.join(format!("{}{}", name, DATASET_EXTENSION));
        write_compressed(&data_path, &encoded)?;

        let metadata = DatasetMetadata {
            total_number_of_trajectories: dataset.len(),
            total_number_of_tokens: dataset.iter().map(Vec::len).sum(),
            date_of_data_storage: now.format(DATE_FORMAT).to_string(),
            type_of_data: operation,
            format_version: FORMAT_VERSION,
        };
        let metadata_path = dir.join(format!("{}{}", name, METADATA_SUFFIX));
        fs::write(&metadata_path, metadata.to_text()).map_err(|e| StoreError::WriteFailed {
            path: metadata_path.clone(),
            source: e,
        })?;

        info!(
            path = %data_path.display(),
            trajectories = metadata.total_number_of_trajectories,
            tokens = metadata.total_number_of_tokens,
            "Saved tokenized trajectories with metadata"
        );

        Ok(SavedDataset {
            name,
            data_path,
            metadata_path,
        })
    }

    /// Load a dataset file written by [`save`](Self::save).
    pub fn load_tokenized(path: impl AsRef<Path>) -> StoreResult<Vec<Vec<Token>>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| StoreError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let decoder = GzDecoder::new(BufReader::new(file));
        bincode::deserialize_from(decoder).map_err(|e| StoreError::Decode {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Dataset files for `operation`, sorted by path.
    pub fn list(&self, operation: Operation) -> Vec<PathBuf> {
        let dir = self.operation_dir(operation);
        let pattern = format!(
            "{}/*{}",
            glob::Pattern::escape(&dir.to_string_lossy()),
            DATASET_EXTENSION
        );

        let entries = match glob::glob(&pattern) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Invalid dataset listing pattern");
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(
                        path = %e.path().display(),
                        error = %e.error(),
                        "Skipping unreadable dataset entry"
                    );
                    None
                }
            })
            .collect();
        paths.sort();
        paths
    }

    /// Metadata sidecar path for a dataset file.
    pub fn metadata_path_for(data_path: impl AsRef<Path>) -> StoreResult<PathBuf> {
        let data_path = data_path.as_ref();
        let name = data_path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(DATASET_EXTENSION))
            .ok_or_else(|| StoreError::NotADataset(data_path.to_path_buf()))?;

        Ok(data_path.with_file_name(format!("{}{}", name, METADATA_SUFFIX)))
    }
}

fn dataset_name(encoded: &[u8], timestamp: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(encoded);
    hasher.update(timestamp.as_bytes());
    let digest = hasher.finalize();

    digest
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
        .chars()
        .take(NAME_LENGTH)
        .collect()
}

fn write_compressed(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let write_failed = |e| StoreError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(write_failed)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    encoder.write_all(bytes).map_err(write_failed)?;
    encoder.finish().map_err(write_failed)?.flush().map_err(write_failed)
}
