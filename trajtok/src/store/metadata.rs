//! Dataset metadata files.
//!
//! Each stored dataset has a sidecar text file of `key: value` lines:
//!
//! ```text
//! total_number_of_trajectories: 2
//! total_number_of_tokens: 17
//! date_of_data_storage: 2026-10-18 14:05
//! type_of_data: pretraining
//! format_version: 1.0.0
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use semver::Version;

use super::{Operation, StoreError, StoreResult};

/// Separator between key and value.
const SEPARATOR: &str = ": ";

/// Parse `key: value` lines into a map.
///
/// Lines are trimmed and split on the first `": "`, so values may contain the
/// separator. Blank lines are ignored. On failure returns the 1-based line
/// number and the offending line.
pub fn parse_metadata(content: &str) -> Result<BTreeMap<String, String>, (usize, String)> {
    let mut entries = BTreeMap::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once(SEPARATOR)
            .ok_or_else(|| (index + 1, line.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
    }

    Ok(entries)
}

/// Read a metadata file into a key-value map.
pub fn load_metadata(path: impl AsRef<Path>) -> StoreResult<BTreeMap<String, String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| StoreError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_metadata(&content).map_err(|(line, content)| StoreError::MalformedMetadata {
        path: path.to_path_buf(),
        line,
        content,
    })
}

/// Typed view of a dataset's metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMetadata {
    pub total_number_of_trajectories: usize,
    pub total_number_of_tokens: usize,
    /// Local time the dataset was saved, `%Y-%m-%d %H:%M`.
    pub date_of_data_storage: String,
    pub type_of_data: Operation,
    pub format_version: Version,
}

impl DatasetMetadata {
    /// Render as `key: value` lines.
    pub fn to_text(&self) -> String {
        self.entries()
            .iter()
            .map(|(key, value)| format!("{}{}{}\n", key, SEPARATOR, value))
            .collect()
    }

    /// Entries in file order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "total_number_of_trajectories",
                self.total_number_of_trajectories.to_string(),
            ),
            (
                "total_number_of_tokens",
                self.total_number_of_tokens.to_string(),
            ),
            ("date_of_data_storage", self.date_of_data_storage.clone()),
            ("type_of_data", self.type_of_data.to_string()),
            ("format_version", self.format_version.to_string()),
        ]
    }

    /// Build from a parsed map.
    ///
    /// `format_version` is optional for files written before it existed and
    /// defaults to 1.0.0.
    pub fn from_map(map: &BTreeMap<String, String>, path: &Path) -> StoreResult<Self> {
        let get = |key: &str| {
            map.get(key).ok_or_else(|| StoreError::MissingMetadataKey {
                path: path.to_path_buf(),
                key: key.to_string(),
            })
        };
        let invalid = |key: &str, value: &str| StoreError::InvalidMetadataValue {
            path: path.to_path_buf(),
            key: key.to_string(),
            value: value.to_string(),
        };

        let trajectories = get("total_number_of_trajectories")?;
        let tokens = get("total_number_of_tokens")?;
        let type_of_data = get("type_of_data")?;

        let format_version = match map.get("format_version") {
            Some(v) => Version::parse(v).map_err(|_| invalid("format_version", v.as_str()))?,
            None => Version::new(1, 0, 0),
        };

        Ok(Self {
            total_number_of_trajectories: trajectories
                .parse()
                .map_err(|_| invalid("total_number_of_trajectories", trajectories.as_str()))?,
            total_number_of_tokens: tokens
                .parse()
                .map_err(|_| invalid("total_number_of_tokens", tokens.as_str()))?,
            date_of_data_storage: get("date_of_data_storage")?.clone(),
            type_of_data: type_of_data
                .parse()
                .map_err(|_| invalid("type_of_data", type_of_data.as_str()))?,
            format_version,
        })
    }

    /// Read and validate a metadata file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        Self::from_map(&load_metadata(path)?, path)
    }
}
