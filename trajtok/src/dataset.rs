//! Raw trajectory input.
//!
//! Trajectories arrive as a CSV file with a `trajectory` column. Each cell is a
//! comma-separated list of `"lat lon"` pairs, e.g.:
//!
//! ```text
//! id,trajectory
//! 1,"37.7749 -122.4194,37.7750 -122.4195"
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::geo::Point;

/// Column holding the serialized trajectory.
pub const TRAJECTORY_COLUMN: &str = "trajectory";

/// Errors that can occur while reading raw trajectories.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The CSV file could not be read or parsed.
    #[error("Failed to read CSV {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    /// The CSV has no trajectory column.
    #[error("CSV {} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// A point is not two whitespace-separated numbers.
    #[error("Malformed point '{value}' in row {row}")]
    MalformedPoint { row: usize, value: String },
}

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Read every trajectory from a CSV file.
///
/// Rows are numbered from 1 (the first data row) in error messages. Empty
/// trajectory cells produce empty trajectories.
pub fn read_trajectories_csv(path: impl AsRef<Path>) -> DatasetResult<Vec<Vec<Point>>> {
    let path = path.as_ref();
    let csv_error = |source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let column = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .position(|h| h.trim() == TRAJECTORY_COLUMN)
        .ok_or_else(|| DatasetError::MissingColumn {
            path: path.to_path_buf(),
            column: TRAJECTORY_COLUMN.to_string(),
        })?;

    let mut trajectories = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let cell = record.get(column).unwrap_or_default();
        trajectories.push(parse_trajectory(cell, index + 1)?);
    }

    debug!(path = %path.display(), count = trajectories.len(), "Read trajectories");
    Ok(trajectories)
}

/// Parse one `"lat lon,lat lon,..."` cell.
pub fn parse_trajectory(cell: &str, row: usize) -> DatasetResult<Vec<Point>> {
    if cell.trim().is_empty() {
        return Ok(Vec::new());
    }

    cell.split(',')
        .map(|pair| parse_point(pair, row))
        .collect()
}

fn parse_point(pair: &str, row: usize) -> DatasetResult<Point> {
    let malformed = || DatasetError::MalformedPoint {
        row,
        value: pair.trim().to_string(),
    };

    let mut parts = pair.split_whitespace();
    let lat = parts.next().and_then(|v| v.parse::<f64>().ok());
    let lon = parts.next().and_then(|v| v.parse::<f64>().ok());

    match (lat, lon, parts.next()) {
        (Some(lat), Some(lon), None) => Ok(Point::from_lat_lon(lat, lon)),
        _ => Err(malformed()),
    }
}

/// Render points in the same `"lat lon,lat lon"` form the reader accepts.
pub fn format_trajectory(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{} {}", p.lat(), p.lon()))
        .collect::<Vec<_>>()
        .join(",")
}
