//! Inspect command - show a stored dataset's metadata.

use std::path::{Path, PathBuf};

use trajtok::store::{DatasetMetadata, TrajectoryStore, FORMAT_VERSION};

use crate::error::CliError;

/// Run the inspect command.
///
/// Accepts either the `_metadata.txt` sidecar or the `.bin.gz` data file it
/// describes.
pub fn run(path: PathBuf) -> Result<(), CliError> {
    let metadata_path = metadata_path(&path)?;
    let metadata = DatasetMetadata::load(&metadata_path)?;

    println!("Dataset: {}", metadata_path.display());
    println!();
    for (key, value) in metadata.entries() {
        println!("  {}: {}", key, value);
    }

    if metadata.format_version.major != FORMAT_VERSION.major {
        println!();
        println!(
            "Warning: format version {} is not compatible with this build ({})",
            metadata.format_version, FORMAT_VERSION
        );
    }

    Ok(())
}

fn metadata_path(path: &Path) -> Result<PathBuf, CliError> {
    if path.to_string_lossy().ends_with(".bin.gz") {
        Ok(TrajectoryStore::metadata_path_for(path)?)
    } else {
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_path_maps_to_sidecar() {
        let path = metadata_path(Path::new("/store/testing/ab12cd34ef.bin.gz")).unwrap();
        assert_eq!(path, PathBuf::from("/store/testing/ab12cd34ef_metadata.txt"));
    }

    #[test]
    fn test_metadata_path_passes_through() {
        let path = metadata_path(Path::new("/store/testing/ab12cd34ef_metadata.txt")).unwrap();
        assert_eq!(path, PathBuf::from("/store/testing/ab12cd34ef_metadata.txt"));
    }
}
