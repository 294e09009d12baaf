//! Collection of build artifacts into the output directory.

use crate::error::{ArtifactError, ArtifactResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Location of a unit's artifact: `target_dir/target/profile/name`
pub fn artifact_path(target_dir: &Path, target: &str, profile: &str, name: &str) -> PathBuf {
    target_dir.join(target).join(profile).join(name)
}

/// Copy `source` to `output_dir/name`, overwriting any previous copy
///
/// Creates `output_dir` when it does not exist yet. Returns the destination.
pub fn collect(source: &Path, output_dir: &Path, name: &str) -> ArtifactResult<PathBuf> {
    if !source.is_file() {
        return Err(ArtifactError::Missing(source.to_path_buf()));
    }

    fs::create_dir_all(output_dir).map_err(|source| ArtifactError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let destination = output_dir.join(name);
    match fs::copy(source, &destination) {
        Ok(bytes) => {
            tracing::debug!("Copied {} bytes to {}", bytes, destination.display());
            Ok(destination)
        }
        // Removed between the check and the copy
        Err(e) if e.kind() == ErrorKind::NotFound && !source.exists() => {
            Err(ArtifactError::Missing(source.to_path_buf()))
        }
        Err(e) => Err(ArtifactError::Copy {
            from: source.to_path_buf(),
            to: destination,
            source: e,
        }),
    }
}
