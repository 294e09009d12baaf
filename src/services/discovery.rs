//! Discovery of build units under a root directory.

use crate::domain::BuildUnit;
use crate::error::{DiscoveryError, DiscoveryResult};
use std::fs;
use std::path::Path;

/// List the immediate subdirectories of `root`, sorted by name
///
/// Regular files and other non-directories are skipped silently. Entries
/// whose names are not valid UTF-8 are skipped with a warning.
pub fn list_units(root: &Path) -> DiscoveryResult<Vec<BuildUnit>> {
    if !root.exists() {
        return Err(DiscoveryError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }

    let read_err = |source| DiscoveryError::Read {
        path: root.to_path_buf(),
        source,
    };

    let mut units = Vec::new();
    for entry in fs::read_dir(root).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();

        // Only process directories (follows symlinks)
        if !path.is_dir() {
            continue;
        }

        match BuildUnit::from_path(path) {
            Some(unit) => units.push(unit),
            None => {
                tracing::warn!("Skipping directory with non UTF-8 name: {:?}", entry.file_name());
            }
        }
    }

    units.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(units)
}

/// List subdirectories of `root` that contain `manifest` at their top level
pub fn list_manifest_units(root: &Path, manifest: &str) -> DiscoveryResult<Vec<BuildUnit>> {
    let units = list_units(root)?
        .into_iter()
        .filter(|unit| {
            let keep = unit.has_manifest(manifest);
            if !keep {
                tracing::debug!("Skipping {}: no {}", unit.name, manifest);
            }
            keep
        })
        .collect();
    Ok(units)
}
