//! Build unit entity.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One immediate subdirectory of a root, built on its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildUnit {
    /// Directory name; also names the collected artifact
    pub name: String,
    /// Full path to the directory
    pub path: PathBuf,
}

impl BuildUnit {
    /// Create a unit from a directory path
    ///
    /// Returns `None` when the path has no UTF-8 final component.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self { name, path })
    }

    /// Path of a file directly inside the unit directory
    pub fn file(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }

    /// Check whether the unit carries `manifest` at its top level
    pub fn has_manifest(&self, manifest: &str) -> bool {
        self.file(manifest).is_file()
    }
}

impl std::fmt::Display for BuildUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_path_uses_last_component() {
        let unit = BuildUnit::from_path(PathBuf::from("/tmp/projects/alpha")).unwrap();
        assert_eq!(unit.name, "alpha");
        assert_eq!(
            unit.file("program_link.ld"),
            PathBuf::from("/tmp/projects/alpha/program_link.ld")
        );
    }

    #[test]
    fn test_from_path_rejects_root() {
        assert!(BuildUnit::from_path(PathBuf::from("/")).is_none());
    }

    #[test]
    fn test_has_manifest_requires_file() {
        let temp = TempDir::new().unwrap();
        let unit = BuildUnit::from_path(temp.path().join("tool")).unwrap();
        std::fs::create_dir_all(unit.file("Cargo.toml")).unwrap();

        // A directory named like the manifest does not count
        assert!(!unit.has_manifest("Cargo.toml"));

        std::fs::write(unit.file("Other.toml"), "").unwrap();
        assert!(unit.has_manifest("Other.toml"));
    }
}
