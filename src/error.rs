//! Unified error types for batchbuild.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Errors while enumerating build units under a root directory
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// External build process errors
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to spawn `{program}` in {dir}")]
    Spawn {
        program: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for `{program}`")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Artifact collection errors
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Build artifact not found: {0}")]
    Missing(PathBuf),

    #[error("Failed to copy {from} to {to}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render an error followed by its sources, separated by `: `
pub fn display_chain(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for discovery operations
pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;

/// Result type alias for process operations
pub type ProcessResult<T> = std::result::Result<T, ProcessError>;

/// Result type alias for artifact operations
pub type ArtifactResult<T> = std::result::Result<T, ArtifactError>;
