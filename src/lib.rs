//! batchbuild: batch driver for building many independent directories
//!
//! Runs an external build tool once per subdirectory of a root, either
//! collecting one artifact per project or just building every directory
//! that carries a manifest.

pub mod config;
pub mod domain;
pub mod drivers;
pub mod error;
pub mod report;
pub mod services;

pub use config::BatchConfig;
pub use drivers::{compile_programs, compile_projects};
pub use error::{AppError, Result};
