//! Infrastructure services for batchbuild.
//!
//! This module contains:
//! - discovery: Enumerating build units under a root
//! - process: Running the external build tool
//! - artifacts: Collecting build outputs

pub mod artifacts;
pub mod discovery;
pub mod process;
#[cfg(test)]
mod recording;

pub use process::{BuildRunner, SystemRunner};

#[cfg(test)]
pub use recording::RecordingRunner;
