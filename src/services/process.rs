//! Process execution service for running the external build tool.
//!
//! Builds run one at a time with inherited standard streams; the caller
//! blocks until the child exits.

use crate::domain::{BuildInvocation, BuildStatus};
use crate::error::{ProcessError, ProcessResult};
use std::process::{Command, Stdio};

/// Runs a single build invocation to completion
pub trait BuildRunner {
    /// Launch the invocation and wait for it to exit
    fn run(&self, invocation: &BuildInvocation) -> ProcessResult<BuildStatus>;
}

/// Runner that spawns real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner
    pub fn new() -> Self {
        Self
    }
}

impl BuildRunner for SystemRunner {
    fn run(&self, invocation: &BuildInvocation) -> ProcessResult<BuildStatus> {
        tracing::debug!(
            "Running `{}` in {}",
            invocation.display_command(),
            invocation.working_dir.display()
        );

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: invocation.program.clone(),
                dir: invocation.working_dir.clone(),
                source,
            })?;

        let status = child.wait().map_err(|source| ProcessError::Wait {
            program: invocation.program.clone(),
            source,
        })?;

        Ok(BuildStatus::from(status))
    }
}
