//! External build invocation and its exit status.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// A fully specified launch of the external build tool
///
/// Arguments are passed as a list and never go through a shell, so unit
/// names containing spaces or quotes need no escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    /// Program to execute
    pub program: String,
    /// Argument list
    pub args: Vec<String>,
    /// Environment overrides on top of the inherited environment
    ///
    /// Values are OS strings so paths survive without lossy conversion.
    pub env: Vec<(String, OsString)>,
    /// Working directory of the child
    pub working_dir: PathBuf,
}

impl BuildInvocation {
    /// Create an invocation with no extra environment
    pub fn new(program: impl Into<String>, args: Vec<String>, working_dir: PathBuf) -> Self {
        Self {
            program: program.into(),
            args,
            env: Vec::new(),
            working_dir,
        }
    }

    /// Add an environment override
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Append arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Look up an environment override by name
    pub fn env_var(&self, key: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    /// Render the command line for log messages
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Exit status of one external build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// Exited with status zero
    Success,
    /// Exited non-zero, or was terminated by a signal (no code)
    Failed { exit_code: Option<i32> },
}

impl BuildStatus {
    /// Check if the build succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<std::process::ExitStatus> for BuildStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            Self::Success
        } else {
            Self::Failed {
                exit_code: status.code(),
            }
        }
    }
}
