//! Build runner double that records invocations instead of spawning.

use super::BuildRunner;
use crate::domain::{BuildInvocation, BuildStatus};
use crate::error::ProcessResult;
use std::sync::Mutex;

/// Runner that records invocations and replays scripted results
///
/// Each call pops the next scripted status (default: success) and then runs
/// the optional hook, which fakes build output on disk.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<BuildInvocation>>,
    script: Mutex<Vec<ProcessResult<BuildStatus>>>,
    hook: Option<Box<dyn Fn(&BuildInvocation) + Send + Sync>>,
}

impl RecordingRunner {
    /// Create a runner where every build succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` for every invocation before returning its status
    pub fn with_hook(mut self, hook: impl Fn(&BuildInvocation) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Queue results returned by successive calls
    pub fn with_results(self, results: Vec<ProcessResult<BuildStatus>>) -> Self {
        let mut script = results;
        script.reverse();
        *self.script.lock().unwrap_or_else(|e| e.into_inner()) = script;
        self
    }

    /// Invocations seen so far, in call order
    pub fn calls(&self) -> Vec<BuildInvocation> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl BuildRunner for RecordingRunner {
    fn run(&self, invocation: &BuildInvocation) -> ProcessResult<BuildStatus> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(invocation.clone());

        let result = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop()
            .unwrap_or(Ok(BuildStatus::Success));

        if let Some(hook) = &self.hook {
            hook(invocation);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_recording_runner_replays_script() {
        let runner = RecordingRunner::new()
            .with_results(vec![Ok(BuildStatus::Failed { exit_code: Some(2) })]);
        let inv = BuildInvocation::new("cargo", vec!["build".into()], PathBuf::from("."));

        assert_eq!(
            runner.run(&inv).unwrap(),
            BuildStatus::Failed { exit_code: Some(2) }
        );
        assert_eq!(runner.run(&inv).unwrap(), BuildStatus::Success);
        assert_eq!(runner.calls().len(), 2);
    }
}
