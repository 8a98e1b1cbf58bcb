//! Execution of a single step through the shell.

use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use tokio::process::Command;
use tracing::debug;

use crate::error::StepFailure;
use crate::model::Step;

/// Result of a step that ran to completion.
#[derive(Debug, Clone, Copy)]
pub struct StepOutcome {
    /// Exit status reported by the shell.
    pub status: ExitStatus,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl StepOutcome {
    /// Whether the command exited with status 0.
    pub fn passed(&self) -> bool {
        self.status.success()
    }
}

/// Runs step commands as `<shell> -c <command>`.
///
/// The child shares this process' stdin, stdout and stderr, so its output
/// interleaves live with the progress view.
#[derive(Debug, Clone)]
pub struct StepRunner {
    shell: String,
}

impl StepRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Run `step` and wait for it. Only a failure to start is an error here;
    /// a non-zero exit is reported through the outcome.
    pub async fn execute(&self, step: &Step) -> Result<StepOutcome, StepFailure> {
        let start = Instant::now();

        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(&step.command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(command = %step.command, %status, duration_ms, "Step finished");

        Ok(StepOutcome {
            status,
            duration_ms,
        })
    }

    /// Like [`StepRunner::execute`], but a non-zero exit is also a failure.
    pub async fn run(&self, step: &Step) -> Result<StepOutcome, StepFailure> {
        let outcome = self.execute(step).await?;
        if outcome.passed() {
            Ok(outcome)
        } else {
            Err(StepFailure::Exit(outcome.status))
        }
    }
}

impl Default for StepRunner {
    fn default() -> Self {
        Self::new("sh")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_simple_command() {
        let runner = StepRunner::default();
        let outcome = runner
            .execute(&Step::new("noop", "true"))
            .await
            .expect("execute failed");
        assert!(outcome.passed());
        assert_eq!(outcome.status.code(), Some(0));
    }

    #[tokio::test]
    async fn test_execute_failing_command() {
        let runner = StepRunner::default();
        let outcome = runner
            .execute(&Step::new("fail", "exit 3"))
            .await
            .expect("execute failed");
        assert!(!outcome.passed());
        assert_eq!(outcome.status.code(), Some(3));

        let err = runner.run(&Step::new("fail", "false")).await.unwrap_err();
        assert!(matches!(err, StepFailure::Exit(_)));
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let runner = StepRunner::new("/nonexistent-shell-that-does-not-exist");
        let err = runner.run(&Step::new("x", "true")).await.unwrap_err();
        assert!(matches!(err, StepFailure::Spawn(_)));
    }

    #[tokio::test]
    async fn test_command_runs_through_shell() {
        let dir = tempfile::tempdir().expect("tempdir");
        let marker = dir.path().join("marker");
        let step = Step::new(
            "touch",
            format!("echo hi > '{}' && test -s '{}'", marker.display(), marker.display()),
        );
        let outcome = StepRunner::default().run(&step).await.expect("run failed");
        assert!(outcome.passed());
        assert!(marker.exists());
    }
}
