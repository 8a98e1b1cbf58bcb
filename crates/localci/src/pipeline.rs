//! Sequential pipeline execution with live progress frames.

use std::io::Write;
use std::time::{Duration, Instant};

use colored::Colorize;
use tracing::{info, warn};

use crate::error::{StepExecutionError, StepFailure};
use crate::model::{Pipeline, SkipSet};
use crate::render;
use crate::runner::StepRunner;

/// Pause after each successful step so frame updates stay readable.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(500);

/// Knobs for a pipeline run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Shell used as `<shell> -c <command>`.
    pub shell: String,

    /// Pause after every successful step.
    pub step_delay: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
            step_delay: DEFAULT_STEP_DELAY,
        }
    }
}

/// Outcome of a run where every executed step passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Stages that executed.
    pub stages_run: usize,

    /// Stages left out because they were in the skip set.
    pub stages_skipped: usize,

    /// Steps that executed.
    pub steps_run: usize,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Drives a [`Pipeline`] step by step.
///
/// Frames and notices are written to `out`; child processes write straight to
/// the real standard streams.
pub struct Executor<W: Write> {
    runner: StepRunner,
    step_delay: Duration,
    out: W,
}

impl<W: Write> Executor<W> {
    pub fn new(options: RunOptions, out: W) -> Self {
        Self {
            runner: StepRunner::new(options.shell),
            step_delay: options.step_delay,
            out,
        }
    }

    /// Give back the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run every stage not in `skip`, stopping at the first failing step.
    pub async fn run(
        &mut self,
        pipeline: &Pipeline,
        skip: &SkipSet,
    ) -> Result<RunSummary, StepExecutionError> {
        let start = Instant::now();
        let mut summary = RunSummary::default();

        info!(stages = pipeline.stages.len(), "Starting pipeline");

        for (i, stage) in pipeline.stages.iter().enumerate() {
            if skip.contains(&stage.name) {
                info!(stage = %stage.name, "Skipping stage");
                summary.stages_skipped += 1;
                continue;
            }

            info!(stage = %stage.name, steps = stage.steps.len(), "Executing stage");
            summary.stages_run += 1;

            for (j, step) in stage.steps.iter().enumerate() {
                self.draw(pipeline, i, j, false, skip);
                self.emit(&format!("Running: {}\n", step.command));

                if let Err(source) = self.runner.run(step).await {
                    warn!(stage = %stage.name, step = %step.name, error = %source, "Step failed");
                    self.draw(pipeline, i, j, true, skip);
                    self.report_error(&stage.name, &step.name, &source);
                    return Err(StepExecutionError {
                        stage: stage.name.clone(),
                        step: step.name.clone(),
                        source,
                    });
                }
                summary.steps_run += 1;

                if !self.step_delay.is_zero() {
                    tokio::time::sleep(self.step_delay).await;
                }
            }
        }

        self.draw(pipeline, pipeline.stages.len(), 0, false, skip);

        summary.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            steps = summary.steps_run,
            skipped = summary.stages_skipped,
            duration_ms = summary.duration_ms,
            "Pipeline completed successfully"
        );
        Ok(summary)
    }

    fn draw(
        &mut self,
        pipeline: &Pipeline,
        stage: usize,
        step: usize,
        error_occurred: bool,
        skip: &SkipSet,
    ) {
        let frame = render::frame(pipeline, stage, step, error_occurred, skip);
        self.emit(&frame);
    }

    fn report_error(&mut self, stage: &str, step: &str, error: &StepFailure) {
        let line = format!(
            "{}: Error in stage '{}', step '{}': {}\n",
            "ERROR".red(),
            stage,
            step,
            error
        );
        self.emit(&line);
    }

    /// Write and flush so frames land before the next child starts writing.
    fn emit(&mut self, text: &str) {
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            warn!(error = %e, "Failed to write progress output");
        }
    }
}
