//! The fail-fast sequential pipeline.
//!
//! Stages run in insertion order, steps within a stage in insertion order,
//! everything on one thread. The first fatal step error aborts the whole run
//! with the failing stage's name attached; tolerated failures are reported
//! and skipped. This contract is deliberate: the tool is meant to be re-run
//! whole, so partial completion must be visible, not papered over.

use anyhow::{Context, Result};

use crate::host::Host;
use crate::step::{FailurePolicy, Step};
use crate::types::{RunOptions, RunSummary, StepOutcome, StepState};

/// A named group of steps.
pub struct Stage {
    /// Short machine name ("core-utils").
    pub name: &'static str,
    /// One-line description shown in the stage banner.
    pub description: &'static str,
    /// Steps, applied in order.
    pub steps: Vec<Box<dyn Step>>,
}

/// Receives progress events during a run. Keeps the engine free of any
/// terminal/UI dependency.
pub trait ProgressCallback {
    /// A stage is about to run.
    fn on_stage_start(&mut self, name: &str, description: &str);

    /// A step finished with an outcome.
    fn on_step_done(&mut self, id: &str, outcome: &StepOutcome);

    /// A step failed but its policy tolerates the failure.
    fn on_step_tolerated(&mut self, id: &str, error: &anyhow::Error);
}

/// No-op progress callback.
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_stage_start(&mut self, _name: &str, _description: &str) {}
    fn on_step_done(&mut self, _id: &str, _outcome: &StepOutcome) {}
    fn on_step_tolerated(&mut self, _id: &str, _error: &anyhow::Error) {}
}

/// An ordered list of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn stage(
        &mut self,
        name: &'static str,
        description: &'static str,
        steps: Vec<Box<dyn Step>>,
    ) {
        self.stages.push(Stage {
            name,
            description,
            steps,
        });
    }

    /// Append a prebuilt stage.
    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Whether any stage has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in run order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name).collect()
    }

    /// Run all stages in order against `host`.
    ///
    /// Aborts on the first error from a step whose policy is
    /// [`FailurePolicy::Fatal`]; the returned error names the stage. In dry
    /// runs each step's state is detected and reported but nothing is applied.
    pub fn run(
        &self,
        host: &dyn Host,
        opts: &RunOptions,
        progress: &mut dyn ProgressCallback,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for stage in &self.stages {
            progress.on_stage_start(stage.name, stage.description);

            for step in &stage.steps {
                let outcome = if opts.dry_run {
                    match step.current_state(host)? {
                        StepState::Satisfied => StepOutcome::AlreadyDone,
                        StepState::Missing | StepState::Unknown => StepOutcome::Skipped {
                            reason: "dry run".to_string(),
                        },
                    }
                } else {
                    match step.apply(host) {
                        Ok(outcome) => outcome,
                        Err(e) => match step.failure_policy() {
                            FailurePolicy::Tolerate => {
                                progress.on_step_tolerated(&step.id(), &e);
                                summary.tolerated += 1;
                                continue;
                            }
                            FailurePolicy::Fatal => {
                                return Err(e).with_context(|| {
                                    format!("stage '{}' failed at {}", stage.name, step.id())
                                });
                            }
                        },
                    }
                };

                progress.on_step_done(&step.id(), &outcome);
                summary.record_outcome(&outcome);
            }

            summary.stages_run += 1;
        }

        Ok(summary)
    }
}
