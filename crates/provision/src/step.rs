//! The step trait.
//!
//! A step is one idempotent unit of provisioning: it can report the current
//! state of its target (the idempotence guard) and converge it. Guards live
//! inside `apply` as well, so a step is safe to apply unconditionally.

use anyhow::Result;
use std::fmt;

use crate::host::Host;
use crate::types::{StepOutcome, StepState};

/// What the pipeline does when a step returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the entire run (the default).
    #[default]
    Fatal,
    /// Warn and continue with the next step.
    Tolerate,
}

/// One idempotent unit within a stage.
pub trait Step: Send + Sync + fmt::Debug {
    /// Stable identifier (e.g. "pkg:ripgrep", "symlink:~/.local/bin/fd").
    fn id(&self) -> String;

    /// Human-readable description of the desired state.
    fn description(&self) -> String;

    /// Detect the current state of the target. Used by dry runs.
    fn current_state(&self, host: &dyn Host) -> Result<StepState> {
        let _ = host;
        Ok(StepState::Unknown)
    }

    /// Converge the target to the desired state.
    fn apply(&self, host: &dyn Host) -> Result<StepOutcome>;

    /// Whether a failure of this step aborts the run.
    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Fatal
    }
}
