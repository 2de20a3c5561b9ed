//! Git clone step.
//!
//! Existence of the destination is the only idempotence guard: clone once,
//! never pull. Updating an existing clone is the owner's business, not the
//! bootstrap's.

use anyhow::{Result, bail};
use provision::{FailurePolicy, Host, Step, StepOutcome, StepState};
use std::path::PathBuf;

/// Clone a repository to a fixed destination if it is not already there.
#[derive(Debug)]
pub struct GitClone {
    url: String,
    dest: PathBuf,
    policy: FailurePolicy,
}

impl GitClone {
    /// A clone whose failure aborts the run.
    pub fn new(url: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            policy: FailurePolicy::Fatal,
        }
    }

    /// A best-effort clone (optional enhancements); failure warns and the run
    /// continues.
    pub fn tolerated(url: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            policy: FailurePolicy::Tolerate,
        }
    }
}

impl Step for GitClone {
    fn id(&self) -> String {
        format!("clone:{}", self.dest.display())
    }

    fn description(&self) -> String {
        format!("Clone {} -> {}", self.url, self.dest.display())
    }

    fn current_state(&self, host: &dyn Host) -> Result<StepState> {
        Ok(if host.path_exists(&self.dest) {
            StepState::Satisfied
        } else {
            StepState::Missing
        })
    }

    fn apply(&self, host: &dyn Host) -> Result<StepOutcome> {
        if host.path_exists(&self.dest) {
            return Ok(StepOutcome::AlreadyDone);
        }

        let dest = self.dest.to_string_lossy();
        let out = host.run("git", &["clone", &self.url, &dest])?;
        if !out.success {
            bail!("git clone {} failed: {}", self.url, out.stderr_str());
        }

        Ok(StepOutcome::Changed)
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }
}
