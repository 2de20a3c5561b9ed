//! Compatibility symlink step.
//!
//! Ubuntu packages fd as `fdfind`; the link makes the conventional name
//! resolve. Re-runs are expected, so an existing link is a no-op for this
//! step only, never an error.

use anyhow::{Result, anyhow};
use provision::{Host, Step, StepOutcome, StepState};
use std::path::PathBuf;

/// Symlink `link` to wherever `resolves` lives on the machine.
#[derive(Debug)]
pub struct CompatSymlink {
    link: PathBuf,
    resolves: String,
}

impl CompatSymlink {
    pub fn new(link: impl Into<PathBuf>, resolves: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            resolves: resolves.into(),
        }
    }
}

impl Step for CompatSymlink {
    fn id(&self) -> String {
        format!("symlink:{}", self.link.display())
    }

    fn description(&self) -> String {
        format!("Symlink {} -> {}", self.link.display(), self.resolves)
    }

    fn current_state(&self, host: &dyn Host) -> Result<StepState> {
        Ok(if host.path_exists(&self.link) {
            StepState::Satisfied
        } else {
            StepState::Missing
        })
    }

    fn apply(&self, host: &dyn Host) -> Result<StepOutcome> {
        if host.path_exists(&self.link) {
            return Ok(StepOutcome::AlreadyDone);
        }

        let source = host
            .which(&self.resolves)
            .ok_or_else(|| anyhow!("{} not found in PATH", self.resolves))?;

        host.symlink(&source, &self.link)?;
        Ok(StepOutcome::Changed)
    }
}
