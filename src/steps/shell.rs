//! Login-shell change plus small informational steps.

use anyhow::{Result, anyhow, bail};
use provision::{Host, Step, StepOutcome};

use crate::ui;

/// Make a shell the account's login shell via `chsh`. A single global
/// mutation; safe to repeat.
#[derive(Debug)]
pub struct LoginShell {
    shell: String,
}

impl LoginShell {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Step for LoginShell {
    fn id(&self) -> String {
        format!("login-shell:{}", self.shell)
    }

    fn description(&self) -> String {
        format!("Set {} as the login shell", self.shell)
    }

    fn apply(&self, host: &dyn Host) -> Result<StepOutcome> {
        let path = host
            .which(&self.shell)
            .ok_or_else(|| anyhow!("{} not found in PATH", self.shell))?;
        let path = path.to_string_lossy();

        let out = host.run("chsh", &["-s", &path])?;
        if !out.success {
            bail!("chsh -s {} failed: {}", path, out.stderr_str());
        }

        Ok(StepOutcome::Changed)
    }
}

/// Print a reminder about configuration bedrock deliberately does not touch.
#[derive(Debug)]
pub struct Reminder {
    id: &'static str,
    message: &'static str,
}

impl Reminder {
    pub fn new(id: &'static str, message: &'static str) -> Self {
        Self { id, message }
    }
}

impl Step for Reminder {
    fn id(&self) -> String {
        format!("note:{}", self.id)
    }

    fn description(&self) -> String {
        self.message.to_string()
    }

    fn apply(&self, _host: &dyn Host) -> Result<StepOutcome> {
        ui::info(self.message);
        Ok(StepOutcome::AlreadyDone)
    }
}

/// A stage slot that intentionally does nothing, with a visible reason.
#[derive(Debug)]
pub struct SkipNotice {
    id: &'static str,
    reason: String,
}

impl SkipNotice {
    pub fn new(id: &'static str, reason: impl Into<String>) -> Self {
        Self {
            id,
            reason: reason.into(),
        }
    }
}

impl Step for SkipNotice {
    fn id(&self) -> String {
        format!("skip:{}", self.id)
    }

    fn description(&self) -> String {
        self.reason.clone()
    }

    fn apply(&self, _host: &dyn Host) -> Result<StepOutcome> {
        Ok(StepOutcome::Skipped {
            reason: self.reason.clone(),
        })
    }
}
