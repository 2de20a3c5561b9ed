//! File-producing steps: config dumps and startup-file hooks.

use anyhow::{Result, bail};
use provision::{Host, Step, StepOutcome, StepState};
use std::path::PathBuf;

/// Materialize a tool's default config by capturing a command's stdout.
///
/// Guarded by file existence: a config that is already there (possibly
/// hand-edited) is never overwritten.
#[derive(Debug)]
pub struct ConfigDump {
    cmd: String,
    args: Vec<String>,
    dest: PathBuf,
}

impl ConfigDump {
    pub fn new(cmd: impl Into<String>, args: &[&str], dest: impl Into<PathBuf>) -> Self {
        Self {
            cmd: cmd.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            dest: dest.into(),
        }
    }
}

impl Step for ConfigDump {
    fn id(&self) -> String {
        format!("config:{}", self.dest.display())
    }

    fn description(&self) -> String {
        format!("Write default config to {}", self.dest.display())
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

        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let out = host.run(&self.cmd, &args)?;
        if !out.success {
            bail!("{} failed: {}", self.cmd, out.stderr_str());
        }

        host.write_file(&self.dest, &out.stdout)?;
        Ok(StepOutcome::Changed)
    }
}

/// Register a line in a shell startup file.
///
/// Guarded by a line-presence check so repeated runs never stack duplicates.
#[derive(Debug)]
pub struct AppendLine {
    path: PathBuf,
    line: String,
}

impl AppendLine {
    pub fn new(path: impl Into<PathBuf>, line: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: line.into(),
        }
    }

    fn already_present(&self, host: &dyn Host) -> bool {
        host.path_exists(&self.path)
            && host
                .read_file(&self.path)
                .map(|c| c.lines().any(|l| l.trim() == self.line))
                .unwrap_or(false)
    }
}

impl Step for AppendLine {
    fn id(&self) -> String {
        format!("hook:{}", self.path.display())
    }

    fn description(&self) -> String {
        format!("Add '{}' to {}", self.line, self.path.display())
    }

    fn current_state(&self, host: &dyn Host) -> Result<StepState> {
        Ok(if self.already_present(host) {
            StepState::Satisfied
        } else {
            StepState::Missing
        })
    }

    fn apply(&self, host: &dyn Host) -> Result<StepOutcome> {
        if self.already_present(host) {
            return Ok(StepOutcome::AlreadyDone);
        }

        host.append_file(&self.path, &format!("{}\n", self.line))?;
        Ok(StepOutcome::Changed)
    }
}
