//! Core types shared by steps, the pipeline, and host backends.

/// Captured output of an external command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Whether the command exited with status zero.
    pub success: bool,
    /// Raw standard output.
    pub stdout: Vec<u8>,
    /// Raw standard error.
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Build a successful output with the given stdout text.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into().into_bytes(),
            stderr: Vec::new(),
        }
    }

    /// Build a failed output with the given stderr text.
    #[must_use]
    pub fn err(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: Vec::new(),
            stderr: stderr.into().into_bytes(),
        }
    }

    /// Stdout as lossy UTF-8, trailing whitespace trimmed.
    #[must_use]
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim_end().to_string()
    }

    /// Stderr as lossy UTF-8, trailing whitespace trimmed.
    #[must_use]
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim_end().to_string()
    }
}

/// Current state of a step's target, as detected by its guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepState {
    /// The target already matches the desired state.
    Satisfied,
    /// The target is absent or incomplete.
    Missing,
    /// The step has no cheap way to detect state.
    Unknown,
}

/// Result of applying a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step mutated machine state.
    Changed,
    /// The idempotence guard fired; nothing to do.
    AlreadyDone,
    /// The step chose not to run (expected branch, not a failure).
    Skipped {
        /// Why the step did not run.
        reason: String,
    },
}

/// Options for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Detect state and report, but mutate nothing.
    pub dry_run: bool,
    /// Emit extra per-step detail.
    pub verbose: bool,
}

/// Counts accumulated over a pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps that mutated machine state.
    pub changed: usize,
    /// Steps whose guard found nothing to do.
    pub already_done: usize,
    /// Steps that skipped themselves (expected branches, dry runs).
    pub skipped: usize,
    /// Steps that failed but were tolerated by policy.
    pub tolerated: usize,
    /// Stages that ran to completion.
    pub stages_run: usize,
}

impl RunSummary {
    /// Total steps that executed (in any outcome).
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.changed + self.already_done + self.skipped + self.tolerated
    }

    pub(crate) fn record_outcome(&mut self, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Changed => self.changed += 1,
            StepOutcome::AlreadyDone => self.already_done += 1,
            StepOutcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_output_strings() {
        let out = CommandOutput::ok("hello\n");
        assert!(out.success);
        assert_eq!(out.stdout_str(), "hello");
        assert_eq!(out.stderr_str(), "");

        let err = CommandOutput::err("boom\n");
        assert!(!err.success);
        assert_eq!(err.stderr_str(), "boom");
    }

    #[test]
    fn summary_records_outcomes() {
        let mut summary = RunSummary::default();
        summary.record_outcome(&StepOutcome::Changed);
        summary.record_outcome(&StepOutcome::AlreadyDone);
        summary.record_outcome(&StepOutcome::Skipped {
            reason: "n/a".into(),
        });
        assert_eq!(summary.changed, 1);
        assert_eq!(summary.already_done, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total_steps(), 3);
    }
}
