//! Remote installer script step (fetch and execute, unattended).

use anyhow::{Context, Result, bail};
use provision::{Host, Step, StepOutcome, StepState};
use std::path::PathBuf;

/// Download an installer script and run it once, guarded by the directory the
/// installer creates.
#[derive(Debug)]
pub struct RemoteScript {
    name: &'static str,
    url: String,
    guard: PathBuf,
    args: Vec<String>,
}

impl RemoteScript {
    pub fn new(
        name: &'static str,
        url: impl Into<String>,
        guard: impl Into<PathBuf>,
        args: &[&str],
    ) -> Self {
        Self {
            name,
            url: url.into(),
            guard: guard.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

impl Step for RemoteScript {
    fn id(&self) -> String {
        format!("installer:{}", self.name)
    }

    fn description(&self) -> String {
        format!("Run the {} installer", self.name)
    }

    fn current_state(&self, host: &dyn Host) -> Result<StepState> {
        Ok(if host.path_exists(&self.guard) {
            StepState::Satisfied
        } else {
            StepState::Missing
        })
    }

    fn apply(&self, host: &dyn Host) -> Result<StepOutcome> {
        if host.path_exists(&self.guard) {
            return Ok(StepOutcome::AlreadyDone);
        }

        let script = host
            .home_dir()?
            .join(".cache")
            .join("bedrock")
            .join(format!("{}-install.sh", self.name));

        let bytes = host
            .download(&self.url)
            .with_context(|| format!("failed to fetch the {} installer", self.name))?;
        host.write_file(&script, &bytes)?;

        let script_path = script.to_string_lossy().to_string();
        let mut args: Vec<&str> = vec![&script_path];
        args.extend(self.args.iter().map(String::as_str));

        let out = host.run("sh", &args);

        // The downloaded script is a temporary artifact either way.
        host.remove_file(&script)?;

        let out = out?;
        if !out.success {
            bail!("{} installer failed: {}", self.name, out.stderr_str());
        }

        Ok(StepOutcome::Changed)
    }
}
