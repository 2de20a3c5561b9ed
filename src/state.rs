//! Run-state tracking.
//!
//! Records when the pipeline last completed and which stages it ran, under
//! `~/.local/state/bedrock/state.toml`. Purely informational - stage
//! idempotence comes from on-machine guards, never from this file.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::paths;

/// Persistent record of bootstrap runs.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RunState {
    /// When the pipeline last ran to completion.
    pub last_run: Option<DateTime<Utc>>,

    /// Stages completed during the last successful run.
    #[serde(default)]
    pub stages_completed: Vec<String>,
}

impl RunState {
    /// Load state from the default state directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::state_dir()?)
    }

    /// Load state from a specific directory.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join("state.toml");

        if !path.exists() {
            log::debug!("State file does not exist, using default state");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))
    }

    /// Save state to the default state directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&paths::state_dir()?)
    }

    /// Save state to a specific directory.
    pub fn save_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create state dir: {}", dir.display()))?;

        let path = dir.join("state.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize state")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))
    }

    /// Record a completed run.
    pub fn mark_run(&mut self, stages: &[&str]) {
        self.last_run = Some(Utc::now());
        self.stages_completed = stages.iter().map(|s| (*s).to_string()).collect();
    }
}
