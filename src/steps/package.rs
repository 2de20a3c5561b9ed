//! Package steps backed by aptkit.

use anyhow::{Context, Result};
use aptkit::{AptBackend, Frontend, Package};
use provision::{Host, Step, StepOutcome, StepState};

/// Refresh the apt package index. Always runs; failure is fatal because the
/// rest of the pipeline installs against this index.
#[derive(Debug)]
pub struct IndexRefresh;

impl Step for IndexRefresh {
    fn id(&self) -> String {
        "apt:update".to_string()
    }

    fn description(&self) -> String {
        "Refresh apt package index".to_string()
    }

    fn apply(&self, host: &dyn Host) -> Result<StepOutcome> {
        AptBackend::new(host, Frontend::AptGet)
            .update()
            .context("apt index refresh failed")?;
        Ok(StepOutcome::Changed)
    }
}

/// Upgrade all installed packages.
#[derive(Debug)]
pub struct SystemUpgrade;

impl Step for SystemUpgrade {
    fn id(&self) -> String {
        "apt:upgrade".to_string()
    }

    fn description(&self) -> String {
        "Upgrade installed packages".to_string()
    }

    fn apply(&self, host: &dyn Host) -> Result<StepOutcome> {
        AptBackend::new(host, Frontend::AptGet)
            .upgrade()
            .context("apt upgrade failed")?;
        Ok(StepOutcome::Changed)
    }
}

/// Converge one package to "installed".
#[derive(Debug)]
pub struct InstallPackage {
    package: Package,
    frontend: Frontend,
}

impl InstallPackage {
    /// A .deb installed through the given front-end.
    pub fn deb(name: &str, frontend: Frontend) -> Self {
        Self {
            package: Package::deb(name),
            frontend,
        }
    }

    /// A classic-confinement snap.
    pub fn snap_classic(name: &str) -> Self {
        Self {
            package: Package::snap_classic(name),
            frontend: Frontend::AptGet,
        }
    }
}

impl Step for InstallPackage {
    fn id(&self) -> String {
        format!("pkg:{}", self.package)
    }

    fn description(&self) -> String {
        format!("Install {}", self.package)
    }

    fn current_state(&self, host: &dyn Host) -> Result<StepState> {
        let installed = AptBackend::new(host, self.frontend).is_installed(&self.package)?;
        Ok(if installed {
            StepState::Satisfied
        } else {
            StepState::Missing
        })
    }

    fn apply(&self, host: &dyn Host) -> Result<StepOutcome> {
        let backend = AptBackend::new(host, self.frontend);

        if backend.is_installed(&self.package)? {
            return Ok(StepOutcome::AlreadyDone);
        }

        backend
            .install(&self.package)
            .with_context(|| format!("failed to install {}", self.package))?;
        Ok(StepOutcome::Changed)
    }
}
