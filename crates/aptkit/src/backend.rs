//! Package operations issued through a [`Host`].

use provision::Host;

use crate::error::{Error, Result};
use crate::types::{Frontend, Package, PackageKind};

/// Debian/Ubuntu package backend.
///
/// All commands run through the borrowed [`Host`], prefixed with `sudo` where
/// the underlying tool requires root, exactly as a hand-written bootstrap
/// script would issue them.
pub struct AptBackend<'h> {
    host: &'h dyn Host,
    frontend: Frontend,
}

impl<'h> AptBackend<'h> {
    /// Create a backend using the given front-end for .deb installs.
    #[must_use]
    pub fn new(host: &'h dyn Host, frontend: Frontend) -> Self {
        Self { host, frontend }
    }

    /// Refresh the package index (`sudo apt-get update`).
    pub fn update(&self) -> Result<()> {
        self.run_checked("sudo", &["apt-get", "update"], None)?;
        Ok(())
    }

    /// Upgrade all installed packages (`sudo apt-get upgrade -y`).
    pub fn upgrade(&self) -> Result<()> {
        self.run_checked("sudo", &["apt-get", "upgrade", "-y"], None)?;
        Ok(())
    }

    /// Install a package. Already-installed is not an error.
    pub fn install(&self, package: &Package) -> Result<()> {
        let result = match &package.kind {
            PackageKind::Deb => self.run_checked(
                "sudo",
                &[self.frontend.command(), "install", "-y", &package.name],
                Some(&package.name),
            ),
            PackageKind::Snap { classic } => {
                let mut args = vec!["snap", "install", package.name.as_str()];
                if *classic {
                    args.push("--classic");
                }
                self.run_checked("sudo", &args, Some(&package.name))
            }
        };

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.is_ignorable() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Whether a package is currently installed.
    pub fn is_installed(&self, package: &Package) -> Result<bool> {
        match &package.kind {
            PackageKind::Deb => {
                let out = self
                    .host
                    .run(
                        "dpkg-query",
                        &["-W", "-f", "${Status}", package.name.as_str()],
                    )
                    .map_err(|e| Error::Host(e.to_string()))?;
                Ok(out.success && out.stdout_str().contains("install ok installed"))
            }
            PackageKind::Snap { .. } => {
                let out = self
                    .host
                    .run("snap", &["list", package.name.as_str()])
                    .map_err(|e| Error::Host(e.to_string()))?;
                Ok(out.success)
            }
        }
    }

    fn run_checked(&self, cmd: &str, args: &[&str], package: Option<&str>) -> Result<String> {
        let out = self
            .host
            .run(cmd, args)
            .map_err(|e| Error::Host(e.to_string()))?;

        if !out.success {
            let stderr = out.stderr_str();
            let is_snap = args.first() == Some(&"snap");
            return Err(if is_snap {
                Error::from_snap_output(&stderr, package)
            } else {
                Error::from_apt_output(&stderr, package)
            });
        }

        Ok(out.stdout_str())
    }
}
