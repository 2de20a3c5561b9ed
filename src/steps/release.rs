//! Release-binary install steps.
//!
//! Both steps download into memory, extract a single archive member, stage it
//! under ~/.cache/bedrock, and `sudo install` it into the system bin
//! directory. The staging file is removed whether or not the install
//! succeeds.

use anyhow::{Context, Result, anyhow, bail};
use provision::{Host, Step, StepOutcome, StepState};
use std::path::{Path, PathBuf};

use fetchkit::platform;
use fetchkit::release;

/// Install the latest release of a GitHub-hosted tool from its tar.gz asset.
///
/// Version discovery reads exactly one field (`tag_name`) of the latest
/// release; if it cannot be found the install fails, with no retry and no
/// fallback source.
#[derive(Debug)]
pub struct LatestReleaseBinary {
    repo: &'static str,
    binary: &'static str,
    dest: PathBuf,
}

impl LatestReleaseBinary {
    pub fn new(repo: &'static str, binary: &'static str, dest: impl Into<PathBuf>) -> Self {
        Self {
            repo,
            binary,
            dest: dest.into(),
        }
    }
}

impl Step for LatestReleaseBinary {
    fn id(&self) -> String {
        format!("release:{}", self.binary)
    }

    fn description(&self) -> String {
        format!("Install {} from {} releases", self.binary, self.repo)
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

        let api = host
            .download(&release::latest_release_url(self.repo))
            .with_context(|| format!("failed to query latest release of {}", self.repo))?;
        let latest = release::parse_release(&api)?;

        let asset_name = format!(
            "{}_{}_{}.tar.gz",
            self.binary,
            latest.version(),
            platform::asset_suffix()?
        );
        let asset = latest
            .find_asset(&asset_name)
            .ok_or_else(|| anyhow!("no release asset named {asset_name}"))?;

        let archive = host
            .download(&asset.download_url)
            .with_context(|| format!("failed to download {asset_name}"))?;
        let binary = fetchkit::archive::extract_tar_gz_member(&archive, self.binary)?;

        install_binary(host, self.binary, &binary, &self.dest)?;
        Ok(StepOutcome::Changed)
    }
}

/// Install the WSL clipboard bridge, gated on the kernel identifying as WSL.
///
/// On a non-WSL kernel the step skips with zero network calls - an expected
/// branch, not a failure. No version pinning: the fixed URL always serves the
/// latest build.
#[derive(Debug)]
pub struct WslClipboardBridge {
    url: &'static str,
    member: &'static str,
    dest: PathBuf,
}

impl WslClipboardBridge {
    pub fn new(url: &'static str, member: &'static str, dest: impl Into<PathBuf>) -> Self {
        Self {
            url,
            member,
            dest: dest.into(),
        }
    }

    fn kernel_version(host: &dyn Host) -> String {
        let path = Path::new(platform::KERNEL_VERSION_PATH);
        if host.path_exists(path) {
            host.read_file(path).unwrap_or_default()
        } else {
            String::new()
        }
    }
}

impl Step for WslClipboardBridge {
    fn id(&self) -> String {
        format!("clipboard:{}", self.member)
    }

    fn description(&self) -> String {
        format!("Install {} for WSL clipboard access", self.member)
    }

    fn current_state(&self, host: &dyn Host) -> Result<StepState> {
        let wsl = platform::is_wsl_kernel(&Self::kernel_version(host));
        Ok(if !wsl || host.path_exists(&self.dest) {
            StepState::Satisfied
        } else {
            StepState::Missing
        })
    }

    fn apply(&self, host: &dyn Host) -> Result<StepOutcome> {
        if !platform::is_wsl_kernel(&Self::kernel_version(host)) {
            return Ok(StepOutcome::Skipped {
                reason: "kernel does not identify as WSL".to_string(),
            });
        }

        if host.path_exists(&self.dest) {
            return Ok(StepOutcome::AlreadyDone);
        }

        let archive = host
            .download(self.url)
            .with_context(|| format!("failed to download {}", self.url))?;
        let binary = fetchkit::archive::extract_zip_member(&archive, self.member)?;

        install_binary(host, self.member, &binary, &self.dest)?;
        Ok(StepOutcome::Changed)
    }
}

/// Stage bytes under ~/.cache/bedrock and `sudo install` them to `dest`.
fn install_binary(host: &dyn Host, name: &str, bytes: &[u8], dest: &Path) -> Result<()> {
    let staging = host.home_dir()?.join(".cache").join("bedrock").join(name);
    host.write_file(&staging, bytes)?;
    host.set_executable(&staging)?;

    let staging_str = staging.to_string_lossy().to_string();
    let dest_str = dest.to_string_lossy().to_string();
    let out = host.run("sudo", &["install", "-m", "0755", &staging_str, &dest_str]);

    // The staged download is a temporary artifact either way.
    host.remove_file(&staging)?;

    let out = out?;
    if !out.success {
        bail!("failed to install {}: {}", dest.display(), out.stderr_str());
    }

    Ok(())
}
