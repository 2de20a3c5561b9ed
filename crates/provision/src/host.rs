//! The host capability trait and its OS-backed implementation.
//!
//! Every machine mutation a step performs goes through [`Host`]: running
//! commands, touching the filesystem, downloading bytes. Steps stay pure
//! descriptions of intent, and tests swap in [`crate::MemoryHost`].

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::types::CommandOutput;

/// Maximum download size (100 MB covers every binary this tool fetches).
const MAX_BODY_SIZE: u64 = 100 * 1024 * 1024;

/// Capability interface between steps and the machine.
pub trait Host: Send + Sync {
    /// Run a command and capture its output. A non-zero exit is NOT an error
    /// at this layer; callers inspect [`CommandOutput::success`].
    fn run(&self, cmd: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Resolve a command name to a path, if present on the machine.
    fn which(&self, cmd: &str) -> Option<PathBuf>;

    /// Whether a command is available.
    fn command_exists(&self, cmd: &str) -> bool {
        self.which(cmd).is_some()
    }

    /// Whether a path exists (file, directory, or symlink).
    fn path_exists(&self, path: &Path) -> bool;

    /// Read a file to a string.
    fn read_file(&self, path: &Path) -> Result<String>;

    /// Write a file, creating parent directories as needed.
    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Append text to a file, creating it (and parents) if absent.
    fn append_file(&self, path: &Path, text: &str) -> Result<()>;

    /// Create a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Create a symlink at `link` pointing to `source`.
    fn symlink(&self, source: &Path, link: &Path) -> Result<()>;

    /// Mark a file executable (0755).
    fn set_executable(&self, path: &Path) -> Result<()>;

    /// Remove a file. Missing files are not an error.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Download a URL into memory.
    fn download(&self, url: &str) -> Result<Vec<u8>>;

    /// The current user's home directory.
    fn home_dir(&self) -> Result<PathBuf>;
}

/// Real host backed by `std::process`, `std::fs`, and a blocking HTTP agent.
pub struct OsHost {
    agent: ureq::Agent,
}

impl OsHost {
    /// Create a host with default HTTP settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
        }
    }
}

impl Default for OsHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for OsHost {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(cmd)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute: {} {}", cmd, args.join(" ")))?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    fn which(&self, cmd: &str) -> Option<PathBuf> {
        which::which(cmd).ok()
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists() || path.is_symlink()
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn append_file(&self, path: &Path, text: &str) -> Result<()> {
        use std::io::Write;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.write_all(text.as_bytes())
            .with_context(|| format!("Failed to append to {}", path.display()))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))
    }

    fn symlink(&self, source: &Path, link: &Path) -> Result<()> {
        if let Some(parent) = link.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        #[cfg(unix)]
        std::os::unix::fs::symlink(source, link).with_context(|| {
            format!(
                "Failed to create symlink: {} -> {}",
                link.display(),
                source.display()
            )
        })?;

        #[cfg(not(unix))]
        anyhow::bail!("Symlinks not supported on this platform");

        #[cfg(unix)]
        Ok(())
    }

    fn set_executable(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(path)
                .with_context(|| format!("Failed to stat {}", path.display()))?
                .permissions();
            perms.set_mode(0o755);
            fs::set_permissions(path, perms)
                .with_context(|| format!("Failed to chmod {}", path.display()))?;
        }

        #[cfg(not(unix))]
        let _ = path;

        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", "bedrock")
            .call()
            .with_context(|| format!("Failed to download {url}"))?;

        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_SIZE)
            .read_to_vec()
            .with_context(|| format!("Failed to read response body from {url}"))?;

        Ok(bytes)
    }

    fn home_dir(&self) -> Result<PathBuf> {
        dirs::home_dir().context("Could not determine home directory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let host = OsHost::new();
        let path = dir.path().join("a").join("b").join("c.txt");

        host.write_file(&path, b"hello").unwrap();
        assert_eq!(host.read_file(&path).unwrap(), "hello");
    }

    #[test]
    fn append_file_creates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let host = OsHost::new();
        let path = dir.path().join("rc");

        host.append_file(&path, "line one\n").unwrap();
        host.append_file(&path, "line two\n").unwrap();
        assert_eq!(host.read_file(&path).unwrap(), "line one\nline two\n");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let host = OsHost::new();
        let source = dir.path().join("real");
        let link = dir.path().join("bin").join("alias");

        host.write_file(&source, b"").unwrap();
        host.symlink(&source, &link).unwrap();
        assert!(host.path_exists(&link));
        assert_eq!(std::fs::read_link(&link).unwrap(), source);
    }

    #[cfg(unix)]
    #[test]
    fn set_executable_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let host = OsHost::new();
        let path = dir.path().join("tool");

        host.write_file(&path, b"#!/bin/sh\n").unwrap();
        host.set_executable(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn remove_file_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let host = OsHost::new();
        host.remove_file(&dir.path().join("nope")).unwrap();
    }

    #[test]
    fn run_captures_output() {
        let host = OsHost::new();
        let out = host.run("echo", &["hi"]).unwrap();
        assert!(out.success);
        assert_eq!(out.stdout_str(), "hi");
    }

    #[test]
    fn run_reports_failure_without_erroring() {
        let host = OsHost::new();
        let out = host.run("false", &[]).unwrap();
        assert!(!out.success);
    }
}
