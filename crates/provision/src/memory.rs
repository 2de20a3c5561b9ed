//! In-memory host fake for tests.
//!
//! Commands succeed with empty output unless stubbed or failed by prefix;
//! the filesystem is a map; downloads must be canned up front. Every command
//! invocation and download request is recorded so tests can assert what a
//! pipeline actually did (or, for guard tests, did not do).

use anyhow::{Result, anyhow};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::host::Host;
use crate::types::CommandOutput;

/// Scriptable in-memory [`Host`].
pub struct MemoryHost {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    dirs: Mutex<HashSet<PathBuf>>,
    symlinks: Mutex<HashMap<PathBuf, PathBuf>>,
    binaries: Mutex<HashMap<String, PathBuf>>,
    responses: Mutex<Vec<(String, CommandOutput)>>,
    command_log: Mutex<Vec<String>>,
    downloads: Mutex<HashMap<String, Vec<u8>>>,
    download_log: Mutex<Vec<String>>,
    home: PathBuf,
}

impl MemoryHost {
    /// Create an empty fake with `/home/test` as the home directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            dirs: Mutex::new(HashSet::new()),
            symlinks: Mutex::new(HashMap::new()),
            binaries: Mutex::new(HashMap::new()),
            responses: Mutex::new(Vec::new()),
            command_log: Mutex::new(Vec::new()),
            downloads: Mutex::new(HashMap::new()),
            download_log: Mutex::new(Vec::new()),
            home: PathBuf::from("/home/test"),
        }
    }

    /// Seed a file with contents.
    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.lock().unwrap().insert(path.into(), contents.into());
    }

    /// Seed a directory.
    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        self.dirs.lock().unwrap().insert(path.into());
    }

    /// Make a command resolvable via [`Host::which`].
    pub fn add_binary(&self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.binaries.lock().unwrap().insert(name.into(), path.into());
    }

    /// Stub the output for any invocation whose rendered command line starts
    /// with `prefix`. First matching stub wins.
    pub fn stub_command(&self, prefix: impl Into<String>, output: CommandOutput) {
        self.responses.lock().unwrap().push((prefix.into(), output));
    }

    /// Make matching invocations fail with the given stderr.
    pub fn fail_command(&self, prefix: impl Into<String>, stderr: impl Into<String>) {
        self.stub_command(prefix, CommandOutput::err(stderr));
    }

    /// Can a download for a URL.
    pub fn add_download(&self, url: impl Into<String>, bytes: Vec<u8>) {
        self.downloads.lock().unwrap().insert(url.into(), bytes);
    }

    /// Every command line that was run, in order.
    #[must_use]
    pub fn commands_run(&self) -> Vec<String> {
        self.command_log.lock().unwrap().clone()
    }

    /// Whether any recorded command line starts with `prefix`.
    #[must_use]
    pub fn ran(&self, prefix: &str) -> bool {
        self.command_log
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.starts_with(prefix))
    }

    /// Every URL that was requested, in order.
    #[must_use]
    pub fn downloads_requested(&self) -> Vec<String> {
        self.download_log.lock().unwrap().clone()
    }

    /// Contents of a written file, if present.
    #[must_use]
    pub fn file_contents(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|b| String::from_utf8_lossy(b).to_string())
    }

    /// Target of a created symlink, if present.
    #[must_use]
    pub fn symlink_target(&self, link: &Path) -> Option<PathBuf> {
        self.symlinks.lock().unwrap().get(link).cloned()
    }

    fn render(cmd: &str, args: &[&str]) -> String {
        if args.is_empty() {
            cmd.to_string()
        } else {
            format!("{} {}", cmd, args.join(" "))
        }
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for MemoryHost {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<CommandOutput> {
        let line = Self::render(cmd, args);
        self.command_log.lock().unwrap().push(line.clone());

        let responses = self.responses.lock().unwrap();
        for (prefix, output) in responses.iter() {
            if line.starts_with(prefix.as_str()) {
                return Ok(output.clone());
            }
        }

        Ok(CommandOutput::ok(""))
    }

    fn which(&self, cmd: &str) -> Option<PathBuf> {
        self.binaries.lock().unwrap().get(cmd).cloned()
    }

    fn path_exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
            || self.dirs.lock().unwrap().contains(path)
            || self.symlinks.lock().unwrap().contains_key(path)
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|b| String::from_utf8_lossy(b).to_string())
            .ok_or_else(|| anyhow!("No such file: {}", path.display()))
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.dirs.lock().unwrap().insert(parent.to_path_buf());
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn append_file(&self, path: &Path, text: &str) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        files
            .entry(path.to_path_buf())
            .or_default()
            .extend_from_slice(text.as_bytes());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn symlink(&self, source: &Path, link: &Path) -> Result<()> {
        self.symlinks
            .lock()
            .unwrap()
            .insert(link.to_path_buf(), source.to_path_buf());
        Ok(())
    }

    fn set_executable(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.download_log.lock().unwrap().push(url.to_string());
        self.downloads
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("No canned download for {url}"))
    }

    fn home_dir(&self) -> Result<PathBuf> {
        Ok(self.home.clone())
    }
}
