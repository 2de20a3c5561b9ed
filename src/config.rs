//! Configuration schema for bedrock.
//!
//! Everything has a compiled-in default matching the stock bootstrap, so a
//! fresh machine needs no config file at all. An optional
//! `~/.config/bedrock/config.toml` overrides the lists.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::paths;

/// The unified bedrock configuration structure
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct BedrockConfig {
    /// Core utility packages
    #[serde(default)]
    pub packages: PackagesConfig,

    /// Shell, framework, and plugin configuration
    #[serde(default)]
    pub shell: ShellConfig,

    /// Dotfiles repository configuration
    #[serde(default)]
    pub dotfiles: DotfilesConfig,
}

impl BedrockConfig {
    /// Load the config from ~/.config/bedrock/config.toml.
    ///
    /// A missing file yields the compiled-in defaults; an unparseable file is
    /// an error.
    pub fn load() -> Result<Self> {
        let config_path = paths::config_dir()?.join("config.toml");

        if !config_path.exists() {
            log::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Could not read config file: {}", config_path.display()))?;

        toml::from_str(&content).context("Invalid TOML format in bedrock config")
    }
}

// ============================================================================
// Packages
// ============================================================================

/// Core command-line utilities installed by the core-utils stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct PackagesConfig {
    /// Packages installed through nala after nala itself is in place.
    #[serde(default = "default_core_packages")]
    pub core: Vec<String>,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            core: default_core_packages(),
        }
    }
}

fn default_core_packages() -> Vec<String> {
    [
        "build-essential",
        "git",
        "unzip",
        "tree",
        "ripgrep",
        "fd-find",
        "eza",
        "curl",
        "wget",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

// ============================================================================
// Shell
// ============================================================================

/// Shell stage configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShellConfig {
    /// The login shell to install and activate.
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Installer script for the shell configuration framework.
    #[serde(default = "default_framework_installer")]
    pub framework_installer: String,

    /// Enhancement plugins cloned into the framework's plugin directory.
    #[serde(default = "default_plugins")]
    pub plugins: Vec<PluginRepo>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            framework_installer: default_framework_installer(),
            plugins: default_plugins(),
        }
    }
}

/// A shell plugin repository.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PluginRepo {
    /// Directory name under the plugin root.
    pub name: String,
    /// Git URL to clone.
    pub url: String,
}

fn default_shell() -> String {
    "zsh".to_string()
}

fn default_framework_installer() -> String {
    "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh".to_string()
}

fn default_plugins() -> Vec<PluginRepo> {
    vec![
        PluginRepo {
            name: "zsh-autosuggestions".to_string(),
            url: "https://github.com/zsh-users/zsh-autosuggestions".to_string(),
        },
        PluginRepo {
            name: "zsh-syntax-highlighting".to_string(),
            url: "https://github.com/zsh-users/zsh-syntax-highlighting.git".to_string(),
        },
    ]
}

// ============================================================================
// Dotfiles
// ============================================================================

/// Dotfiles stage configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct DotfilesConfig {
    /// Repository URL. The default is a placeholder the operator must replace
    /// (or override via --dotfiles-repo / BEDROCK_DOTFILES_REPO).
    #[serde(default = "default_dotfiles_repo")]
    pub repo: String,

    /// Clone destination, relative to home when prefixed with `~/`.
    #[serde(default = "default_dotfiles_path")]
    pub path: String,
}

impl Default for DotfilesConfig {
    fn default() -> Self {
        Self {
            repo: default_dotfiles_repo(),
            path: default_dotfiles_path(),
        }
    }
}

impl DotfilesConfig {
    /// Whether a repo URL is still the shipped placeholder.
    pub fn is_placeholder(url: &str) -> bool {
        url.is_empty() || url.contains("yourusername")
    }
}

fn default_dotfiles_repo() -> String {
    "https://github.com/yourusername/dotfiles.git".to_string()
}

fn default_dotfiles_path() -> String {
    "~/dotfiles".to_string()
}
