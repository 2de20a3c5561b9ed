//! Stage assembly: turn the config into the fixed pipeline of steps.

use std::path::{Path, PathBuf};

use aptkit::Frontend;
use provision::{Stage, Step};

use crate::cli::StageId;
use crate::config::{BedrockConfig, DotfilesConfig};
use crate::steps::{
    AppendLine, CompatSymlink, ConfigDump, GitClone, IndexRefresh, InstallPackage,
    LatestReleaseBinary, LoginShell, Reminder, RemoteScript, SkipNotice, SystemUpgrade,
    WslClipboardBridge,
};

const LAZYGIT_REPO: &str = "jesseduffield/lazygit";
const WIN32YANK_URL: &str =
    "https://github.com/equalsraf/win32yank/releases/latest/download/win32yank-x64.zip";
const SYSTEM_BIN: &str = "/usr/local/bin";
const ZELLIJ_AUTOSTART: &str = r#"eval "$(zellij setup --generate-auto-start zsh)""#;
const PLUGIN_REMINDER: &str =
    "Remember to add the plugins to the plugins=(...) line in ~/.zshrc - bedrock does not edit it";

/// Build one stage's steps.
///
/// `home` is passed in (rather than resolved here) so assembly is a pure
/// function of configuration; `dotfiles_repo` is the already-resolved URL
/// (flag > env > config).
pub fn build(
    stage: StageId,
    config: &BedrockConfig,
    home: &Path,
    dotfiles_repo: &str,
) -> Stage {
    let steps: Vec<Box<dyn Step>> = match stage {
        StageId::Update => vec![Box::new(IndexRefresh), Box::new(SystemUpgrade)],

        StageId::CoreUtils => {
            let mut steps: Vec<Box<dyn Step>> =
                vec![Box::new(InstallPackage::deb("nala", Frontend::AptGet))];
            for pkg in &config.packages.core {
                steps.push(Box::new(InstallPackage::deb(pkg, Frontend::Nala)));
            }
            steps.push(Box::new(CompatSymlink::new(
                home.join(".local").join("bin").join("fd"),
                "fdfind",
            )));
            steps
        }

        StageId::Shell => {
            let framework_dir = home.join(".oh-my-zsh");
            let plugin_root = framework_dir.join("custom").join("plugins");

            let mut steps: Vec<Box<dyn Step>> = vec![
                Box::new(InstallPackage::deb(&config.shell.shell, Frontend::Nala)),
                Box::new(LoginShell::new(&config.shell.shell)),
                Box::new(RemoteScript::new(
                    "oh-my-zsh",
                    config.shell.framework_installer.clone(),
                    framework_dir,
                    &["--unattended"],
                )),
            ];
            for plugin in &config.shell.plugins {
                steps.push(Box::new(GitClone::tolerated(
                    plugin.url.clone(),
                    plugin_root.join(&plugin.name),
                )));
            }
            steps.push(Box::new(Reminder::new("zshrc-plugins", PLUGIN_REMINDER)));
            steps
        }

        StageId::Editor => vec![
            Box::new(InstallPackage::deb("snapd", Frontend::Nala)),
            Box::new(InstallPackage::snap_classic("nvim")),
            Box::new(LatestReleaseBinary::new(
                LAZYGIT_REPO,
                "lazygit",
                system_bin("lazygit"),
            )),
        ],

        StageId::Multiplexer => vec![
            Box::new(InstallPackage::snap_classic("zellij")),
            Box::new(ConfigDump::new(
                "zellij",
                &["setup", "--dump-config"],
                home.join(".config").join("zellij").join("config.kdl"),
            )),
            Box::new(AppendLine::new(home.join(".zshrc"), ZELLIJ_AUTOSTART)),
        ],

        StageId::Clipboard => vec![Box::new(WslClipboardBridge::new(
            WIN32YANK_URL,
            "win32yank.exe",
            system_bin("win32yank.exe"),
        ))],

        StageId::Dotfiles => {
            if DotfilesConfig::is_placeholder(dotfiles_repo) {
                vec![Box::new(SkipNotice::new(
                    "dotfiles",
                    "dotfiles repo not configured (set dotfiles.repo or BEDROCK_DOTFILES_REPO)",
                ))]
            } else {
                vec![Box::new(GitClone::new(
                    dotfiles_repo,
                    resolve_home(&config.dotfiles.path, home),
                ))]
            }
        }
    };

    Stage {
        name: stage.name(),
        description: stage.description(),
        steps,
    }
}

fn system_bin(name: &str) -> PathBuf {
    Path::new(SYSTEM_BIN).join(name)
}

/// Resolve a `~/`-prefixed config path against a specific home directory.
fn resolve_home(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}
