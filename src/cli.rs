use clap::Parser;

#[derive(Parser)]
#[command(name = "bedrock")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Bootstrap a fresh Ubuntu/WSL machine", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Dry run - show what would be done
    #[arg(long)]
    pub dry_run: bool,

    /// Skip specific stages (comma-separated)
    #[arg(long)]
    pub skip: Option<String>,

    /// Only run specific stages (comma-separated)
    #[arg(long)]
    pub only: Option<String>,

    /// List all available stages
    #[arg(long)]
    pub list_stages: bool,

    /// Dotfiles repository URL (overrides config)
    #[arg(long, env = "BEDROCK_DOTFILES_REPO")]
    pub dotfiles_repo: Option<String>,
}

/// Bootstrap stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageId {
    Update,
    CoreUtils,
    Shell,
    Editor,
    Multiplexer,
    Clipboard,
    Dotfiles,
}

impl StageId {
    pub fn all() -> &'static [StageId] {
        &[
            StageId::Update,
            StageId::CoreUtils,
            StageId::Shell,
            StageId::Editor,
            StageId::Multiplexer,
            StageId::Clipboard,
            StageId::Dotfiles,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            StageId::Update => "update",
            StageId::CoreUtils => "core-utils",
            StageId::Shell => "shell",
            StageId::Editor => "editor",
            StageId::Multiplexer => "multiplexer",
            StageId::Clipboard => "clipboard",
            StageId::Dotfiles => "dotfiles",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StageId::Update => "Refresh package index and upgrade the system",
            StageId::CoreUtils => "Install nala and the core command-line utilities",
            StageId::Shell => "Install zsh, oh-my-zsh, and shell plugins",
            StageId::Editor => "Install neovim and lazygit",
            StageId::Multiplexer => "Install zellij and wire up auto-start",
            StageId::Clipboard => "Install the WSL clipboard bridge (skipped elsewhere)",
            StageId::Dotfiles => "Clone the dotfiles repository",
        }
    }

    pub fn from_name(name: &str) -> Option<StageId> {
        match name {
            "update" => Some(StageId::Update),
            "core-utils" => Some(StageId::CoreUtils),
            "shell" => Some(StageId::Shell),
            "editor" => Some(StageId::Editor),
            "multiplexer" => Some(StageId::Multiplexer),
            "clipboard" => Some(StageId::Clipboard),
            "dotfiles" => Some(StageId::Dotfiles),
            _ => None,
        }
    }
}
