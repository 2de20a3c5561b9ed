//! Pipeline assembly and execution.
//!
//! The seven stages always run in the same fixed order; `--only` and `--skip`
//! select a subset but never reorder. The first fatal step error aborts the
//! run with the stage name in the error chain, and the process exits
//! non-zero.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use provision::{OsHost, Pipeline, ProgressCallback, RunOptions, RunSummary, StepOutcome};

use crate::cli::{Cli, StageId};
use crate::config::BedrockConfig;
use crate::stages;
use crate::state::RunState;
use crate::ui;
use crate::Context;

/// Run the bootstrap pipeline against the real machine.
pub fn run(ctx: &Context, cli: &Cli) -> Result<()> {
    let config = BedrockConfig::load()?;
    let dotfiles_repo = cli
        .dotfiles_repo
        .clone()
        .unwrap_or_else(|| config.dotfiles.repo.clone());

    let host = OsHost::new();
    let home = provision::Host::home_dir(&host)?;

    let selected = determine_stages(cli.only.as_deref(), cli.skip.as_deref());
    let pipeline = assemble(&config, &selected, &home, &dotfiles_repo);

    if !ctx.quiet {
        ui::header("Bedrock - machine bootstrap");
        if cli.dry_run {
            ui::info("Dry run - no changes will be made");
        }
    }

    let opts = RunOptions {
        dry_run: cli.dry_run,
        verbose: ctx.verbose > 0,
    };
    let mut progress = UiProgress { quiet: ctx.quiet };

    let summary = pipeline.run(&host, &opts, &mut progress)?;

    if !cli.dry_run {
        let mut state = RunState::load().unwrap_or_default();
        state.mark_run(&pipeline.stage_names());
        if let Err(e) = state.save() {
            log::warn!("Could not record run state: {e}");
        }
    }

    if !ctx.quiet {
        print_summary(&summary, cli.dry_run);
    }

    Ok(())
}

/// Build a pipeline for the selected stages.
pub fn assemble(
    config: &BedrockConfig,
    selected: &[StageId],
    home: &Path,
    dotfiles_repo: &str,
) -> Pipeline {
    let mut pipeline = Pipeline::new();
    for stage in selected {
        pipeline.push(stages::build(*stage, config, home, dotfiles_repo));
    }
    pipeline
}

/// Apply `--only` / `--skip` to the fixed stage order. Unknown names are
/// ignored; order is never changed.
pub fn determine_stages(only: Option<&str>, skip: Option<&str>) -> Vec<StageId> {
    if let Some(only) = only {
        let wanted: Vec<StageId> = only
            .split(',')
            .filter_map(|s| StageId::from_name(s.trim()))
            .collect();
        return StageId::all()
            .iter()
            .filter(|s| wanted.contains(s))
            .copied()
            .collect();
    }

    if let Some(skip) = skip {
        let unwanted: Vec<StageId> = skip
            .split(',')
            .filter_map(|s| StageId::from_name(s.trim()))
            .collect();
        return StageId::all()
            .iter()
            .filter(|s| !unwanted.contains(s))
            .copied()
            .collect();
    }

    StageId::all().to_vec()
}

/// List available stages (`--list-stages`).
pub fn list_stages() {
    ui::header("Available Stages");
    println!();

    for stage in StageId::all() {
        println!("  {:<13} {}", stage.name().bold(), stage.description().dimmed());
    }

    println!();
    println!("  {} Run the full pipeline", "bedrock".bold());
    println!("  {} Preview without changes", "bedrock --dry-run".bold());
    println!(
        "  {} Run a subset",
        "bedrock --only=update,core-utils".bold()
    );
    println!("  {} Skip stages", "bedrock --skip=clipboard".bold());
}

/// Progress callback that renders through the ui helpers.
struct UiProgress {
    quiet: bool,
}

impl ProgressCallback for UiProgress {
    fn on_stage_start(&mut self, _name: &str, description: &str) {
        if !self.quiet {
            ui::stage_banner(description);
        }
    }

    fn on_step_done(&mut self, id: &str, outcome: &StepOutcome) {
        if self.quiet {
            return;
        }
        match outcome {
            StepOutcome::Changed => ui::success(id),
            StepOutcome::AlreadyDone => ui::dim(&format!("{id} (already done)")),
            StepOutcome::Skipped { reason } => ui::dim(&format!("{id} skipped: {reason}")),
        }
    }

    fn on_step_tolerated(&mut self, id: &str, error: &anyhow::Error) {
        ui::warn(&format!("{id} failed: {error:#} - continuing"));
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    println!();
    if dry_run {
        ui::info(&format!(
            "Dry run complete: {} step(s) would apply, {} already done",
            summary.skipped, summary.already_done
        ));
        return;
    }

    ui::success(&format!(
        "Bootstrap complete: {} changed, {} already done, {} skipped",
        summary.changed, summary.already_done, summary.skipped
    ));
    if summary.tolerated > 0 {
        ui::warn(&format!(
            "{} optional step(s) failed - re-run to retry them",
            summary.tolerated
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use provision::{CommandOutput, Host, MemoryHost, NoProgress};
    use std::io::Write;
    use std::path::PathBuf;

    fn home() -> PathBuf {
        PathBuf::from("/home/test")
    }

    fn run_pipeline(pipeline: &Pipeline, host: &MemoryHost) -> Result<RunSummary> {
        pipeline.run(host, &RunOptions::default(), &mut NoProgress)
    }

    /// A host that looks like a machine where everything is already set up.
    fn provisioned_host() -> MemoryHost {
        let host = MemoryHost::new();
        host.add_binary("zsh", "/usr/bin/zsh");
        host.add_binary("fdfind", "/usr/bin/fdfind");
        host.stub_command("dpkg-query", CommandOutput::ok("install ok installed"));
        // snap list succeeds by default (installed)
        host.add_dir("/home/test/.oh-my-zsh");
        host.add_dir("/home/test/.oh-my-zsh/custom/plugins/zsh-autosuggestions");
        host.add_dir("/home/test/.oh-my-zsh/custom/plugins/zsh-syntax-highlighting");
        host.symlink(
            std::path::Path::new("/usr/bin/fdfind"),
            std::path::Path::new("/home/test/.local/bin/fd"),
        )
        .unwrap();
        host.add_file("/usr/local/bin/lazygit", b"\x7fELF".to_vec());
        host.add_file("/home/test/.config/zellij/config.kdl", "keybinds {}\n");
        host.add_file(
            "/home/test/.zshrc",
            "eval \"$(zellij setup --generate-auto-start zsh)\"\n",
        );
        host.add_dir("/home/test/dotfiles");
        host.add_file("/proc/version", "Linux version 5.15.0-generic\n");
        host
    }

    fn tar_gz_with(name: &str, data: &[u8]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, data).unwrap();
        let tar_bytes = builder.into_inner().unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn determine_stages_default_is_full_order() {
        let stages = determine_stages(None, None);
        assert_eq!(stages, StageId::all().to_vec());
    }

    #[test]
    fn determine_stages_only_preserves_pipeline_order() {
        let stages = determine_stages(Some("dotfiles,update"), None);
        assert_eq!(stages, vec![StageId::Update, StageId::Dotfiles]);
    }

    #[test]
    fn determine_stages_skip_removes() {
        let stages = determine_stages(None, Some("clipboard, editor"));
        assert!(!stages.contains(&StageId::Clipboard));
        assert!(!stages.contains(&StageId::Editor));
        assert_eq!(stages.len(), 5);
    }

    #[test]
    fn determine_stages_ignores_unknown_names() {
        let stages = determine_stages(Some("update,bogus"), None);
        assert_eq!(stages, vec![StageId::Update]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn fresh_machine_full_run_succeeds() {
        let config = BedrockConfig::default();
        let host = MemoryHost::new();
        host.add_binary("zsh", "/usr/bin/zsh");
        host.add_binary("fdfind", "/usr/bin/fdfind");
        host.fail_command("snap list", "error: no matching snaps installed");
        host.stub_command(
            "zellij setup --dump-config",
            CommandOutput::ok("keybinds {}\n"),
        );
        host.add_file("/proc/version", "Linux version 5.15.0-generic\n");
        host.add_download(
            config.shell.framework_installer.clone(),
            b"#!/bin/sh\n".to_vec(),
        );

        let suffix = fetchkit::platform::asset_suffix().unwrap();
        host.add_download(
            "https://api.github.com/repos/jesseduffield/lazygit/releases/latest",
            format!(
                r#"{{"tag_name": "v0.44.1", "assets": [{{"name": "lazygit_0.44.1_{suffix}.tar.gz", "browser_download_url": "https://example.com/lazygit.tar.gz", "size": 1}}]}}"#
            )
            .into_bytes(),
        );
        host.add_download(
            "https://example.com/lazygit.tar.gz",
            tar_gz_with("lazygit", b"\x7fELF"),
        );

        let selected = determine_stages(None, None);
        let pipeline = assemble(
            &config,
            &selected,
            &home(),
            "https://github.com/someone/dots.git",
        );
        let summary = run_pipeline(&pipeline, &host).unwrap();

        assert_eq!(summary.stages_run, 7);
        assert!(host.ran("sudo apt-get update"));
        assert!(host.ran("sudo apt-get upgrade -y"));
        assert!(host.ran("sudo nala install -y ripgrep"));
        assert!(host.ran("chsh -s /usr/bin/zsh"));
        assert!(host.ran("git clone https://github.com/someone/dots.git /home/test/dotfiles"));
        assert_eq!(
            host.file_contents(std::path::Path::new(
                "/home/test/.config/zellij/config.kdl"
            )),
            Some("keybinds {}\n".to_string())
        );
        // clipboard bridge skipped on a plain kernel: no win32yank download
        assert!(
            !host
                .downloads_requested()
                .iter()
                .any(|u| u.contains("win32yank"))
        );
    }

    #[test]
    fn rerun_on_provisioned_machine_mutates_nothing() {
        let config = BedrockConfig::default();
        let host = provisioned_host();

        let selected = determine_stages(Some("core-utils,shell,editor,multiplexer,clipboard,dotfiles"), None);
        let pipeline = assemble(
            &config,
            &selected,
            &home(),
            "https://github.com/someone/dots.git",
        );
        let summary = run_pipeline(&pipeline, &host).unwrap();

        // chsh re-runs every time (safe to repeat); everything else is guarded
        assert_eq!(summary.changed, 1);
        assert!(host.ran("chsh -s /usr/bin/zsh"));
        assert!(host.downloads_requested().is_empty());
        assert!(!host.ran("git clone"));
        assert!(!host.ran("sudo nala install"));
        assert!(!host.ran("sudo snap install"));

        // the startup hook is registered exactly once
        let zshrc = host
            .file_contents(std::path::Path::new("/home/test/.zshrc"))
            .unwrap();
        assert_eq!(zshrc.matches("zellij setup --generate-auto-start").count(), 1);
    }

    #[test]
    fn failed_index_refresh_halts_before_core_utils() {
        let config = BedrockConfig::default();
        let host = MemoryHost::new();
        host.fail_command("sudo apt-get update", "Could not resolve 'archive.ubuntu.com'");

        let selected = determine_stages(None, None);
        let pipeline = assemble(&config, &selected, &home(), "");
        let err = run_pipeline(&pipeline, &host).unwrap_err();

        assert!(format!("{err:#}").contains("stage 'update'"));
        assert!(!host.ran("sudo apt-get install -y nala"));
        assert!(!host.ran("sudo nala"));
    }

    #[test]
    fn clipboard_stage_alone_makes_no_network_calls_off_wsl() {
        let config = BedrockConfig::default();
        let host = MemoryHost::new();
        host.add_file("/proc/version", "Linux version 5.15.0-generic\n");

        let selected = determine_stages(Some("clipboard"), None);
        let pipeline = assemble(&config, &selected, &home(), "");
        let summary = run_pipeline(&pipeline, &host).unwrap();

        assert_eq!(summary.skipped, 1);
        assert!(host.downloads_requested().is_empty());
        assert!(host.commands_run().is_empty());
    }

    #[test]
    fn existing_targets_suppress_clone_and_link_operations() {
        let config = BedrockConfig::default();
        let host = MemoryHost::new();
        host.add_binary("zsh", "/usr/bin/zsh");
        host.stub_command("dpkg-query", CommandOutput::ok("install ok installed"));
        host.add_dir("/home/test/.oh-my-zsh");
        host.add_dir("/home/test/.oh-my-zsh/custom/plugins/zsh-autosuggestions");
        host.add_dir("/home/test/.oh-my-zsh/custom/plugins/zsh-syntax-highlighting");
        host.add_dir("/home/test/dotfiles");

        let selected = determine_stages(Some("shell,dotfiles"), None);
        let pipeline = assemble(
            &config,
            &selected,
            &home(),
            "https://github.com/someone/dots.git",
        );
        run_pipeline(&pipeline, &host).unwrap();

        assert!(!host.ran("git clone"));
        assert!(host.downloads_requested().is_empty());
    }

    #[test]
    fn tolerated_plugin_failure_does_not_halt_the_run() {
        let config = BedrockConfig::default();
        let host = MemoryHost::new();
        host.add_binary("zsh", "/usr/bin/zsh");
        host.stub_command("dpkg-query", CommandOutput::ok("install ok installed"));
        host.add_dir("/home/test/.oh-my-zsh");
        host.fail_command("git clone", "fatal: could not read from remote repository");
        host.add_dir("/home/test/dotfiles");

        let selected = determine_stages(Some("shell,dotfiles"), None);
        let pipeline = assemble(
            &config,
            &selected,
            &home(),
            "https://github.com/someone/dots.git",
        );
        let summary = run_pipeline(&pipeline, &host).unwrap();

        assert_eq!(summary.tolerated, 2);
        assert_eq!(summary.stages_run, 2);
    }

    #[test]
    fn dry_run_executes_nothing() {
        let config = BedrockConfig::default();
        let host = provisioned_host();

        let selected = determine_stages(None, None);
        let pipeline = assemble(&config, &selected, &home(), "");
        let opts = RunOptions {
            dry_run: true,
            verbose: false,
        };
        pipeline.run(&host, &opts, &mut NoProgress).unwrap();

        // state detection may query, but nothing mutating runs
        assert!(!host.ran("sudo"));
        assert!(!host.ran("git clone"));
        assert!(!host.ran("chsh"));
        assert!(host.downloads_requested().is_empty());
    }
}
