mod cli;
mod config;
mod paths;
mod pipeline;
mod stages;
mod state;
mod steps;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    if cli.list_stages {
        pipeline::list_stages();
        return Ok(());
    }

    pipeline::run(&ctx, &cli)
}
