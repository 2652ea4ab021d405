//! Onset Timing CLI
//!
//! Command-line interface for multitrack onset timing analysis.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use onset_timing::cli::{commands, Cli, Commands};
use onset_timing::Result;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Onset Timing v{}", env!("CARGO_PKG_VERSION"));

    let name = command_name(&cli.command);
    handle_command(cli.command)
        .map_err(|e| {
            for suggestion in e.recovery_suggestions() {
                eprintln!("hint: {}", suggestion);
            }
            e
        })
        .with_context(|| format!("{} failed", name))
}

fn command_name(cmd: &Commands) -> &'static str {
    match cmd {
        Commands::Analyze(_) => "analyze",
        Commands::Detect { .. } => "detect",
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Analyze(args) => commands::analyze(&args),
        Commands::Detect {
            file,
            detector,
            reference,
        } => commands::detect(&file, &detector, reference),
    }
}
