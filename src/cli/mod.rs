//! CLI Module
//!
//! Command-line interface for onset timing analysis.

pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Onset Timing - measure note timing across multitrack recordings
#[derive(Parser, Debug)]
#[command(name = "onset-timing")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze every recording in a folder and compare channel timing
    #[command(name = "analyze")]
    Analyze(AnalyzeArgs),

    /// List the onsets found in a single recording
    #[command(name = "detect")]
    Detect {
        /// Recording to analyze
        file: PathBuf,

        #[command(flatten)]
        detector: DetectorArgs,

        /// Report onset times relative to this sample index
        #[arg(long, default_value_t = 0)]
        reference: usize,
    },
}

/// Detector overrides shared by all commands
#[derive(Args, Debug, Clone, Default)]
pub struct DetectorArgs {
    /// Sample-to-sample amplitude difference that counts as a note
    #[arg(short, long)]
    pub threshold: Option<u32>,

    /// Samples between notes to catch duplicates
    #[arg(short = 's', long)]
    pub min_spacing: Option<usize>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Folder containing one recording per channel
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Recording file extension
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Also search subfolders
    #[arg(short, long)]
    pub recursive: bool,

    /// Stop the whole run when a channel has no notes
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub detector: DetectorArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
