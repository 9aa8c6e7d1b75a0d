//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    analyze::AnalyzeArgs, class::ClassCommands, completions::CompletionsArgs,
    convert::ConvertArgs, estimate::EstimateArgs, init::InitArgs, material::MaterialCommands,
    units::UnitsCommands,
};

#[derive(Parser)]
#[command(name = "partcost")]
#[command(author, version, about = "Machined-part cost estimation")]
#[command(long_about = "Estimate machining time and raw material cost for a part from its solid-model geometry.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .partcost/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new partcost project
    Init(InitArgs),

    /// Extract geometry and machining time from a model
    Analyze(AnalyzeArgs),

    /// Estimate raw material cost for a model
    Estimate(EstimateArgs),

    /// Convert a value between units
    Convert(ConvertArgs),

    /// Unit preference management
    #[command(subcommand)]
    Units(UnitsCommands),

    /// Material reference data
    #[command(subcommand)]
    Material(MaterialCommands),

    /// Part classification reference data
    #[command(subcommand)]
    Class(ClassCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report or table
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
}
