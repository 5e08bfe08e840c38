//! CLI command definitions for aqua-config
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::format::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    /// YAML (default)
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Resolve aqua.yaml imports into a single configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Home directory used for `~/` expansion (default: AQUA_HOME_DIR or the user's home)
    #[arg(long, global = true, value_name = "DIR")]
    pub home_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Yaml, global = true)]
    pub format: FormatArg,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the configuration merged with all of its imports
    Read(TargetArgs),

    /// Print each imported file's own configuration, keyed by path
    UpdateTargets(TargetArgs),

    /// Print every file visited while resolving imports, in order
    Chain(TargetArgs),
}

impl Command {
    pub fn target(&self) -> &TargetArgs {
        match self {
            Command::Read(args) | Command::UpdateTargets(args) | Command::Chain(args) => args,
        }
    }
}

/// Arguments selecting the root configuration file
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Root configuration file (default: discovered from the current directory, or AQUA_CONFIG)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}
