//! aqua-config
//!
//! Resolves an aqua.yaml and everything it imports, printing the merged
//! configuration, the per-file update targets, or the visited file chain.

use anyhow::{Context, Result};
use aqua_config_reader::cli::{Cli, Command};
use aqua_config_reader::config::{ConfigFinder, ConfigReader, ReaderParams};
use aqua_config_reader::format::{
    OutputFormat, format_config, format_file_configs, format_file_list,
};
use aqua_config_reader::fs::OsFileSystem;
use clap::Parser;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

/// Install the global subscriber according to `--log`.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)
                .with_context(|| format!("failed to open log file {}", filename))?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

/// Pick the root config: the explicit argument, or discovery from the current directory.
fn root_config_path(fs: &OsFileSystem, explicit: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.clone());
    }
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let found = ConfigFinder::discover().find(fs, &cwd)?;
    Ok(found)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut params = ReaderParams::discover();
    if let Some(home_dir) = &cli.home_dir {
        params.home_dir = Some(home_dir.clone());
    }
    debug!(home_dir = ?params.home_dir, "Reader parameters");

    let fs = OsFileSystem;
    let root = root_config_path(&fs, cli.command.target().path.as_ref())?;
    let reader = ConfigReader::new(fs, params);
    let format = OutputFormat::from(cli.format);

    let output = match &cli.command {
        Command::Read(_) => {
            let config = reader.read(&root)?;
            info!(
                root = %root.display(),
                packages = config.packages.len(),
                registries = config.registries.len(),
                "Resolved configuration"
            );
            format_config(&config, format)?
        }
        Command::UpdateTargets(_) => {
            let (_, files) = reader.read_for_update(&root)?;
            info!(root = %root.display(), files = files.len(), "Resolved update targets");
            format_file_configs(&files, format)?
        }
        Command::Chain(_) => {
            let visited = reader.visited_files(&root)?;
            format_file_list(&visited)
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
