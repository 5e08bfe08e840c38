//! Output formatting for resolved configurations.

use crate::config::{Config, FileConfigs};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// Serialize any value in this format.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        Ok(match self {
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Json => {
                let mut out = serde_json::to_string_pretty(value)?;
                out.push('\n');
                out
            }
        })
    }
}

/// Render a merged configuration.
pub fn format_config(config: &Config, format: OutputFormat) -> Result<String> {
    format.render(config)
}

/// Render the per-file map with string keys.
pub fn format_file_configs(files: &FileConfigs, format: OutputFormat) -> Result<String> {
    let keyed: BTreeMap<String, &Config> = files
        .iter()
        .map(|(path, config)| (path.to_string_lossy().into_owned(), config))
        .collect();
    format.render(&keyed)
}

/// Render visited files one per line.
pub fn format_file_list(files: &[PathBuf]) -> String {
    let mut out = String::new();
    for file in files {
        out.push_str(&file.to_string_lossy());
        out.push('\n');
    }
    out
}
