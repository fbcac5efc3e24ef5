//! Command-line interface module.

mod args;
pub mod build;
pub mod convert;

pub use args::{BuildArgs, Cli, Commands, ConvertArgs};

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::{LlmsConfig, find_config_file};

/// Load `llmstxt.toml`, searching upward from the working directory.
///
/// Returns `Ok(None)` when no config file exists.
pub fn load_config(cli: &Cli) -> Result<Option<LlmsConfig>> {
    match find_config_file(&cli.config) {
        Some(path) => Ok(Some(LlmsConfig::load(&path)?)),
        None => Ok(None),
    }
}

/// Resolve a command-line path against the working directory.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}
