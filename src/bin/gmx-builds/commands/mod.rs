//! Command implementations

pub mod completions;
pub mod matrix;
pub mod probe;
pub mod select;

use anyhow::Result;
use gmx_builds::util::config::{load_for, Config};

/// Merged configuration for the current directory.
pub fn load_config() -> Result<Config> {
    let cwd = std::env::current_dir()?;
    Ok(load_for(&cwd))
}
