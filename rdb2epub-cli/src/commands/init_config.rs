//! Init-config command implementation

use crate::config;
use anyhow::Result;
use std::path::PathBuf;

/// Write a default config file to `path`, or to the default location
pub fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => config::default_config_path()?,
    };

    config::init_config(&path, force)?;
    println!("Created {}", path.display());
    Ok(())
}
