//! Cover command implementation

use super::cover_renderer;
use crate::config::AppConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Render the cover for `title` into a PNG file
pub fn cover(config: &AppConfig, title: &str, output: &Path, logo: Option<&Path>) -> Result<()> {
    let renderer = cover_renderer(config, logo)?;
    let lines = renderer.layout(title);
    tracing::debug!(lines = lines.len(), "title laid out");

    let png = renderer
        .render(title)
        .context("Failed to render cover")?
        .with_context(|| {
            let logo = logo.unwrap_or_else(|| Path::new(&config.cover.logo));
            format!("No usable cover logo at {}", logo.display())
        })?;

    std::fs::write(output, png)
        .with_context(|| format!("Failed to write cover: {}", output.display()))?;
    println!("wrote {} ({} title line(s))", output.display(), lines.len());

    Ok(())
}
