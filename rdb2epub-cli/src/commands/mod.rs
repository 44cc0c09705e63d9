//! CLI command implementations

mod convert;
mod cover;
mod init_config;
mod sync;

pub use convert::convert;
pub use cover::cover;
pub use init_config::init_config;
pub use sync::sync;

use crate::config::AppConfig;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rdb2epub_core::{ArticleOutcome, CoverRenderer, EpubAssembler};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Animated spinner on stderr
fn spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Output directory: flag first, then config
fn output_dir(config: &AppConfig, flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(&config.output.dir))
}

/// Cover renderer from the config, with an optional logo override
fn cover_renderer(config: &AppConfig, logo: Option<&Path>) -> Result<CoverRenderer> {
    let mut renderer = CoverRenderer::new().context("Failed to load bundled cover font")?;

    if !config.cover.font.is_empty() {
        let font = std::fs::read(&config.cover.font)
            .with_context(|| format!("Failed to read font: {}", config.cover.font))?;
        renderer = renderer
            .with_font_bytes(font)
            .with_context(|| format!("Unusable font: {}", config.cover.font))?;
    }

    let logo = logo.unwrap_or_else(|| Path::new(&config.cover.logo));
    Ok(renderer.with_logo_file(logo))
}

fn assembler(config: &AppConfig) -> EpubAssembler {
    EpubAssembler::new().with_language(&config.output.language)
}

/// One-line description of an article outcome
fn describe(outcome: &ArticleOutcome) -> String {
    match outcome {
        ArticleOutcome::Written {
            file_name,
            missing_images: 0,
            ..
        } => format!("wrote {file_name}"),
        ArticleOutcome::Written {
            file_name,
            missing_images,
            ..
        } => format!("wrote {file_name} ({missing_images} image(s) missing)"),
        ArticleOutcome::Skipped { file_name, .. } => {
            format!("skipped {file_name} (already exists)")
        }
        ArticleOutcome::Failed { id, title, error } => {
            format!("failed {id} '{title}': {error}")
        }
    }
}
