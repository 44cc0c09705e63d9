//! Convert command implementation

use super::{assembler, cover_renderer, describe, output_dir, spinner};
use crate::config::AppConfig;
use anyhow::{bail, Context, Result};
use rdb2epub_core::{
    Article, ArticleOutcome, HttpImageFetcher, LocalArticleSource, LocalStorage, Synchronizer,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Convert one article stored as JSON into a package
pub async fn convert(
    config: &AppConfig,
    input: &Path,
    output: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let data = std::fs::read(input)
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;
    let article = Article::from_json(&data)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    let output = output_dir(config, output);
    let articles_dir = input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let fetcher = Arc::new(
        HttpImageFetcher::new(config.readability.timeout())
            .context("Failed to set up image downloads")?,
    );

    let synchronizer = Synchronizer::new(
        Arc::new(LocalArticleSource::new(articles_dir)),
        fetcher,
        Arc::new(LocalStorage::new(&output)),
    )
    .with_cover(cover_renderer(config, None)?)
    .with_assembler(assembler(config));

    let pb = spinner()?;
    pb.set_message(format!("Converting '{}'...", article.title));
    let outcome = synchronizer.convert(&article, force).await;
    pb.finish_and_clear();

    match &outcome {
        ArticleOutcome::Failed { .. } => bail!("{}", describe(&outcome)),
        ArticleOutcome::Skipped { .. } => {
            println!("{} (use --force to overwrite)", describe(&outcome));
        }
        ArticleOutcome::Written { file_name, .. } => {
            tracing::debug!(path = %output.join(file_name).display(), "package written");
            println!("{}", describe(&outcome));
        }
    }

    Ok(())
}
