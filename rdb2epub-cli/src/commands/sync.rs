//! Sync command implementation

use super::{assembler, cover_renderer, describe, output_dir, spinner};
use crate::config::AppConfig;
use anyhow::{Context, Result};
use rdb2epub_core::{
    ArticleOutcome, ArticleSource, HttpImageFetcher, LocalArticleSource, LocalStorage,
    ReadabilityClient, StorageProvider, SyncTracker, Synchronizer,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Convert every bookmark added since the last run
pub async fn sync(
    config: &AppConfig,
    output: Option<PathBuf>,
    from_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let output = output_dir(config, output);
    let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorage::new(&output));
    let timeout = config.readability.timeout();

    let source: Arc<dyn ArticleSource> = match from_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "reading articles from directory");
            Arc::new(LocalArticleSource::new(dir))
        }
        None => {
            let token = config.readability.token()?;
            Arc::new(
                ReadabilityClient::new(&config.readability.base_url, token, timeout)
                    .context("Failed to set up Readability client")?,
            )
        }
    };
    let fetcher =
        Arc::new(HttpImageFetcher::new(timeout).context("Failed to set up image downloads")?);

    let tracker = SyncTracker::new(storage.clone()).with_marker(&config.output.marker);
    let state = tracker
        .read_watermark()
        .await
        .with_context(|| {
            format!(
                "Failed to read sync marker {} in {}",
                tracker.marker(),
                output.display()
            )
        })?;

    let pb = spinner()?;
    pb.set_message("Listing bookmarks...");
    let progress_pb = pb.clone();

    let synchronizer = Synchronizer::new(source, fetcher, storage)
        .with_cover(cover_renderer(config, None)?)
        .with_assembler(assembler(config))
        .with_progress(Arc::new(move |outcome: &ArticleOutcome| {
            progress_pb.set_message(describe(outcome));
        }));

    let outcome = match synchronizer.run(state).await {
        Ok(outcome) => outcome,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e).context("Synchronization aborted, sync marker left unchanged");
        }
    };
    pb.finish_and_clear();

    tracker
        .commit(&outcome.state)
        .await
        .with_context(|| format!("Failed to update sync marker {}", tracker.marker()))?;

    let report = &outcome.report;
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for article in &report.outcomes {
            println!("{}", describe(article));
        }
        println!(
            "{} written, {} skipped, {} failed",
            report.written(),
            report.skipped(),
            report.failed()
        );
    }

    Ok(())
}
