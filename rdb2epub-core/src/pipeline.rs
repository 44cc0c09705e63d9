//! Synchronization run
//!
//! [`Synchronizer`] drives one batch: list the bookmarks added since the
//! watermark, skip the ones already on disk, and turn every other article
//! into a package. Articles are handled one at a time, in listing order.
//!
//! Listing and article retrieval failures abort the run, leaving the
//! watermark where it was. Anything that goes wrong while building or
//! writing a single package only costs that article.

use crate::assembler::EpubAssembler;
use crate::cover::CoverRenderer;
use crate::encoder::{EpubEncoder, Encoder};
use crate::error::Result;
use crate::images::{ImageFetcher, ImageLocalizer};
use crate::naming::output_file_name;
use crate::sanitize::HtmlSanitizer;
use crate::source::ArticleSource;
use crate::storage::StorageProvider;
use crate::types::{Article, BookmarkSummary, SyncState};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// Callback invoked after each article
pub type ProgressFn = Arc<dyn Fn(&ArticleOutcome) + Send + Sync>;

/// What happened to one article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArticleOutcome {
    /// A package was written
    Written {
        id: String,
        title: String,
        file_name: String,
        /// Images that could not be downloaded
        missing_images: usize,
    },
    /// A package with the same name already exists
    Skipped {
        id: String,
        title: String,
        file_name: String,
    },
    /// The package could not be produced
    Failed {
        id: String,
        title: String,
        error: String,
    },
}

impl ArticleOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Written { id, .. } | Self::Skipped { id, .. } | Self::Failed { id, .. } => id,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Per-article results of a run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub outcomes: Vec<ArticleOutcome>,
}

impl SyncReport {
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Result of a completed run: the report and the watermark to commit
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub report: SyncReport,
    pub state: SyncState,
}

/// Converts bookmarked articles into packages
pub struct Synchronizer {
    source: Arc<dyn ArticleSource>,
    fetcher: Arc<dyn ImageFetcher>,
    storage: Arc<dyn StorageProvider>,
    cover: Option<CoverRenderer>,
    sanitizer: HtmlSanitizer,
    localizer: ImageLocalizer,
    assembler: EpubAssembler,
    encoder: Box<dyn Encoder>,
    progress: Option<ProgressFn>,
}

impl Synchronizer {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        fetcher: Arc<dyn ImageFetcher>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            source,
            fetcher,
            storage,
            cover: None,
            sanitizer: HtmlSanitizer::new(),
            localizer: ImageLocalizer::new(),
            assembler: EpubAssembler::new(),
            encoder: Box::new(EpubEncoder::new()),
            progress: None,
        }
    }

    /// Render covers with `renderer`
    pub fn with_cover(mut self, renderer: CoverRenderer) -> Self {
        self.cover = Some(renderer);
        self
    }

    pub fn with_assembler(mut self, assembler: EpubAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Report every article outcome to `progress` as it happens
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Process every bookmark added since `state`.
    ///
    /// The returned state is `state` advanced to the moment the run started,
    /// so bookmarks added while it was running are listed again next time.
    pub async fn run(&self, state: SyncState) -> Result<SyncOutcome> {
        let started = Utc::now();

        let bookmarks = self.source.list_bookmarks(state.watermark).await?;
        tracing::info!(
            count = bookmarks.len(),
            since = state.since().as_deref().unwrap_or("beginning"),
            "bookmarks listed"
        );

        let mut report = SyncReport::default();
        for bookmark in &bookmarks {
            let outcome = self.sync_bookmark(bookmark).await?;
            self.notify(&outcome);
            report.outcomes.push(outcome);
        }

        tracing::info!(
            written = report.written(),
            skipped = report.skipped(),
            failed = report.failed(),
            "run complete"
        );

        Ok(SyncOutcome {
            report,
            state: state.advance(started),
        })
    }

    /// Turn an article that is already at hand into a package.
    ///
    /// Unless `overwrite` is set, an existing package is left alone.
    pub async fn convert(&self, article: &Article, overwrite: bool) -> ArticleOutcome {
        let file_name = output_file_name(&article.id, &article.title);

        let outcome = if overwrite {
            self.produce(article, file_name).await
        } else {
            match self.check_existing(&BookmarkSummary::from(article), &file_name).await {
                Some(outcome) => outcome,
                None => self.produce(article, file_name).await,
            }
        };
        self.notify(&outcome);
        outcome
    }

    async fn sync_bookmark(&self, bookmark: &BookmarkSummary) -> Result<ArticleOutcome> {
        let file_name = output_file_name(&bookmark.id, &bookmark.title);
        if let Some(outcome) = self.check_existing(bookmark, &file_name).await {
            return Ok(outcome);
        }

        let article = self.source.fetch_article(&bookmark.id).await.map_err(|e| {
            tracing::error!(article = %bookmark.id, error = %e, "article retrieval failed");
            e
        })?;

        Ok(self.produce(&article, file_name).await)
    }

    /// `Some` when the package need not (or cannot) be produced
    async fn check_existing(
        &self,
        bookmark: &BookmarkSummary,
        file_name: &str,
    ) -> Option<ArticleOutcome> {
        match self.storage.exists(file_name).await {
            Ok(false) => None,
            Ok(true) => {
                tracing::info!(article = %bookmark.id, file = file_name, "already synchronized, skipping");
                Some(ArticleOutcome::Skipped {
                    id: bookmark.id.clone(),
                    title: bookmark.title.clone(),
                    file_name: file_name.to_string(),
                })
            }
            Err(e) => {
                tracing::error!(article = %bookmark.id, file = file_name, error = %e, "cannot check output");
                Some(ArticleOutcome::Failed {
                    id: bookmark.id.clone(),
                    title: bookmark.title.clone(),
                    error: e.to_string(),
                })
            }
        }
    }

    async fn produce(&self, article: &Article, file_name: String) -> ArticleOutcome {
        match self.build_and_write(article, &file_name).await {
            Ok(missing_images) => {
                tracing::info!(
                    article = %article.id,
                    title = %article.title,
                    file = %file_name,
                    missing_images,
                    "package written"
                );
                ArticleOutcome::Written {
                    id: article.id.clone(),
                    title: article.title.clone(),
                    file_name,
                    missing_images,
                }
            }
            Err(e) => {
                tracing::error!(
                    article = %article.id,
                    title = %article.title,
                    error = %e,
                    "article conversion failed"
                );
                ArticleOutcome::Failed {
                    id: article.id.clone(),
                    title: article.title.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Build the package and store it; returns the number of missing images
    async fn build_and_write(&self, article: &Article, file_name: &str) -> Result<usize> {
        let references = self.localizer.extract(&article.html_body);
        let rewritten = self.localizer.rewrite(&article.html_body, &references);
        let chapter = self.sanitizer.sanitize(&article.title, &rewritten)?;

        let downloaded = self
            .localizer
            .download(self.fetcher.as_ref(), &article.id, &references)
            .await;
        let missing_images = downloaded.failed.len();

        let cover = match &self.cover {
            Some(renderer) => renderer.render(&article.title).unwrap_or_else(|e| {
                tracing::warn!(article = %article.id, error = %e, "cover rendering failed, omitting cover");
                None
            }),
            None => None,
        };

        let package = self
            .assembler
            .build(article, chapter, downloaded.resources, cover);
        let bytes = self.encoder.encode_to_vec(&package)?;
        self.storage.write(file_name, bytes).await?;

        Ok(missing_images)
    }

    fn notify(&self, outcome: &ArticleOutcome) {
        if let Some(progress) = &self.progress {
            progress(outcome);
        }
    }
}
