use super::ArticleSource;
use crate::error::SourceError;
use crate::types::{Article, BookmarkSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Articles stored as JSON files in a directory.
///
/// Every `*.json` file holds one article. A file counts as bookmarked after
/// the moment it was last modified.
pub struct LocalArticleSource {
    dir: PathBuf,
    index: Mutex<HashMap<String, PathBuf>>,
}

impl LocalArticleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            index: Mutex::new(HashMap::new()),
        }
    }

    fn index(&self) -> MutexGuard<'_, HashMap<String, PathBuf>> {
        // the map stays consistent even if a holder panicked
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn read_article(path: &Path) -> Result<Article, SourceError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| SourceError::Transport(format!("{}: {e}", path.display())))?;
        Article::from_json(&data)
            .map_err(|e| SourceError::InvalidResponse(format!("{}: {e}", path.display())))
    }
}

#[async_trait]
impl ArticleSource for LocalArticleSource {
    async fn list_bookmarks(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<BookmarkSummary>, SourceError> {
        let io_err =
            |e: std::io::Error| SourceError::Transport(format!("{}: {e}", self.dir.display()));

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(io_err)?;
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let metadata = entry.metadata().await.map_err(io_err)?;
            if !metadata.is_file() {
                continue;
            }
            let modified: DateTime<Utc> = metadata.modified().map_err(io_err)?.into();
            if since.is_some_and(|since| modified <= since) {
                tracing::debug!(path = %path.display(), "not modified since last sync");
                continue;
            }
            files.push(path);
        }
        files.sort();

        let mut bookmarks = Vec::with_capacity(files.len());
        for path in files {
            let article = Self::read_article(&path).await?;
            bookmarks.push(BookmarkSummary::from(&article));
            self.index().insert(article.id, path);
        }
        Ok(bookmarks)
    }

    async fn fetch_article(&self, id: &str) -> Result<Article, SourceError> {
        let indexed = self.index().get(id).cloned();
        let path = indexed.unwrap_or_else(|| self.dir.join(format!("{id}.json")));

        match Self::read_article(&path).await {
            Err(SourceError::Transport(_)) if !path.exists() => {
                Err(SourceError::NotFound(id.to_string()))
            }
            result => result,
        }
    }
}
