//! Article sources
//!
//! A source lists the bookmarks added since a point in time and hands out the
//! full article for each of them.

mod local;
mod readability;

pub use local::LocalArticleSource;
pub use readability::{ReadabilityClient, DEFAULT_BASE_URL};

use crate::error::SourceError;
use crate::types::{Article, BookmarkSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Where articles come from
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Unarchived bookmarks added after `since` (all of them when `None`)
    async fn list_bookmarks(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<BookmarkSummary>, SourceError>;

    /// Retrieve one article in full
    async fn fetch_article(&self, id: &str) -> Result<Article, SourceError>;
}
