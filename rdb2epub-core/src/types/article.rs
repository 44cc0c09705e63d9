//! Articles and bookmark listing entries

use crate::error::ParseError;
use serde::{Deserialize, Serialize};

/// A single article as returned by the article source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    /// Remote article identifier
    pub id: String,

    /// Article title
    pub title: String,

    /// Article author, if the source knows one
    #[serde(default)]
    pub author: Option<String>,

    /// Raw HTML body fragment
    #[serde(alias = "content")]
    pub html_body: String,
}

impl Article {
    /// Create a new article without an author
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: None,
            html_body: html_body.into(),
        }
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Author, ignoring blank values
    pub fn author(&self) -> Option<&str> {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Decode an article from its JSON representation
    pub fn from_json(data: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice(data).map_err(|e| ParseError::InvalidArticle(e.to_string()))
    }
}

/// One entry of a bookmark listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkSummary {
    /// Remote article identifier
    pub id: String,

    /// Article title
    pub title: String,
}

impl BookmarkSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

impl From<&Article> for BookmarkSummary {
    fn from(article: &Article) -> Self {
        Self::new(article.id.clone(), article.title.clone())
    }
}
