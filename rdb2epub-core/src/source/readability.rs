use super::ArticleSource;
use crate::error::SourceError;
use crate::types::{Article, BookmarkSummary, SyncState};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.readability.com/api/rest/v1";

#[derive(Debug, Deserialize)]
struct BookmarkListing {
    #[serde(default)]
    bookmarks: Vec<BookmarkEntry>,
}

#[derive(Debug, Deserialize)]
struct BookmarkEntry {
    article: BookmarkedArticle,
}

#[derive(Debug, Deserialize)]
struct BookmarkedArticle {
    id: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct ArticleBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    content: String,
}

/// Readability reading-list API client.
///
/// Requests carry a pre-obtained token as `Authorization: Bearer`.
pub struct ReadabilityClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ReadabilityClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(concat!("rdb2epub/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, SourceError> {
        tracing::debug!(url, "requesting");
        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SourceError::Transport(format!("{url}: {e}")))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(SourceError::Authentication(format!("{url}: HTTP {status}")));
            }
            StatusCode::NOT_FOUND => return Err(SourceError::NotFound(url.to_string())),
            s if !s.is_success() => {
                return Err(SourceError::Transport(format!("{url}: HTTP {status}")));
            }
            _ => {}
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Transport(format!("{url}: failed to read body: {e}")))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ArticleSource for ReadabilityClient {
    async fn list_bookmarks(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<BookmarkSummary>, SourceError> {
        let url = format!("{}/bookmarks/", self.base_url);
        let query = listing_query(since);
        let body = self.get(&url, &query).await?;
        parse_listing(&body)
    }

    async fn fetch_article(&self, id: &str) -> Result<Article, SourceError> {
        let url = format!("{}/articles/{}", self.base_url, id);
        let body = self.get(&url, &[]).await?;
        parse_article(id, &body)
    }
}

fn listing_query(since: Option<DateTime<Utc>>) -> Vec<(&'static str, String)> {
    let mut query = vec![("archive", "0".to_string())];
    if let Some(since) = since.and_then(|at| SyncState::at(at).since()) {
        query.push(("addedSince", since));
    }
    query
}

fn parse_listing(body: &[u8]) -> Result<Vec<BookmarkSummary>, SourceError> {
    let listing: BookmarkListing = serde_json::from_slice(body)
        .map_err(|e| SourceError::InvalidResponse(format!("bookmark listing: {e}")))?;
    Ok(listing
        .bookmarks
        .into_iter()
        .map(|entry| BookmarkSummary::new(entry.article.id, entry.article.title))
        .collect())
}

fn parse_article(id: &str, body: &[u8]) -> Result<Article, SourceError> {
    let article: ArticleBody = serde_json::from_slice(body)
        .map_err(|e| SourceError::InvalidResponse(format!("article {id}: {e}")))?;
    Ok(Article {
        id: id.to_string(),
        title: article.title,
        author: article.author,
        html_body: article.content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_listing() {
        let body = br#"{
            "meta": {"num_pages": 1},
            "bookmarks": [
                {"id": 9, "article": {"id": "abc123", "title": "First"}},
                {"id": 10, "article": {"id": "def456", "title": "Second"}}
            ]
        }"#;

        let bookmarks = parse_listing(body).unwrap();
        assert_eq!(
            bookmarks,
            vec![
                BookmarkSummary::new("abc123", "First"),
                BookmarkSummary::new("def456", "Second"),
            ]
        );
    }

    #[test]
    fn test_parse_empty_listing() {
        assert!(parse_listing(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_listing_rejects_garbage() {
        let err = parse_listing(b"<html>").unwrap_err();
        assert!(matches!(err, SourceError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_article() {
        let body = br#"{"title": "T", "author": "Jane Doe", "content": "<p>x</p>", "word_count": 1}"#;
        let article = parse_article("abc123", body).unwrap();

        assert_eq!(article.id, "abc123");
        assert_eq!(article.title, "T");
        assert_eq!(article.author(), Some("Jane Doe"));
        assert_eq!(article.html_body, "<p>x</p>");
    }

    #[test]
    fn test_parse_article_null_author() {
        let body = br#"{"title": "T", "author": null, "content": ""}"#;
        assert_eq!(parse_article("1", body).unwrap().author(), None);
    }

    #[test]
    fn test_listing_query() {
        assert_eq!(listing_query(None), vec![("archive", "0".to_string())]);

        let at = Utc.with_ymd_and_hms(2013, 5, 4, 3, 2, 1).unwrap();
        assert_eq!(
            listing_query(Some(at)),
            vec![
                ("archive", "0".to_string()),
                ("addedSince", "20130504T03:02:01".to_string())
            ]
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client =
            ReadabilityClient::new("http://localhost/api/", "t", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost/api");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client =
            ReadabilityClient::new("http://127.0.0.1:9", "t", Duration::from_secs(2)).unwrap();
        let err = client.list_bookmarks(None).await.unwrap_err();
        assert!(matches!(err, SourceError::Transport(_)));
    }
}
