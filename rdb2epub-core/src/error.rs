//! Error types for rdb2epub core

use thiserror::Error;

/// Result type alias using Rdb2EpubError
pub type Result<T> = std::result::Result<T, Rdb2EpubError>;

/// Top-level error type for all rdb2epub operations
#[derive(Debug, Error)]
pub enum Rdb2EpubError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors raised by the article source (listing and article retrieval)
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Article not found: {0}")]
    NotFound(String),
}

/// Errors raised while downloading a remote image
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url}: {message}")]
    Transport { url: String, message: String },

    #[error("{url}: HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Errors that occur while parsing article content
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid HTML: {0}")]
    InvalidHtml(String),

    #[error("Invalid article: {0}")]
    InvalidArticle(String),

    #[error("Malformed content: {0}")]
    MalformedContent(String),
}

/// Errors that occur while rendering or encoding the package
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Cover rendering failed: {0}")]
    CoverFailed(String),

    #[error("Invalid font: {0}")]
    InvalidFont(String),
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

impl StorageError {
    /// Classify an I/O error raised for `path`
    pub fn from_io(path: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(format!("{path}: {err}")),
            std::io::ErrorKind::PermissionDenied => {
                StorageError::PermissionDenied(format!("{path}: {err}"))
            }
            _ => StorageError::BackendError(format!("{path}: {err}")),
        }
    }
}
