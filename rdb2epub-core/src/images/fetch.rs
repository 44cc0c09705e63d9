use crate::error::FetchError;
use crate::types::{mime_from_path, FetchedImage};
use async_trait::async_trait;
use std::time::Duration;

/// Downloads remote images
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Read the whole body behind `url`
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError>;
}

/// reqwest-based image fetcher
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Build a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rdb2epub/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                url: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_ascii_lowercase())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or_else(|| mime_from_path(url).to_string());

        // the response is consumed here, releasing the connection on every path
        let data = response.bytes().await.map_err(transport)?.to_vec();

        Ok(FetchedImage { data, mime_type })
    }
}
