//! Image localization
//!
//! Remote images referenced by an article are downloaded into the package
//! and the article HTML is rewritten to point at the package copies.

mod fetch;

pub use fetch::{HttpImageFetcher, ImageFetcher};

use crate::types::{ImageReference, Resource};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Result of downloading an article's images
#[derive(Debug, Default)]
pub struct DownloadedImages {
    /// Package members, one per successful download
    pub resources: Vec<Resource>,
    /// Original URLs whose download failed
    pub failed: Vec<String>,
}

/// Finds, downloads and rewrites the images of one article
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageLocalizer;

impl ImageLocalizer {
    pub fn new() -> Self {
        Self
    }

    /// Collect the distinct image sources of `html`, in document order.
    ///
    /// Empty sources and inline `data:` URIs are left alone.
    pub fn extract(&self, html: &str) -> Vec<ImageReference> {
        let fragment = Html::parse_fragment(html);
        let selector = Selector::parse("img[src]").expect("img selector is valid");

        let mut seen = HashSet::new();
        fragment
            .select(&selector)
            .filter_map(|img| img.value().attr("src"))
            .map(str::trim)
            .filter(|src| !src.is_empty() && !src.starts_with("data:"))
            .filter(|src| seen.insert(src.to_string()))
            .map(ImageReference::for_url)
            .collect()
    }

    /// Replace every occurrence of each original URL with its local path.
    ///
    /// This is a plain substring replacement, so the URL is also rewritten
    /// where it appears outside of an `img` tag.
    pub fn rewrite(&self, html: &str, references: &[ImageReference]) -> String {
        let mut rewritten = html.to_string();
        for reference in references {
            rewritten = rewritten.replace(&reference.original_url, &reference.local_path);

            // attribute values are entity-decoded by the parser
            let escaped = reference.original_url.replace('&', "&amp;");
            if escaped != reference.original_url {
                rewritten = rewritten.replace(&escaped, &reference.local_path);
            }
        }
        rewritten
    }

    /// Download every referenced image.
    ///
    /// Failed downloads are logged and reported by URL; the article keeps
    /// pointing at the missing local path.
    pub async fn download(
        &self,
        fetcher: &dyn ImageFetcher,
        article_id: &str,
        references: &[ImageReference],
    ) -> DownloadedImages {
        let mut downloaded = DownloadedImages::default();
        for reference in references {
            match fetcher.fetch(&reference.original_url).await {
                Ok(image) => {
                    tracing::debug!(
                        article = article_id,
                        url = %reference.original_url,
                        bytes = image.data.len(),
                        "image downloaded"
                    );
                    downloaded.resources.push(Resource::new(
                        reference.local_path.clone(),
                        image.mime_type,
                        image.data,
                    ));
                }
                Err(e) => {
                    tracing::warn!(
                        article = article_id,
                        url = %reference.original_url,
                        error = %e,
                        "image download failed, leaving a dangling reference"
                    );
                    downloaded.failed.push(reference.original_url.clone());
                }
            }
        }
        downloaded
    }
}
