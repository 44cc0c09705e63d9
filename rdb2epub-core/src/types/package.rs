//! The assembled e-book package, prior to serialization

use super::{Resource, XhtmlDocument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything that goes into one EPUB file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpubPackage {
    /// Book title
    pub title: String,

    /// Ordered authors; always starts with the service name
    pub authors: Vec<String>,

    /// Language code (ISO 639-1)
    pub language: String,

    /// Rendered cover image
    pub cover_image: Option<Resource>,

    /// Cover page embedding the cover image
    pub cover_page: Option<XhtmlDocument>,

    /// The article itself
    pub chapter: XhtmlDocument,

    /// Localized images keyed by package path
    pub images: BTreeMap<String, Resource>,
}

impl EpubPackage {
    /// Add an image; an image already stored at the same path is replaced
    pub fn add_image(&mut self, resource: Resource) {
        self.images.insert(resource.path.clone(), resource);
    }

    /// Whether a cover was added
    pub fn has_cover(&self) -> bool {
        self.cover_image.is_some() && self.cover_page.is_some()
    }

    /// Paths of every member, in the order they are written
    pub fn member_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        if let Some(cover) = &self.cover_image {
            paths.push(cover.path.as_str());
        }
        if let Some(page) = &self.cover_page {
            paths.push(page.href.as_str());
        }
        paths.extend(self.images.keys().map(String::as_str));
        paths.push(self.chapter.href.as_str());
        paths
    }
}
