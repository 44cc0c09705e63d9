//! Package members: binary resources and XHTML documents

use serde::{Deserialize, Serialize};

/// A binary resource stored in the package (image, cover)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    /// Path inside the package
    pub path: String,

    /// MIME type (e.g., "image/png")
    pub mime_type: String,

    /// The resource data
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl Resource {
    /// Create a new resource
    pub fn new(path: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Size of the data in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the resource holds no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An XHTML document stored in the package (chapter, cover page)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct XhtmlDocument {
    /// Path inside the package
    pub href: String,

    /// Title shown in the reader's navigation
    pub title: String,

    /// Serialized XHTML
    #[serde(skip)]
    pub content: String,
}

impl XhtmlDocument {
    pub fn new(
        href: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            href: href.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Guess a MIME type from a file name extension
pub fn mime_from_path(path: &str) -> &'static str {
    let name = path.split(['?', '#']).next().unwrap_or(path);
    match name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path("img/z.png"), "image/png");
        assert_eq!(mime_from_path("img/PHOTO.JPG"), "image/jpeg");
        assert_eq!(mime_from_path("img/a.gif?x=1"), "image/gif");
        assert_eq!(mime_from_path("img/noext"), "application/octet-stream");
    }
}
