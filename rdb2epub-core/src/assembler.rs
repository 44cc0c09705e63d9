//! Package assembly
//!
//! Turns a sanitized article, its downloaded images and an optional rendered
//! cover into an [`EpubPackage`] ready for encoding.

use crate::sanitize::{escape_attr, escape_text, XHTML_NAMESPACE};
use crate::types::{Article, EpubPackage, Resource, XhtmlDocument};
use std::collections::BTreeMap;

/// First author of every package
pub const SERVICE_AUTHOR: &str = "Readability";

pub const COVER_IMAGE_PATH: &str = "cover.png";
pub const COVER_PAGE_PATH: &str = "cover.html";

const DEFAULT_LANGUAGE: &str = "en";

/// Builds packages from processed articles
#[derive(Debug, Clone)]
pub struct EpubAssembler {
    language: String,
}

impl Default for EpubAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl EpubAssembler {
    pub fn new() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Set the package language (ISO 639-1)
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Compose the package.
    ///
    /// `sanitized_html` is the complete chapter document. Images sharing a
    /// local path collapse to the one inserted last.
    pub fn build(
        &self,
        article: &Article,
        sanitized_html: String,
        images: Vec<Resource>,
        cover: Option<Vec<u8>>,
    ) -> EpubPackage {
        let mut authors = vec![SERVICE_AUTHOR.to_string()];
        if let Some(author) = article.author() {
            authors.push(author.to_string());
        }

        let (cover_image, cover_page) = match cover {
            Some(png) => (
                Some(Resource::new(COVER_IMAGE_PATH, "image/png", png)),
                Some(XhtmlDocument::new(
                    COVER_PAGE_PATH,
                    article.title.clone(),
                    cover_page(&article.title),
                )),
            ),
            None => (None, None),
        };

        let mut package = EpubPackage {
            title: article.title.clone(),
            authors,
            language: self.language.clone(),
            cover_image,
            cover_page,
            chapter: XhtmlDocument::new(
                format!("{}.html", article.id),
                article.title.clone(),
                sanitized_html,
            ),
            images: BTreeMap::new(),
        };

        for image in images {
            package.add_image(image);
        }

        tracing::debug!(
            article = %article.id,
            images = package.images.len(),
            cover = package.has_cover(),
            "package assembled"
        );

        package
    }
}

/// XHTML page showing the cover image
fn cover_page(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="{ns}">
  <head>
    <title>{title}</title>
    <style type="text/css"> img {{ max-width: 100%; }}</style>
  </head>
  <body>
    <div><img src="{src}" alt="{alt}" /></div>
  </body>
</html>
"#,
        ns = XHTML_NAMESPACE,
        title = escape_text(title),
        src = COVER_IMAGE_PATH,
        alt = escape_attr(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Article {
        Article::new("abc123", "Fish & Chips", "<p>x</p>").with_author("Jane Doe")
    }

    #[test]
    fn test_authors_start_with_service() {
        let package = EpubAssembler::new().build(&article(), String::new(), vec![], None);
        assert_eq!(package.authors, vec!["Readability", "Jane Doe"]);
    }

    #[test]
    fn test_blank_author_is_ignored() {
        let article = Article::new("1", "T", "").with_author("  ");
        let package = EpubAssembler::new().build(&article, String::new(), vec![], None);
        assert_eq!(package.authors, vec!["Readability"]);
    }

    #[test]
    fn test_chapter_named_after_article() {
        let package =
            EpubAssembler::new().build(&article(), "<html/>".to_string(), vec![], None);

        assert_eq!(package.chapter.href, "abc123.html");
        assert_eq!(package.chapter.title, "Fish & Chips");
        assert_eq!(package.chapter.content, "<html/>");
        assert_eq!(package.language, "en");
    }

    #[test]
    fn test_no_cover_without_rendered_image() {
        let package = EpubAssembler::new().build(&article(), String::new(), vec![], None);
        assert!(!package.has_cover());
        assert!(package.cover_page.is_none());
    }

    #[test]
    fn test_cover_page_references_cover_image() {
        let package =
            EpubAssembler::new().build(&article(), String::new(), vec![], Some(vec![1, 2, 3]));

        assert!(package.has_cover());
        let image = package.cover_image.unwrap();
        assert_eq!(image.path, "cover.png");
        assert_eq!(image.mime_type, "image/png");

        let page = package.cover_page.unwrap();
        assert_eq!(page.href, "cover.html");
        assert!(page.content.contains(r#"<img src="cover.png" alt="Fish &amp; Chips" />"#));
        assert!(page.content.contains("img { max-width: 100%; }"));
        assert!(page.content.contains("<title>Fish &amp; Chips</title>"));
    }

    #[test]
    fn test_colliding_images_keep_last() {
        let images = vec![
            Resource::new("img/pic.png", "image/png", vec![1]),
            Resource::new("img/pic.png", "image/png", vec![2]),
            Resource::new("img/other.gif", "image/gif", vec![3]),
        ];
        let package = EpubAssembler::new().build(&article(), String::new(), images, None);

        assert_eq!(package.images.len(), 2);
        assert_eq!(package.images["img/pic.png"].data, vec![2]);
    }

    #[test]
    fn test_configured_language() {
        let package = EpubAssembler::new()
            .with_language("de")
            .build(&article(), String::new(), vec![], None);
        assert_eq!(package.language, "de");
    }

    #[test]
    fn test_member_order() {
        let images = vec![Resource::new("img/a.png", "image/png", vec![])];
        let package =
            EpubAssembler::new().build(&article(), String::new(), images, Some(vec![0]));

        insta::assert_debug_snapshot!(package.member_paths(), @r###"
        [
            "cover.png",
            "cover.html",
            "img/a.png",
            "abc123.html",
        ]
        "###);
    }
}
