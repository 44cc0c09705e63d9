//! EPUB encoder implementation

use crate::error::ConversionError;
use crate::types::EpubPackage;
use epub_builder::{EpubBuilder, EpubContent, EpubVersion, ReferenceType, ZipLibrary};
use std::io::Write;

/// Encoder for EPUB packages, backed by `epub-builder`
pub struct EpubEncoder {
    version: EpubVersion,
}

impl EpubEncoder {
    pub fn new() -> Self {
        Self {
            version: EpubVersion::V30,
        }
    }
}

impl Default for EpubEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn encoding_failed(e: impl std::fmt::Display) -> ConversionError {
    ConversionError::EncodingFailed(e.to_string())
}

impl super::Encoder for EpubEncoder {
    fn encode(&self, package: &EpubPackage, writer: &mut dyn Write) -> Result<(), ConversionError> {
        let zip = ZipLibrary::new()
            .map_err(|e| ConversionError::EncodingFailed(format!("Failed to create zip: {e}")))?;
        let mut builder = EpubBuilder::new(zip).map_err(|e| {
            ConversionError::EncodingFailed(format!("Failed to create EPUB builder: {e}"))
        })?;
        builder.epub_version(self.version);

        builder
            .metadata("title", &package.title)
            .map_err(encoding_failed)?;
        for author in &package.authors {
            builder.metadata("author", author).map_err(encoding_failed)?;
        }
        builder
            .metadata("lang", &package.language)
            .map_err(encoding_failed)?;
        builder
            .metadata("generator", concat!("rdb2epub ", env!("CARGO_PKG_VERSION")))
            .map_err(encoding_failed)?;

        if let Some(cover) = &package.cover_image {
            builder
                .add_cover_image(&cover.path, cover.data.as_slice(), cover.mime_type.as_str())
                .map_err(encoding_failed)?;
        }

        for image in package.images.values() {
            builder
                .add_resource(&image.path, image.data.as_slice(), image.mime_type.as_str())
                .map_err(encoding_failed)?;
        }

        if let Some(page) = &package.cover_page {
            builder
                .add_content(
                    EpubContent::new(&page.href, page.content.as_bytes())
                        .reftype(ReferenceType::Cover),
                )
                .map_err(encoding_failed)?;
        }

        let chapter = &package.chapter;
        builder
            .add_content(
                EpubContent::new(&chapter.href, chapter.content.as_bytes())
                    .title(&chapter.title)
                    .reftype(ReferenceType::Text),
            )
            .map_err(encoding_failed)?;

        builder.generate(writer).map_err(encoding_failed)?;

        tracing::debug!(title = %package.title, members = package.member_paths().len(), "package encoded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use crate::types::{Resource, XhtmlDocument};
    use std::collections::BTreeMap;
    use std::io::{Cursor, Read};

    fn package(with_cover: bool) -> EpubPackage {
        let mut package = EpubPackage {
            title: "Sample".to_string(),
            authors: vec!["Readability".to_string(), "Jane Doe".to_string()],
            language: "en".to_string(),
            cover_image: None,
            cover_page: None,
            chapter: XhtmlDocument::new(
                "42.html",
                "Sample",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><head><title>Sample</title></head><body><p><img src="img/a.png" /></p></body></html>"#,
            ),
            images: BTreeMap::new(),
        };
        package.add_image(Resource::new("img/a.png", "image/png", vec![7, 7, 7]));
        if with_cover {
            package.cover_image = Some(Resource::new("cover.png", "image/png", vec![1, 2]));
            package.cover_page = Some(XhtmlDocument::new(
                "cover.html",
                "Sample",
                r#"<html xmlns="http://www.w3.org/1999/xhtml"><body><img src="cover.png" alt="Sample" /></body></html>"#,
            ));
        }
        package
    }

    fn entries(bytes: Vec<u8>) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        zip::ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, suffix: &str) -> String {
        let name = archive
            .file_names()
            .find(|n| n.ends_with(suffix))
            .unwrap_or_else(|| panic!("no entry ending with {suffix}"))
            .to_string();
        let mut content = String::new();
        archive
            .by_name(&name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_encode_writes_all_members() {
        let bytes = EpubEncoder::new().encode_to_vec(&package(true)).unwrap();
        let mut archive = entries(bytes);

        let names: Vec<String> = archive.file_names().map(String::from).collect();
        assert!(names.iter().any(|n| n == "mimetype"));
        for member in ["cover.png", "cover.html", "img/a.png", "42.html"] {
            assert!(
                names.iter().any(|n| n.ends_with(member)),
                "missing {member} in {names:?}"
            );
        }

        let chapter = read_entry(&mut archive, "42.html");
        assert!(chapter.contains(r#"<img src="img/a.png" />"#));
    }

    #[test]
    fn test_encode_records_metadata() {
        let bytes = EpubEncoder::new().encode_to_vec(&package(false)).unwrap();
        let mut archive = entries(bytes);

        let opf = read_entry(&mut archive, "content.opf");
        assert!(opf.contains("Sample"));
        assert!(opf.contains("Readability"));
        assert!(opf.contains("Jane Doe"));
        assert!(opf.contains(">en<"));
    }

    #[test]
    fn test_encode_without_cover() {
        let bytes = EpubEncoder::new().encode_to_vec(&package(false)).unwrap();
        let archive = entries(bytes);

        assert!(!archive.file_names().any(|n| n.ends_with("cover.png")));
        assert!(!archive.file_names().any(|n| n.ends_with("cover.html")));
    }
}
