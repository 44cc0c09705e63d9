//! Cover image synthesis
//!
//! A cover is a fixed-size grayscale PNG: the service logo centred near the
//! top, and the article title below it, wrapped on word boundaries.

mod wrap;

pub use wrap::wrap_title;

use crate::error::ConversionError;
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::io::Cursor;
use std::path::Path;

pub const COVER_WIDTH: u32 = 760;
pub const COVER_HEIGHT: u32 = 900;
pub const LOGO_WIDTH: u32 = 320;
pub const LOGO_HEIGHT: u32 = 250;
pub const LOGO_TOP: u32 = 100;

/// Gap between the logo and the first title baseline
const TITLE_GAP: u32 = 100;
/// Horizontal room kept free around the title
const TITLE_MARGIN: u32 = 60;
const TITLE_LEFT: i32 = 10;
const LINE_GUTTER: f32 = 10.0;
const FONT_SIZE: f32 = 65.0;

/// DejaVu Serif Bold Italic, see assets/DejaVu-LICENSE.txt
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSerif-BoldItalic.ttf");

/// Renders article covers
pub struct CoverRenderer {
    logo: Option<DynamicImage>,
    font: FontArc,
}

impl CoverRenderer {
    /// Renderer using the bundled font and no logo
    pub fn new() -> Result<Self, ConversionError> {
        let font = FontArc::try_from_slice(BUNDLED_FONT)
            .map_err(|e| ConversionError::InvalidFont(e.to_string()))?;
        Ok(Self { logo: None, font })
    }

    /// Replace the title font with a TrueType/OpenType font file's content
    pub fn with_font_bytes(mut self, bytes: Vec<u8>) -> Result<Self, ConversionError> {
        self.font =
            FontArc::try_from_vec(bytes).map_err(|e| ConversionError::InvalidFont(e.to_string()))?;
        Ok(self)
    }

    /// Use the given encoded image as logo.
    ///
    /// Undecodable data leaves the renderer without logo.
    pub fn with_logo_bytes(mut self, bytes: &[u8]) -> Self {
        match image::load_from_memory(bytes) {
            Ok(logo) => self.logo = Some(fit_logo(logo)),
            Err(e) => {
                tracing::warn!(error = %e, "cover logo cannot be decoded, covers disabled");
                self.logo = None;
            }
        }
        self
    }

    /// Load the logo from a file; a missing or invalid file disables covers
    pub fn with_logo_file(self, path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => self.with_logo_bytes(&bytes),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cover logo not found, covers disabled");
                Self { logo: None, ..self }
            }
        }
    }

    /// Whether covers can be rendered
    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    /// Lines the title is drawn on
    pub fn layout(&self, title: &str) -> Vec<String> {
        let scale = PxScale::from(FONT_SIZE);
        wrap_title(title, COVER_WIDTH - TITLE_MARGIN, |text| {
            text_size(scale, &self.font, text).0
        })
    }

    /// Render the cover for `title` as PNG.
    ///
    /// Returns `Ok(None)` when no logo is available, in which case the package
    /// gets no cover at all.
    pub fn render(&self, title: &str) -> Result<Option<Vec<u8>>, ConversionError> {
        let Some(logo) = &self.logo else {
            return Ok(None);
        };

        let mut canvas = RgbaImage::from_pixel(COVER_WIDTH, COVER_HEIGHT, Rgba([255, 255, 255, 255]));
        imageops::overlay(
            &mut canvas,
            &logo.to_rgba8(),
            i64::from((COVER_WIDTH - LOGO_WIDTH) / 2),
            i64::from(LOGO_TOP),
        );

        let scale = PxScale::from(FONT_SIZE);
        let metrics = self.font.as_scaled(scale);
        let line_height = metrics.height() + metrics.line_gap();

        let mut baseline = (LOGO_TOP + LOGO_HEIGHT + TITLE_GAP) as f32;
        for line in self.layout(title) {
            let top = (baseline - metrics.ascent()).round() as i32;
            draw_text_mut(
                &mut canvas,
                Rgba([0, 0, 0, 255]),
                TITLE_LEFT,
                top,
                scale,
                &self.font,
                &line,
            );
            baseline += line_height + LINE_GUTTER;
        }

        let gray = DynamicImage::ImageRgba8(canvas).into_luma8();
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(gray)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ConversionError::CoverFailed(e.to_string()))?;

        Ok(Some(bytes))
    }
}

/// Scale the logo to its fixed footprint
fn fit_logo(logo: DynamicImage) -> DynamicImage {
    if logo.width() == LOGO_WIDTH && logo.height() == LOGO_HEIGHT {
        logo
    } else {
        logo.resize_exact(LOGO_WIDTH, LOGO_HEIGHT, imageops::FilterType::Triangle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn logo_png(width: u32, height: u32) -> Vec<u8> {
        let logo = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(logo)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_no_logo_means_no_cover() {
        let renderer = CoverRenderer::new().unwrap();
        assert!(!renderer.has_logo());
        assert!(renderer.render("Title").unwrap().is_none());
    }

    #[test]
    fn test_invalid_logo_disables_cover() {
        let renderer = CoverRenderer::new().unwrap().with_logo_bytes(b"not an image");
        assert!(renderer.render("Title").unwrap().is_none());
    }

    #[test]
    fn test_missing_logo_file_disables_cover() {
        let renderer = CoverRenderer::new()
            .unwrap()
            .with_logo_file(Path::new("/nonexistent/cover_logo.png"));
        assert!(!renderer.has_logo());
    }

    #[test]
    fn test_render_produces_cover_sized_png() {
        let renderer = CoverRenderer::new()
            .unwrap()
            .with_logo_bytes(&logo_png(LOGO_WIDTH, LOGO_HEIGHT));

        let png = renderer.render("A Very Long Example Title About Testing").unwrap().unwrap();
        let cover = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();

        assert_eq!(cover.dimensions(), (COVER_WIDTH, COVER_HEIGHT));
        let gray = cover.to_luma8();
        // background, logo and title
        assert_eq!(gray.get_pixel(5, 5).0[0], 255);
        assert_eq!(gray.get_pixel(COVER_WIDTH / 2, LOGO_TOP + LOGO_HEIGHT / 2).0[0], 0);
        let title_band = (LOGO_TOP + LOGO_HEIGHT + 40)..(LOGO_TOP + LOGO_HEIGHT + TITLE_GAP + 20);
        let inked = title_band
            .flat_map(|y| (0..COVER_WIDTH).map(move |x| (x, y)))
            .any(|(x, y)| gray.get_pixel(x, y).0[0] < 128);
        assert!(inked, "title text should be drawn below the logo");
    }

    #[test]
    fn test_logo_is_scaled_to_footprint() {
        let renderer = CoverRenderer::new().unwrap().with_logo_bytes(&logo_png(64, 50));
        let png = renderer.render("x").unwrap().unwrap();
        let gray = image::load_from_memory(&png).unwrap().to_luma8();

        let left = (COVER_WIDTH - LOGO_WIDTH) / 2;
        assert_eq!(gray.get_pixel(left + 2, LOGO_TOP + 2).0[0], 0);
        assert_eq!(gray.get_pixel(left + LOGO_WIDTH - 3, LOGO_TOP + LOGO_HEIGHT - 3).0[0], 0);
        assert_eq!(gray.get_pixel(left - 5, LOGO_TOP + 2).0[0], 255);
    }

    #[test]
    fn test_short_title_layout_is_one_line() {
        let renderer = CoverRenderer::new().unwrap();
        assert_eq!(renderer.layout("Hello"), vec!["Hello"]);
    }

    #[test]
    fn test_long_title_layout_wraps_without_splitting_words() {
        let renderer = CoverRenderer::new().unwrap();
        let words = vec!["Extraordinarily"; 50];
        let title = words.join(" ");

        let lines = renderer.layout(&title);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.split(' ').all(|w| w == "Extraordinarily"));
        }
        let total: usize = lines.iter().map(|l| l.split(' ').count()).sum();
        assert_eq!(total, 50);
    }

    #[test]
    fn test_custom_font_rejects_garbage() {
        let result = CoverRenderer::new().unwrap().with_font_bytes(b"nope".to_vec());
        assert!(matches!(result, Err(ConversionError::InvalidFont(_))));
    }
}
