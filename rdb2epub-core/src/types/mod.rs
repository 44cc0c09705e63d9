//! Core types shared by the document assembly pipeline

mod article;
mod image;
mod package;
mod resource;
mod sync_state;

pub use article::{Article, BookmarkSummary};
pub use image::{FetchedImage, ImageReference, IMAGE_DIR};
pub use package::EpubPackage;
pub use resource::{mime_from_path, Resource, XhtmlDocument};
pub use sync_state::{SyncState, WATERMARK_FORMAT};
