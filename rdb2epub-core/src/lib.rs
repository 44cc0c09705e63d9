//! rdb2epub Core Library
//!
//! Turns bookmarked web articles into self-contained EPUB packages: the
//! article HTML is cleaned into XHTML, its remote images are downloaded into
//! the package, a cover is rendered from the title, and the result is written
//! under a deterministic file name. A persisted watermark keeps successive
//! runs incremental.

pub mod assembler;
pub mod cover;
pub mod encoder;
pub mod error;
pub mod images;
pub mod naming;
pub mod pipeline;
pub mod sanitize;
pub mod source;
pub mod storage;
pub mod sync;
pub mod types;

pub use assembler::EpubAssembler;
pub use cover::CoverRenderer;
pub use encoder::{Encoder, EpubEncoder};
pub use error::{
    ConversionError, FetchError, ParseError, Rdb2EpubError, Result, SourceError, StorageError,
};
pub use images::{DownloadedImages, HttpImageFetcher, ImageFetcher, ImageLocalizer};
pub use naming::output_file_name;
pub use pipeline::{ArticleOutcome, SyncOutcome, SyncReport, Synchronizer};
pub use sanitize::HtmlSanitizer;
pub use source::{ArticleSource, LocalArticleSource, ReadabilityClient};
pub use storage::{LocalStorage, MemoryStorage, StorageProvider};
pub use sync::SyncTracker;
pub use types::{
    Article, BookmarkSummary, EpubPackage, FetchedImage, ImageReference, Resource, SyncState,
    XhtmlDocument,
};
