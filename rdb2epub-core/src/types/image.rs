//! Image references found in article bodies

use serde::{Deserialize, Serialize};

/// Directory inside the package holding localized images
pub const IMAGE_DIR: &str = "img/";

/// A remote image and the package path it is localized to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageReference {
    /// URL as found in the `src` attribute
    pub original_url: String,

    /// Path of the image inside the package
    pub local_path: String,
}

impl ImageReference {
    /// Build a reference for `url`, using the substring after its last `/`
    /// as file name. Distinct URLs with the same basename share a path.
    pub fn for_url(url: impl Into<String>) -> Self {
        let original_url = url.into();
        let basename = original_url
            .rsplit_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&original_url);
        let local_path = format!("{IMAGE_DIR}{basename}");
        Self {
            original_url,
            local_path,
        }
    }
}

/// Raw bytes of a downloaded image
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}
