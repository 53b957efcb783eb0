//! The preview record produced by extraction and persisted by the cache.

use serde::{Deserialize, Serialize};

/// Descriptive metadata for one previewed URL.
///
/// Absent fields serialize as explicit `null`s so that cache files always
/// carry the same five keys. `image` is only ever set by the Open Graph
/// extractor, which makes it the discriminator for the rendering variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRecord {
    pub title: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub domain: String,
}

impl PreviewRecord {
    /// Whether the record carries an image, i.e. came from Open Graph tags.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
