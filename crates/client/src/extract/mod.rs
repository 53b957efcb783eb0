//! Preview metadata extraction.
//!
//! Two strategies produce a [`PreviewRecord`] from a fetched page:
//!
//! - **Open Graph**: used whenever the page declares any `<meta property>`
//!   tags. Reads `og:title`, `og:url`, `og:image` and `og:description`.
//! - **Fallback**: used otherwise. Takes the document title and the first
//!   non-blank paragraph, and never sets an image.
//!
//! The presence of `image` therefore records which strategy ran, and the
//! renderer relies on it to pick a template variant.

pub mod fallback;
pub mod normalize;
pub mod opengraph;

pub use normalize::to_absolute_url;

use crate::fetch::FetchedPage;
use linkpreview_core::PreviewRecord;

/// The strategy chosen for a page, carrying the record it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStrategy {
    OpenGraph(PreviewRecord),
    Fallback(PreviewRecord),
}

impl ExtractionStrategy {
    /// Pick a strategy for `page` and run it.
    pub fn extract(page: &FetchedPage) -> Self {
        if page.has_properties() {
            Self::OpenGraph(opengraph::extract(page))
        } else {
            Self::Fallback(fallback::extract(page))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenGraph(_) => "opengraph",
            Self::Fallback(_) => "fallback",
        }
    }

    pub fn record(&self) -> &PreviewRecord {
        match self {
            Self::OpenGraph(record) | Self::Fallback(record) => record,
        }
    }

    pub fn into_record(self) -> PreviewRecord {
        match self {
            Self::OpenGraph(record) | Self::Fallback(record) => record,
        }
    }
}
