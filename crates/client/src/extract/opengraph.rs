//! Open Graph extraction.

use super::normalize::to_absolute_url;
use crate::fetch::FetchedPage;
use linkpreview_core::PreviewRecord;

/// Build a record from the page's `og:*` properties.
///
/// Only `og:image` is normalized; `og:url` is kept exactly as declared.
pub fn extract(page: &FetchedPage) -> PreviewRecord {
    let owned = |key: &str| page.property(key).map(str::to_string);

    PreviewRecord {
        title: owned("og:title"),
        url: owned("og:url"),
        image: to_absolute_url(page.property("og:image"), &page.root_url()),
        description: owned("og:description"),
        domain: page.host(),
    }
}
