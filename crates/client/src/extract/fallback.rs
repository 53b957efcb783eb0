//! Heuristic extraction for pages without meta properties.

use crate::fetch::FetchedPage;
use linkpreview_core::PreviewRecord;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").expect("invalid selector"));

/// Characters kept from the first paragraph.
const DESCRIPTION_CHARS: usize = 180;
const ELLIPSIS: &str = "...";

/// Build a record from the page title and its first non-blank paragraph.
pub fn extract(page: &FetchedPage) -> PreviewRecord {
    PreviewRecord {
        title: page.title().map(str::to_string),
        url: Some(page.url().to_string()),
        image: None,
        description: Some(description(&page.document())),
        domain: page.root_url(),
    }
}

/// First non-blank paragraph cut to [`DESCRIPTION_CHARS`] characters, plus `...`.
///
/// The suffix is appended even when nothing was cut. Without any paragraph
/// the description is just `...`.
fn description(document: &Html) -> String {
    document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .find(|text| !is_blank(text))
        .map(|text| text.chars().take(DESCRIPTION_CHARS).chain(ELLIPSIS.chars()).collect())
        .unwrap_or_else(|| ELLIPSIS.to_string())
}

// XML whitespace only; a paragraph of non-breaking spaces still counts.
fn is_blank(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}
