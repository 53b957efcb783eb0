//! Parsed view of a fetched HTML page.

use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").expect("invalid selector"));
static META_PROPERTY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[property]").expect("invalid selector"));

/// A fetched page: final URL, title, meta properties and the HTML body.
///
/// The body is kept as text and reparsed on demand by [`FetchedPage::document`]
/// because `scraper::Html` cannot be sent across threads.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    url: Url,
    title: Option<String>,
    properties: HashMap<String, Vec<String>>,
    html: String,
}

impl FetchedPage {
    /// Parse `html` served from `url` (the final URL after redirects).
    ///
    /// Property keys are lowercased; values keep document order.
    pub fn parse(url: Url, html: impl Into<String>) -> Self {
        let html = html.into();
        let document = Html::parse_document(&html);

        let title = document
            .select(&TITLE)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());

        let mut properties: HashMap<String, Vec<String>> = HashMap::new();
        for meta in document.select(&META_PROPERTY) {
            let (Some(property), Some(content)) = (meta.value().attr("property"), meta.value().attr("content")) else {
                continue;
            };
            properties.entry(property.to_lowercase()).or_default().push(content.to_string());
        }

        Self { url, title, properties, html }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Host of the final URL.
    pub fn host(&self) -> String {
        self.url.host_str().unwrap_or_default().to_string()
    }

    /// Scheme, host and port of the final URL with a trailing slash.
    pub fn root_url(&self) -> String {
        format!("{}/", self.url.origin().ascii_serialization())
    }

    /// First value of a meta property such as `og:title`.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    /// Whether the page declares any `<meta property=...>` tags.
    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    /// Parse the body into a queryable document.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> FetchedPage {
        FetchedPage::parse(Url::parse("https://Example.com:8443/posts/1?x=y").unwrap(), html)
    }

    #[test]
    fn test_parse_title() {
        let p = page("<html><head><title>\n  Hello World \n</title></head></html>");
        assert_eq!(p.title(), Some("Hello World"));
    }

    #[test]
    fn test_parse_missing_title() {
        let p = page("<html><head></head><body><p>x</p></body></html>");
        assert_eq!(p.title(), None);
    }

    #[test]
    fn test_properties_first_value_wins() {
        let p = page(
            r#"<head>
                <meta property="og:image" content="/a.png">
                <meta property="OG:Image" content="/b.png">
                <meta property="og:title" content="Example">
                <meta name="description" content="not a property">
            </head>"#,
        );
        assert!(p.has_properties());
        assert_eq!(p.property("og:image"), Some("/a.png"));
        assert_eq!(p.property("og:title"), Some("Example"));
        assert_eq!(p.property("description"), None);
    }

    #[test]
    fn test_meta_without_content_is_skipped() {
        let p = page(r#"<head><meta property="og:title"><meta name="og:title" content="x"></head>"#);
        assert!(!p.has_properties());
    }

    #[test]
    fn test_host_and_root_url() {
        let p = page("<html></html>");
        assert_eq!(p.host(), "example.com");
        assert_eq!(p.root_url(), "https://example.com:8443/");
        assert_eq!(p.url().as_str(), "https://example.com:8443/posts/1?x=y");
    }

    #[test]
    fn test_document_is_queryable() {
        let p = page("<body><p>one</p><p>two</p></body>");
        let selector = Selector::parse("p").unwrap();
        assert_eq!(p.document().select(&selector).count(), 2);
    }
}
