//! Link preview resolution.
//!
//! Ties the pipeline together for one URL:
//!
//! 1. Look the URL up in the metadata cache.
//! 2. On a miss, fetch the page and extract a record with the strategy the
//!    page supports, then store it (skipped with a warning when the cache
//!    directory is missing).
//! 3. Render the record through the variant its image selects.
//!
//! Fetch failures abort the resolution; nothing is retried.

use crate::extract::ExtractionStrategy;
use crate::fetch::{FetchClient, FetchConfig, Fetcher};
use crate::render::{FileTemplates, RenderContext, TemplateRenderer, site_payload};
use linkpreview_core::{AppConfig, Error, MetadataCache, PreviewRecord};

/// Resolves URLs to rendered preview HTML.
pub struct LinkPreview<F: Fetcher> {
    fetcher: F,
    cache: MetadataCache,
    renderer: TemplateRenderer,
}

impl LinkPreview<FetchClient> {
    /// HTTP fetching, caching in `cache_dir`, custom templates from `template_dir`
    /// and the configured `site` table as template payload.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig::from(config))?;
        let renderer = TemplateRenderer::new()?
            .with_source(FileTemplates::from_config(config))
            .with_payload(site_payload(config)?);
        Ok(Self::new(fetcher, MetadataCache::new(&config.cache_dir), renderer))
    }
}

impl<F: Fetcher> LinkPreview<F> {
    pub fn new(fetcher: F, cache: MetadataCache, renderer: TemplateRenderer) -> Self {
        Self { fetcher, cache, renderer }
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    /// The preview record for `url`, from the cache or freshly extracted.
    pub async fn properties(&self, url: &str) -> Result<PreviewRecord, Error> {
        if let Some(record) = self.cache.lookup(url).await? {
            return Ok(record);
        }

        let page = self.fetcher.fetch(url).await?;
        let strategy = ExtractionStrategy::extract(&page);
        tracing::debug!("extracted {} with {} strategy", url, strategy.name());

        let record = strategy.into_record();
        self.cache.store(url, &record).await?;
        Ok(record)
    }

    /// Render the preview HTML for `url`.
    pub async fn resolve(&self, url: &str) -> Result<String, Error> {
        let record = self.properties(url).await?;
        self.renderer.render(&RenderContext::new(url, &record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchedPage;
    use linkpreview_core::cache::compute_cache_key;
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use url::Url;

    /// Collects the messages of `WARN` events.
    #[derive(Clone, Default)]
    struct WarningLog(Arc<Mutex<Vec<String>>>);

    impl WarningLog {
        fn messages(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for WarningLog {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct Message(String);

            impl Visit for Message {
                fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
                    if field.name() == "message" {
                        self.0 = format!("{value:?}");
                    }
                }
            }

            if *event.metadata().level() == tracing::Level::WARN {
                let mut message = Message(String::new());
                event.record(&mut message);
                self.0.lock().unwrap().push(message.0);
            }
        }
    }

    /// Serves canned HTML and counts fetches.
    #[derive(Default)]
    struct StubFetcher {
        pages: HashMap<String, (String, String)>,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn with_page(mut self, url: &str, final_url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), (final_url.to_string(), html.to_string()));
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (final_url, html) =
                self.pages.get(url).ok_or_else(|| Error::HttpError("status 404".to_string()))?;
            let final_url = Url::parse(final_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
            Ok(FetchedPage::parse(final_url, html.as_str()))
        }
    }

    const OG_HTML: &str = r#"<html><head>
        <title>Ignored</title>
        <meta property="og:title" content="Example">
        <meta property="og:image" content="/img/a.png">
    </head><body><p>Ignored too</p></body></html>"#;

    fn plain_html() -> String {
        format!("<html><head><title>Hello</title></head><body><p> </p><p>{}</p></body></html>", "A".repeat(200))
    }

    fn stub() -> StubFetcher {
        StubFetcher::default()
            .with_page("https://example.com/post", "https://example.com/post", OG_HTML)
            .with_page("https://foo.test/page", "https://foo.test/page", &plain_html())
    }

    fn preview(fetcher: StubFetcher, cache_dir: &std::path::Path) -> LinkPreview<StubFetcher> {
        LinkPreview::new(fetcher, MetadataCache::new(cache_dir), TemplateRenderer::new().unwrap())
    }

    #[tokio::test]
    async fn test_open_graph_page() {
        let dir = TempDir::new().unwrap();
        let lp = preview(stub(), dir.path());

        let record = lp.properties("https://example.com/post").await.unwrap();
        assert_eq!(
            record,
            PreviewRecord {
                title: Some("Example".into()),
                url: None,
                image: Some("https://example.com/img/a.png".into()),
                description: None,
                domain: "example.com".into(),
            }
        );

        let html = lp.resolve("https://example.com/post").await.unwrap();
        assert!(html.contains(r#"<img src="https://example.com/img/a.png" />"#));
    }

    #[tokio::test]
    async fn test_fallback_page() {
        let dir = TempDir::new().unwrap();
        let lp = preview(stub(), dir.path());

        let record = lp.properties("https://foo.test/page").await.unwrap();
        assert_eq!(record.title.as_deref(), Some("Hello"));
        assert_eq!(record.url.as_deref(), Some("https://foo.test/page"));
        assert_eq!(record.description, Some(format!("{}...", "A".repeat(180))));
        assert_eq!(record.image, None);

        let html = lp.resolve("https://foo.test/page").await.unwrap();
        assert!(!html.contains("<img"));
        assert!(html.contains(r#"<a href="https://foo.test/page" target="_blank">Hello</a>"#));
    }

    #[tokio::test]
    async fn test_second_resolution_uses_cache() {
        let dir = TempDir::new().unwrap();
        let lp = preview(stub(), dir.path());

        let first = lp.resolve("https://example.com/post").await.unwrap();
        let second = lp.resolve("https://example.com/post").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(lp.fetcher.calls(), 1);
        assert!(dir.path().join(format!("{}.json", compute_cache_key("https://example.com/post"))).exists());
    }

    #[tokio::test]
    async fn test_cache_survives_new_resolver() {
        let dir = TempDir::new().unwrap();
        preview(stub(), dir.path()).resolve("https://foo.test/page").await.unwrap();

        // A fresh resolver with no pages at all can still render from disk.
        let lp = preview(StubFetcher::default(), dir.path());
        let record = lp.properties("https://foo.test/page").await.unwrap();
        assert_eq!(record.title.as_deref(), Some("Hello"));
        assert_eq!(lp.fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_cache_dir_still_renders() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("_cache");
        let lp = preview(stub(), &missing);

        let html = lp.resolve("https://example.com/post").await.unwrap();
        assert!(html.contains("Example"));
        assert!(!missing.exists());

        lp.resolve("https://example.com/post").await.unwrap();
        assert_eq!(lp.fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_cache_dir_warns_every_time() {
        let warnings = WarningLog::default();
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(warnings.clone()));

        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("_cache");
        let lp = preview(stub(), &missing);

        lp.resolve("https://example.com/post").await.unwrap();
        lp.resolve("https://example.com/post").await.unwrap();

        let expected = format!("'{}' directory does not exist. Create it for caching.", missing.display());
        assert_eq!(warnings.messages(), vec![expected.clone(), expected]);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let lp = preview(stub(), dir.path());

        let result = lp.resolve("https://unknown.test/").await;
        assert!(matches!(result, Err(Error::HttpError(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_refetched() {
        let dir = TempDir::new().unwrap();
        let lp = preview(stub(), dir.path());
        let path = lp.cache().path_for("https://example.com/post");
        std::fs::write(&path, "not json").unwrap();

        let record = lp.properties("https://example.com/post").await.unwrap();
        assert_eq!(record.title.as_deref(), Some("Example"));
        assert_eq!(lp.fetcher.calls(), 1);
        assert_eq!(lp.cache().lookup("https://example.com/post").await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_custom_template_from_config() {
        let dir = TempDir::new().unwrap();
        let includes = dir.path().join("_includes");
        std::fs::create_dir(&includes).unwrap();
        std::fs::write(includes.join("linkpreview_nog.html"), "{{ link_title }} @ {{ link_domain }}").unwrap();

        let config = AppConfig { template_dir: includes, ..Default::default() };
        let renderer = TemplateRenderer::new().unwrap().with_source(FileTemplates::from_config(&config));
        let lp = LinkPreview::new(stub(), MetadataCache::new(dir.path()), renderer);

        let html = lp.resolve("https://foo.test/page").await.unwrap();
        assert_eq!(html, "Hello @ https://foo.test/");
    }

    #[tokio::test]
    async fn test_from_config_builds() {
        let config = AppConfig::default();
        assert!(LinkPreview::from_config(&config).is_ok());
    }
}
