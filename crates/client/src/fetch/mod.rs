//! HTTP fetch pipeline producing parsed pages.
//!
//! ### URL Canonicalization
//! - Trim whitespace, ensure scheme (default: `https`)
//! - Lowercase host, remove fragments
//! - Preserve query string
//!
//! ### Limits
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)
//! - Request timeout: 20s (configurable)
//!
//! Failures are not retried; they propagate to the caller.

pub mod page;
pub mod url;

use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use page::FetchedPage;
pub use url::{UrlError, canonicalize};

use linkpreview_core::{AppConfig, Error};

/// Capability to fetch and parse a page.
///
/// The resolver only depends on this trait, so tests and embedders can
/// supply pages from anywhere.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and parse it into a page.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, Error>;
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "linkpreview/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: 5,
        }
    }
}

/// HTTP fetch client.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn map_send_error(e: reqwest::Error) -> Error {
        if e.is_timeout() { Error::FetchTimeout(e.to_string()) } else { Error::HttpError(format!("network error: {}", e)) }
    }
}

/// Whether a Content-Type header value denotes an HTML document.
fn is_html(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

#[async_trait::async_trait]
impl Fetcher for FetchClient {
    /// Fetch a URL and parse the HTML body.
    ///
    /// Rejects non-success statuses, non-HTML content types and bodies over
    /// the byte limit.
    async fn fetch(&self, url_str: &str) -> Result<FetchedPage, Error> {
        let start = Instant::now();
        let url = canonicalize(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(content_type) = response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok())
            && !is_html(content_type)
        {
            return Err(Error::NotHtml(format!("{} served {}", url, content_type)));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let bytes = response.bytes().await.map_err(Self::map_send_error)?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(FetchedPage::parse(final_url, String::from_utf8_lossy(&bytes)))
    }
}
