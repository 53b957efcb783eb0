//! Unified error types for linkpreview.
//!
//! Every variant renders with a stable upper-case code prefix so callers
//! embedding previews can match on failures without parsing prose.

/// Unified error types for link preview resolution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// URL could not be parsed or uses an unsupported scheme.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network failure or non-success HTTP status.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Response was not an HTML document.
    #[error("NOT_HTML: {0}")]
    NotHtml(String),

    /// Cache file could not be read or written.
    #[error("CACHE_ERROR: {0}")]
    Cache(#[from] std::io::Error),

    /// Cache record could not be serialized.
    #[error("CACHE_ERROR: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A custom template exists but could not be read, parsed or rendered.
    #[error("TEMPLATE_ERROR: {0}")]
    Template(String),
}
