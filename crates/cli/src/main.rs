//! linkpreview entry point.
//!
//! Renders a preview fragment for every URL given on the command line and
//! prints them to stdout in order. Logging goes to stderr so the output can
//! be redirected straight into a document.

use anyhow::{Context, Result, bail};
use linkpreview_client::LinkPreview;
use linkpreview_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        bail!("usage: linkpreview <url>...");
    }

    let config = AppConfig::load()?;
    tracing::debug!(cache_dir = %config.cache_dir.display(), template_dir = %config.template_dir.display(), "loaded configuration");

    let previews = LinkPreview::from_config(&config)?;
    for url in &urls {
        let html = previews.resolve(url).await.with_context(|| format!("failed to preview {url}"))?;
        println!("{html}");
    }

    Ok(())
}
