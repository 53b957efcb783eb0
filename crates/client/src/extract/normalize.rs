//! URL normalization for extracted fields.

use url::Url;

/// Resolve a root-relative URL against the page's root URL.
///
/// Values not starting with `/` are returned unchanged, as are values the
/// `url` crate cannot join.
pub fn to_absolute_url(value: Option<&str>, root_url: &str) -> Option<String> {
    let value = value?;
    if !value.starts_with('/') {
        return Some(value.to_string());
    }

    match Url::parse(root_url).and_then(|root| root.join(value)) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(e) => {
            tracing::debug!("could not resolve {} against {}: {}", value, root_url, e);
            Some(value.to_string())
        }
    }
}
