//! Content-addressed cache key generation.

use md5::{Digest, Md5};

/// Compute the cache key for a previewed URL.
///
/// MD5 hex of the exact input string, the key format of existing Jekyll
/// `_cache` directories. URLs that differ only by a trailing slash
/// or query order get separate entries.
pub fn compute_cache_key(url: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
