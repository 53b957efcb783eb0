//! File-backed cache for extracted preview metadata.
//!
//! One JSON file per previewed URL, named after the MD5 digest of the URL
//! string. The cache is write-once per URL: entries are never refreshed,
//! expired or evicted, and the cache directory is never created here.

pub mod hash;
pub mod store;

pub use crate::Error;

pub use hash::compute_cache_key;
pub use store::{MetadataCache, StoreOutcome};
