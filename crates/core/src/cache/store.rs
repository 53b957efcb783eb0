//! Lookup and store operations for cached preview records.

use super::hash::compute_cache_key;
use crate::{Error, PreviewRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Result of a store attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The record was persisted at this path.
    Written(PathBuf),
    /// The cache directory does not exist; nothing was persisted.
    Skipped,
}

/// Metadata cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct MetadataCache {
    dir: PathBuf,
}

impl MetadataCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cache file for `url`: `<dir>/<md5-hex>.json`.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", compute_cache_key(url)))
    }

    /// Look up the cached record for `url`.
    ///
    /// A missing file is a miss. A file that does not parse as a preview
    /// record is logged and also reported as a miss, so the next store
    /// replaces it.
    pub async fn lookup(&self, url: &str) -> Result<Option<PreviewRecord>, Error> {
        let path = self.path_for(url);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("cache miss for {}", url);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<PreviewRecord>(&contents) {
            Ok(record) => {
                tracing::debug!("cache hit for {} ({})", url, path.display());
                Ok(Some(record))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed cache file");
                Ok(None)
            }
        }
    }

    /// Persist `record` for `url` if the cache directory exists.
    ///
    /// The record is written to a sibling temp file and renamed into place,
    /// so readers never observe a partial entry. Concurrent stores for the
    /// same URL are last-write-wins.
    pub async fn store(&self, url: &str, record: &PreviewRecord) -> Result<StoreOutcome, Error> {
        let dir_exists = tokio::fs::metadata(&self.dir).await.map(|m| m.is_dir()).unwrap_or(false);
        if !dir_exists {
            tracing::warn!("'{}' directory does not exist. Create it for caching.", self.dir.display());
            return Ok(StoreOutcome::Skipped);
        }

        let path = self.path_for(url);
        let json = serde_json::to_string(record)?;

        let tmp = path.with_extension(format!(
            "json.{}-{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        tokio::fs::write(&tmp, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!("cached {} at {}", url, path.display());
        Ok(StoreOutcome::Written(path))
    }
}
