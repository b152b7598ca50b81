//! On-disk tile cache.
//!
//! # File Layout
//!
//! ```text
//! {cache_dir}/{hash[0]}/{hash[1]}/{base64url(url)}.png
//! ```
//!
//! See [`cache_path`] for how the hash is derived. Shard directories are
//! created lazily on first write. Writes go through a temporary file and a
//! rename, so a reader never observes a partially written entry.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::OnceCell;
use tracing::{debug, trace, warn};

use super::path::{cache_file_name, cache_path};
use super::types::CacheError;

/// Content cache for tile bytes, keyed by URL.
///
/// Entries never expire. Two concurrent stores of the same URL are allowed;
/// the last rename wins and both write identical bytes.
#[derive(Debug)]
pub struct DiskCache {
    /// Cache directory path.
    root: PathBuf,

    /// Set once the root directory exists. Concurrent first callers all
    /// await the same initialization.
    root_ready: OnceCell<()>,

    /// Suffix counter for temporary file names.
    temp_counter: AtomicU64,
}

impl DiskCache {
    /// Creates a cache rooted at `root`. Nothing is touched on disk until
    /// the first lookup or store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            root_ready: OnceCell::new(),
            temp_counter: AtomicU64::new(0),
        }
    }

    /// Returns the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns where the entry for `url` lives (or would live).
    pub fn path_for(&self, url: &str) -> PathBuf {
        cache_path(&self.root, url)
    }

    async fn ensure_root(&self) -> Result<(), CacheError> {
        self.root_ready
            .get_or_try_init(|| async {
                tokio::fs::create_dir_all(&self.root)
                    .await
                    .map_err(|source| CacheError::CreateRoot {
                        path: self.root.clone(),
                        source,
                    })?;
                debug!(dir = %self.root.display(), "Cache directory ready");
                Ok::<(), CacheError>(())
            })
            .await
            .map(|_| ())
    }

    /// Checks whether `url` is cached.
    ///
    /// Returns the entry path on a hit and `None` on a miss. The entry is not
    /// read; callers load it when they need the bytes.
    pub async fn lookup(&self, url: &str) -> Result<Option<PathBuf>, CacheError> {
        self.ensure_root().await?;

        let path = self.path_for(url);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => {
                trace!(url = url, path = %path.display(), "Cache hit");
                Ok(Some(path))
            }
            Ok(false) => {
                trace!(url = url, "Cache miss");
                Ok(None)
            }
            Err(source) => Err(CacheError::Read { path, source }),
        }
    }

    /// Persists `data` as the entry for `url` and returns its path.
    ///
    /// The shard creation, temp file write and rename run as one blocking
    /// task. Dropping the returned future does not interrupt it, so the
    /// entry is still completed and no temp file is left behind.
    pub async fn store(&self, url: &str, data: &[u8]) -> Result<PathBuf, CacheError> {
        self.ensure_root().await?;

        let path = self.path_for(url);
        let temp_name = format!(
            ".{}.{}.{}.tmp",
            cache_file_name(url),
            std::process::id(),
            self.temp_counter.fetch_add(1, Ordering::Relaxed)
        );
        let data = data.to_vec();
        let bytes = data.len();

        let path = tokio::task::spawn_blocking(move || {
            Self::write_entry_blocking(path, &temp_name, &data)
        })
        .await
        .map_err(|e| CacheError::SpawnError(e.to_string()))??;

        debug!(url = url, bytes, path = %path.display(), "Cached tile");
        Ok(path)
    }

    fn write_entry_blocking(
        path: PathBuf,
        temp_name: &str,
        data: &[u8],
    ) -> Result<PathBuf, CacheError> {
        let shard = match path.parent() {
            Some(shard) => shard.to_path_buf(),
            None => {
                return Err(CacheError::Write {
                    path,
                    source: std::io::Error::from(std::io::ErrorKind::InvalidInput),
                })
            }
        };

        // create_dir_all treats an existing directory as success, including
        // one created concurrently by another store
        std::fs::create_dir_all(&shard).map_err(|source| CacheError::CreateShard {
            path: shard.clone(),
            source,
        })?;

        let temp_path = shard.join(temp_name);
        if let Err(source) = std::fs::write(&temp_path, data) {
            remove_temp(&temp_path);
            return Err(CacheError::Write {
                path: temp_path,
                source,
            });
        }

        if let Err(source) = std::fs::rename(&temp_path, &path) {
            remove_temp(&temp_path);
            return Err(CacheError::Write { path, source });
        }

        Ok(path)
    }

    /// Reads a cached entry.
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, CacheError> {
        tokio::fs::read(path)
            .await
            .map_err(|source| CacheError::Read {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn remove_temp(temp_path: &Path) {
    if let Err(e) = std::fs::remove_file(temp_path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
        }
    }
}
