//! Tile fetching: cache first, throttled network on a miss.
//!
//! ```text
//! fetch(url)
//!   ├─ gate permit ─► DiskCache::lookup ─► hit ─► return path
//!   └─ miss ─► RequestThrottle::schedule(GET url) ─► DiskCache::store ─► return path
//! ```
//!
//! Cache hits never touch the throttle. Failures are returned as-is; there
//! is no retry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::cache::{CacheError, DiskCache};
use crate::coord::TileCoord;
use crate::pipeline::{ConcurrencyLimiter, RequestThrottle};
use crate::provider::{AsyncHttpClient, ProviderError};

/// Errors that can occur while fetching a single tile.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Cache lookup or write failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Network fetch failed
    #[error("Failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: ProviderError,
    },
}

/// Where a fetched tile's bytes came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Served from the disk cache without a network request
    Cached(PathBuf),
    /// Downloaded and written to the disk cache
    Downloaded(PathBuf),
}

impl FetchOutcome {
    /// Path of the cache entry holding the tile bytes.
    pub fn path(&self) -> &Path {
        match self {
            FetchOutcome::Cached(path) | FetchOutcome::Downloaded(path) => path,
        }
    }

    /// Returns true if no network request was made.
    pub fn was_cached(&self) -> bool {
        matches!(self, FetchOutcome::Cached(_))
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            FetchOutcome::Cached(path) | FetchOutcome::Downloaded(path) => path,
        }
    }
}

/// A grid position paired with its resolved tile content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedTile {
    pub coord: TileCoord,
    pub path: PathBuf,
    pub cached: bool,
}

/// Fetches tiles through the disk cache, the lookup gate and the request
/// throttle.
///
/// The cache, gate and throttle are shared handles: every fetcher built from
/// the same `Arc`s observes the same spacing and the same lookup ceiling.
pub struct TileFetcher<C: AsyncHttpClient> {
    client: C,
    cache: Arc<DiskCache>,
    limiter: Arc<ConcurrencyLimiter>,
    throttle: Arc<RequestThrottle>,
}

impl<C: AsyncHttpClient> TileFetcher<C> {
    pub fn new(
        client: C,
        cache: Arc<DiskCache>,
        limiter: Arc<ConcurrencyLimiter>,
        throttle: Arc<RequestThrottle>,
    ) -> Self {
        Self {
            client,
            cache,
            limiter,
            throttle,
        }
    }

    /// Returns the disk cache used by this fetcher.
    pub fn cache(&self) -> &DiskCache {
        &self.cache
    }

    /// Returns the lookup gate used by this fetcher.
    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Fetches the bytes for `url`, returning the cache entry path.
    #[instrument(level = "trace", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        if let Some(path) = self.limiter.run(self.cache.lookup(url)).await? {
            debug!(url = url, "Get from cache");
            return Ok(FetchOutcome::Cached(path));
        }

        let data = self
            .throttle
            .schedule(|| {
                debug!(url = url, "Get from tile server");
                self.client.get(url)
            })
            .await
            .map_err(|source| FetchError::Download {
                url: url.to_string(),
                source,
            })?;

        let path = self.cache.store(url, &data).await?;
        Ok(FetchOutcome::Downloaded(path))
    }

    /// Fetches the tile at `coord` from a `{base}{z}/{x}/{y}.png` server.
    pub async fn fetch_tile(
        &self,
        base_url: &str,
        coord: TileCoord,
    ) -> Result<FetchedTile, FetchError> {
        let outcome = self.fetch(&coord.url(base_url)).await?;
        let cached = outcome.was_cached();
        Ok(FetchedTile {
            coord,
            path: outcome.into_path(),
            cached,
        })
    }
}
