//! Mosaic orchestration implementation

use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use tracing::{info, instrument};

use super::compose::compose_tiles;
use super::progress::ProgressReporter;
use super::types::{MosaicError, MosaicReport, MosaicRequest};
use crate::cache::DiskCache;
use crate::config::MosaicConfig;
use crate::coord::{tile_to_lat_lon, TileCoord, TileGrid};
use crate::fetch::{FetchError, TileFetcher};
use crate::pipeline::{ConcurrencyLimiter, RequestThrottle};
use crate::provider::{AsyncHttpClient, AsyncReqwestClient, ProviderError};

/// Drives a mosaic run: plan the grid, fetch every tile, compose, encode.
pub struct MosaicOrchestrator<C: AsyncHttpClient> {
    fetcher: TileFetcher<C>,
}

impl MosaicOrchestrator<AsyncReqwestClient> {
    /// Builds an orchestrator backed by a real HTTP client, a disk cache at
    /// `config.cache_dir()` and the configured gate and throttle.
    pub fn from_config(config: &MosaicConfig) -> Result<Self, ProviderError> {
        let client = AsyncReqwestClient::with_timeout(config.timeout_secs())?;
        let fetcher = TileFetcher::new(
            client,
            Arc::new(DiskCache::new(config.cache_dir())),
            Arc::new(ConcurrencyLimiter::new(
                config.max_parallel_lookups(),
                "cache_lookup",
            )),
            Arc::new(RequestThrottle::new(config.min_request_interval())),
        );
        Ok(Self::new(fetcher))
    }
}

impl<C: AsyncHttpClient> MosaicOrchestrator<C> {
    pub fn new(fetcher: TileFetcher<C>) -> Self {
        Self { fetcher }
    }

    /// Produces the mosaic described by `request`.
    ///
    /// All tile fetches are started together and polled on this task; the
    /// lookup gate and request throttle are the only limits. The first fetch
    /// failure fails the run and nothing is written.
    #[instrument(
        skip(self, request, progress),
        fields(zoom = request.zoom, output = %request.output.display())
    )]
    pub async fn run(
        &self,
        request: &MosaicRequest,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<MosaicReport, MosaicError> {
        let started = Instant::now();

        let grid = TileGrid::plan(request.bounds, request.zoom)?;
        let (north, west) = tile_to_lat_lon(&TileCoord::new(grid.min_x, grid.min_y, grid.zoom));
        let (south, east) =
            tile_to_lat_lon(&TileCoord::new(grid.max_x + 1, grid.max_y + 1, grid.zoom));
        info!(
            columns = grid.columns(),
            rows = grid.rows(),
            tiles = grid.tile_count(),
            north,
            west,
            south,
            east,
            "Planned tile grid"
        );

        progress.on_download_start(grid.tile_count());
        let reporter = progress.as_ref();
        let base_url = request.base_url.as_str();
        let fetcher = &self.fetcher;
        let tiles = try_join_all(grid.tiles().map(move |coord| async move {
            let tile = fetcher.fetch_tile(base_url, coord).await?;
            reporter.on_tile_fetched(tile.cached);
            Ok::<_, FetchError>(tile)
        }))
        .await?;

        let cache_hits = tiles.iter().filter(|tile| tile.cached).count();
        let downloads = tiles.len() - cache_hits;
        let limiter = self.fetcher.limiter();
        info!(
            cache_hits,
            downloads,
            limiter = limiter.label(),
            peak_lookups = limiter.peak_in_flight(),
            "All tiles fetched"
        );

        let output = request.output.clone();
        let compose_progress = Arc::clone(&progress);
        let composition = tokio::task::spawn_blocking(move || {
            compose_tiles(&tiles, &grid, &output, compose_progress.as_ref())
        })
        .await??;

        progress.on_finish();

        let report = MosaicReport {
            columns: grid.columns(),
            rows: grid.rows(),
            tile_width: composition.tile_width,
            tile_height: composition.tile_height,
            width: composition.width,
            height: composition.height,
            cache_hits,
            downloads,
            skipped_pixels: composition.skipped_pixels,
            output: request.output.clone(),
            output_bytes: composition.output_bytes,
            elapsed: started.elapsed(),
        };

        info!(
            width = report.width,
            height = report.height,
            bytes = report.output_bytes,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Mosaic written"
        );

        Ok(report)
    }
}
