//! Integration tests for the full mosaic pipeline.
//!
//! These tests drive `MosaicOrchestrator::run` end to end against an
//! in-process tile server:
//! - Grid planning → concurrent fetch → disk cache → compose → encode
//! - Cache reuse across orchestrator instances
//! - Failure handling (no partial output)
//!
//! Run with: `cargo test --test mosaic_integration`

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::{ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;

use tilemosaic::cache::{cache_path, DiskCache};
use tilemosaic::coord::{to_tile_coords, BoundingBox, TileCoord, TileGrid};
use tilemosaic::fetch::{FetchError, TileFetcher};
use tilemosaic::mosaic::BACKGROUND_WHITE;
use tilemosaic::orchestrator::{MosaicError, MosaicOrchestrator, MosaicRequest, NoOpProgress};
use tilemosaic::pipeline::{ConcurrencyLimiter, RequestThrottle};
use tilemosaic::provider::{AsyncHttpClient, ProviderError};

// ============================================================================
// Test Helpers
// ============================================================================

const BASE_URL: &str = "https://tiles.test/";
const TILE_SIZE: u32 = 8;

/// Tile server that renders each tile in a colour derived from its x/y.
#[derive(Clone, Default)]
struct FakeTileServer {
    requests: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<HashMap<String, u16>>>,
}

impl FakeTileServer {
    fn fail(&self, url: &str, status: u16) {
        self.failing.lock().unwrap().insert(url.to_string(), status);
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn tile_color(x: u32, y: u32) -> Rgba<u8> {
    Rgba([(x * 40) as u8, (y * 40) as u8, 200, 255])
}

fn render_tile(x: u32, y: u32) -> Vec<u8> {
    let mut buffer = Vec::new();
    RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, tile_color(x, y))
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// Parses `{BASE_URL}{z}/{x}/{y}.png`.
fn parse_tile_url(url: &str) -> Option<(u32, u32)> {
    let path = url.strip_prefix(BASE_URL)?.strip_suffix(".png")?;
    let mut parts = path.split('/').skip(1);
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some((x, y))
}

impl AsyncHttpClient for FakeTileServer {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(status) = self.failing.lock().unwrap().get(url) {
            return Err(ProviderError::Status {
                status: *status,
                url: url.to_string(),
            });
        }

        let (x, y) = parse_tile_url(url)
            .ok_or_else(|| ProviderError::InvalidResponse(format!("bad url {url}")))?;
        Ok(render_tile(x, y))
    }
}

/// Every `*.tmp` file below `dir`.
fn temp_files(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return found;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            found.extend(temp_files(&path));
        } else if path.extension().is_some_and(|ext| ext == "tmp") {
            found.push(path);
        }
    }
    found
}

fn create_orchestrator(cache_dir: &Path, server: FakeTileServer) -> MosaicOrchestrator<FakeTileServer> {
    MosaicOrchestrator::new(TileFetcher::new(
        server,
        Arc::new(DiskCache::new(cache_dir)),
        Arc::new(ConcurrencyLimiter::new(16, "cache_lookup")),
        Arc::new(RequestThrottle::new(Duration::from_millis(1))),
    ))
}

// Around Toulouse at zoom 10: x 514..=515, y 371..=372
fn toulouse_request(output: &Path) -> MosaicRequest {
    MosaicRequest::new(BoundingBox::new(44.0, 1.0, 44.3, 1.3), 10, BASE_URL, output)
}

// ============================================================================
// Full Pipeline
// ============================================================================

#[tokio::test]
async fn test_mosaic_places_every_tile() {
    let temp_dir = TempDir::new().unwrap();
    let server = FakeTileServer::default();
    let orchestrator = create_orchestrator(&temp_dir.path().join("cache"), server.clone());
    let output = temp_dir.path().join("mosaic.png");
    let request = toulouse_request(&output);

    let top_left = to_tile_coords(44.3, 1.0, 10).unwrap();
    let bottom_right = to_tile_coords(44.0, 1.3, 10).unwrap();

    let report = orchestrator
        .run(&request, Arc::new(NoOpProgress))
        .await
        .unwrap();

    let columns = bottom_right.x - top_left.x + 1;
    let rows = bottom_right.y - top_left.y + 1;
    assert_eq!((report.columns, report.rows), (columns, rows));
    assert_eq!(report.width, columns * TILE_SIZE);
    assert_eq!(report.height, rows * TILE_SIZE);
    assert_eq!(report.tile_count(), (columns * rows) as usize);
    assert_eq!(server.request_count(), report.tile_count());

    let image = image::open(&output).unwrap().to_rgba8();
    for dx in 0..columns {
        for dy in 0..rows {
            let pixel = image.get_pixel(dx * TILE_SIZE + 1, dy * TILE_SIZE + 1);
            assert_eq!(*pixel, tile_color(top_left.x + dx, top_left.y + dy));
        }
    }
}

#[tokio::test]
async fn test_single_point_yields_one_tile() {
    let temp_dir = TempDir::new().unwrap();
    let server = FakeTileServer::default();
    let orchestrator = create_orchestrator(&temp_dir.path().join("cache"), server.clone());
    let output = temp_dir.path().join("point.png");
    let request = MosaicRequest::new(BoundingBox::new(44.0, 1.0, 44.0, 1.0), 10, BASE_URL, &output);

    let report = orchestrator
        .run(&request, Arc::new(NoOpProgress))
        .await
        .unwrap();

    assert_eq!((report.columns, report.rows), (1, 1));
    assert_eq!((report.width, report.height), (TILE_SIZE, TILE_SIZE));
    assert_eq!(server.request_count(), 1);

    let image = image::open(&output).unwrap().to_rgba8();
    assert_ne!(*image.get_pixel(0, 0), BACKGROUND_WHITE);
}

#[tokio::test]
async fn test_jpeg_output() {
    let temp_dir = TempDir::new().unwrap();
    let orchestrator = create_orchestrator(&temp_dir.path().join("cache"), FakeTileServer::default());
    let output = temp_dir.path().join("mosaic.jpg");

    let report = orchestrator
        .run(&toulouse_request(&output), Arc::new(NoOpProgress))
        .await
        .unwrap();

    let image = image::open(&output).unwrap();
    assert_eq!(image.color(), image::ColorType::Rgb8);
    assert_eq!((image.width(), image.height()), (report.width, report.height));
}

// ============================================================================
// Cache Behaviour
// ============================================================================

#[tokio::test]
async fn test_second_run_makes_no_requests() {
    let temp_dir = TempDir::new().unwrap();
    let cache_dir = temp_dir.path().join("cache");
    let output = temp_dir.path().join("mosaic.png");

    let first_server = FakeTileServer::default();
    let first = create_orchestrator(&cache_dir, first_server.clone())
        .run(&toulouse_request(&output), Arc::new(NoOpProgress))
        .await
        .unwrap();
    assert_eq!(first.downloads, first_server.request_count());

    // Fresh orchestrator, same cache directory
    let second_server = FakeTileServer::default();
    let second = create_orchestrator(&cache_dir, second_server.clone())
        .run(&toulouse_request(&output), Arc::new(NoOpProgress))
        .await
        .unwrap();

    assert_eq!(second_server.request_count(), 0);
    assert_eq!(second.cache_hits, first.tile_count());
    assert_eq!(second.downloads, 0);
}

#[tokio::test]
async fn test_cache_layout_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let cache_dir = temp_dir.path().join("cache");
    let orchestrator = create_orchestrator(&cache_dir, FakeTileServer::default());
    let request = MosaicRequest::new(
        BoundingBox::new(44.0, 1.0, 44.0, 1.0),
        10,
        BASE_URL,
        temp_dir.path().join("point.png"),
    );

    orchestrator.run(&request, Arc::new(NoOpProgress)).await.unwrap();

    let tile = TileCoord::new(514, 372, 10);
    let entry = cache_path(&cache_dir, &tile.url(BASE_URL));
    assert!(entry.is_file(), "expected cache entry at {}", entry.display());
    assert_eq!(std::fs::read(&entry).unwrap(), render_tile(514, 372));
}

// ============================================================================
// Failure Handling
// ============================================================================

#[tokio::test]
async fn test_one_failed_tile_fails_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let server = FakeTileServer::default();
    server.fail(&TileCoord::new(515, 371, 10).url(BASE_URL), 429);
    let orchestrator = create_orchestrator(&temp_dir.path().join("cache"), server);
    let output = temp_dir.path().join("mosaic.png");

    let err = orchestrator
        .run(&toulouse_request(&output), Arc::new(NoOpProgress))
        .await
        .unwrap_err();

    match err {
        MosaicError::Fetch(FetchError::Download { source, .. }) => {
            assert!(matches!(source, ProviderError::Status { status: 429, .. }));
        }
        other => panic!("expected download failure, got {other:?}"),
    }
    assert!(!output.exists(), "no partial output may be written");
}

#[tokio::test]
async fn test_failed_tile_is_not_cached() {
    let temp_dir = TempDir::new().unwrap();
    let cache_dir = temp_dir.path().join("cache");
    let failing_url = TileCoord::new(514, 372, 10).url(BASE_URL);
    let server = FakeTileServer::default();
    server.fail(&failing_url, 500);

    let output = temp_dir.path().join("point.png");
    let request = MosaicRequest::new(BoundingBox::new(44.0, 1.0, 44.0, 1.0), 10, BASE_URL, &output);
    assert!(create_orchestrator(&cache_dir, server)
        .run(&request, Arc::new(NoOpProgress))
        .await
        .is_err());

    assert!(!cache_path(&cache_dir, &failing_url).exists());

    // A healthy server fills the gap on the next run
    let report = create_orchestrator(&cache_dir, FakeTileServer::default())
        .run(&request, Arc::new(NoOpProgress))
        .await
        .unwrap();
    assert_eq!(report.downloads, 1);
    assert!(output.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failed_runs_leave_no_temp_files() {
    let temp_dir = TempDir::new().unwrap();
    let bounds = BoundingBox::new(44.0, 1.0, 44.3, 1.3);
    let grid = TileGrid::plan(bounds, 12).unwrap();
    let failing_url = grid.tiles().nth(5).unwrap().url(BASE_URL);

    for run in 0..10 {
        let cache_dir = temp_dir.path().join(format!("cache-{run}"));
        let server = FakeTileServer::default();
        server.fail(&failing_url, 500);
        let orchestrator = MosaicOrchestrator::new(TileFetcher::new(
            server,
            Arc::new(DiskCache::new(&cache_dir)),
            Arc::new(ConcurrencyLimiter::new(16, "cache_lookup")),
            Arc::new(RequestThrottle::new(Duration::ZERO)),
        ));
        let output = temp_dir.path().join(format!("mosaic-{run}.png"));
        let request = MosaicRequest::new(bounds, 12, BASE_URL, &output);

        assert!(orchestrator
            .run(&request, Arc::new(NoOpProgress))
            .await
            .is_err());
        assert!(!output.exists());

        // Stores abandoned by the failed run finish on the blocking pool
        for _ in 0..100 {
            if temp_files(&cache_dir).is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(temp_files(&cache_dir), Vec::<PathBuf>::new());
        assert!(!cache_path(&cache_dir, &failing_url).exists());
    }
}
