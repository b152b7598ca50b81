//! Progress callbacks for a mosaic run.

/// Receives progress events from [`MosaicOrchestrator`](super::MosaicOrchestrator).
///
/// Fetch events arrive from concurrently polled futures and compose events
/// from a blocking worker thread, so implementations must be `Send + Sync`.
pub trait ProgressReporter: Send + Sync {
    /// Called once the grid is planned, with the number of tiles to fetch.
    fn on_download_start(&self, total: usize);

    /// Called as each tile resolves; `cached` is false when it was downloaded.
    fn on_tile_fetched(&self, cached: bool);

    /// Called before the first tile is composed.
    fn on_compose_start(&self, total: usize);

    fn on_tile_composed(&self);

    /// Called after the output file has been written.
    fn on_finish(&self);
}

/// Reporter that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn on_download_start(&self, _total: usize) {}
    fn on_tile_fetched(&self, _cached: bool) {}
    fn on_compose_start(&self, _total: usize) {}
    fn on_tile_composed(&self) {}
    fn on_finish(&self) {}
}
