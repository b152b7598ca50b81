//! Mosaic orchestration
//!
//! Turns a bounding box and zoom level into a single raster file: plans the
//! tile grid, fetches every tile through the cache, composes the tiles onto
//! one canvas and encodes it.

mod compose;
mod mosaic;
mod progress;
mod types;

pub use compose::compose_tiles;
pub use mosaic::MosaicOrchestrator;
pub use progress::{NoOpProgress, ProgressReporter};
pub use types::{Composition, MosaicError, MosaicReport, MosaicRequest};
