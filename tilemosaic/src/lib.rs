//! tilemosaic - Stitch slippy-map tiles into a single image
//!
//! Given a geographic bounding box and a zoom level, the library downloads
//! every Web Mercator tile covering the box (through a persistent disk cache
//! and a polite request throttle), composes them onto one canvas and writes
//! the result as a PNG, JPEG or WebP file.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use tilemosaic::config::MosaicConfig;
//! use tilemosaic::coord::BoundingBox;
//! use tilemosaic::orchestrator::{MosaicOrchestrator, MosaicRequest, NoOpProgress};
//!
//! let config = MosaicConfig::default();
//! let orchestrator = MosaicOrchestrator::from_config(&config)?;
//! let request = MosaicRequest::new(
//!     BoundingBox::new(44.10, 1.00, 43.95, 1.20),
//!     12,
//!     config.base_url(),
//!     "toulouse.png",
//! );
//! let report = orchestrator.run(&request, Arc::new(NoOpProgress)).await?;
//! println!("{}x{} pixels", report.width, report.height);
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod fetch;
pub mod logging;
pub mod mosaic;
pub mod orchestrator;
pub mod pipeline;
pub mod provider;

/// Version of the tilemosaic library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
