//! tilemosaic CLI - Command-line interface
//!
//! Downloads the map tiles covering a bounding box and stitches them into a
//! single image.

mod error;
mod progress;
mod runner;

use clap::Parser;
use error::CliError;
use progress::BarProgress;
use runner::CliRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tilemosaic::coord::{BoundingBox, MAX_ZOOM};
use tilemosaic::orchestrator::{
    MosaicOrchestrator, MosaicReport, MosaicRequest, NoOpProgress, ProgressReporter,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tilemosaic")]
#[command(version, about = "Stitch slippy-map tiles covering a bounding box into one image", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Latitude of the first corner in decimal degrees
    lat_min: f64,

    /// Longitude of the first corner in decimal degrees
    lon_min: f64,

    /// Latitude of the opposite corner in decimal degrees
    lat_max: f64,

    /// Longitude of the opposite corner in decimal degrees
    lon_max: f64,

    /// Zoom level
    #[arg(value_parser = clap::value_parser!(u8).range(0..=MAX_ZOOM as i64))]
    zoom: u8,

    /// Output file; the format follows the extension (.png, .jpg, .webp)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tile server prefix; tiles are fetched from <BASE_URL><z>/<x>/<y>.png
    #[arg(short = 'u', long = "base-url", alias = "baseUrl")]
    base_url: Option<String>,

    /// Directory of the tile cache
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Config file to use instead of ~/.tilemosaic/config.ini
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log to stderr at debug level instead of drawing progress bars
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.verbose)?;
    runner.log_startup();

    // Command-line flags take precedence over the config file
    let mut config = runner.config().mosaic_config();
    if let Some(dir) = args.cache_dir {
        config = config.with_cache_dir(dir);
    }
    if let Some(url) = args.base_url {
        config = config.with_base_url(url);
    }
    let output = args
        .output
        .unwrap_or_else(|| runner.config().output.path.clone());

    let request = MosaicRequest::new(
        BoundingBox::new(args.lat_min, args.lon_min, args.lat_max, args.lon_max),
        args.zoom,
        config.base_url(),
        output,
    );
    info!(
        bounds = ?request.bounds,
        zoom = request.zoom,
        base_url = %request.base_url,
        cache_dir = %config.cache_dir().display(),
        "Starting mosaic"
    );

    let orchestrator = MosaicOrchestrator::from_config(&config).map_err(CliError::Client)?;
    let progress: Arc<dyn ProgressReporter> = if args.verbose {
        Arc::new(NoOpProgress)
    } else {
        Arc::new(BarProgress::new())
    };

    let runtime = runner.runtime()?;
    let report = runtime.block_on(orchestrator.run(&request, progress))?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &MosaicReport) {
    eprintln!(
        "{} x {} tiles ({} cached, {} downloaded) in {:.1}s",
        report.columns,
        report.rows,
        report.cache_hits,
        report.downloads,
        report.elapsed.as_secs_f64()
    );
    eprintln!(
        "{} x {} pixels, {:.2} MB",
        report.width,
        report.height,
        report.output_bytes as f64 / 1_048_576.0
    );
    if report.skipped_pixels > 0 {
        eprintln!(
            "Warning: {} pixels left blank by truncated tiles",
            report.skipped_pixels
        );
    }
    println!("{}", confirmation(&report.output));
}

fn confirmation(output: &Path) -> String {
    format!("Mosaic written: {}", output.display())
}
