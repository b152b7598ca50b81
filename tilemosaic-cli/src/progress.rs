//! Terminal progress bars for a mosaic run.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tilemosaic::orchestrator::ProgressReporter;

const BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";

/// Draws one bar for downloading and one for composing, on stderr.
pub struct BarProgress {
    bar: Mutex<Option<ProgressBar>>,
    cached: AtomicUsize,
}

impl BarProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            cached: AtomicUsize::new(0),
        }
    }

    fn start(&self, total: usize, message: &'static str) {
        let bar = make_progress_bar(total as u64);
        bar.set_message(message);
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(previous) = slot.replace(bar) {
                previous.finish();
            }
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                f(bar);
            }
        }
    }
}

impl ProgressReporter for BarProgress {
    fn on_download_start(&self, total: usize) {
        self.start(total, "downloading");
    }

    fn on_tile_fetched(&self, cached: bool) {
        if cached {
            self.cached.fetch_add(1, Ordering::Relaxed);
        }
        self.with_bar(|bar| bar.inc(1));
    }

    fn on_compose_start(&self, total: usize) {
        let cached = self.cached.load(Ordering::Relaxed);
        self.with_bar(|bar| bar.set_message(format!("downloaded ({} from cache)", cached)));
        self.start(total, "composing");
    }

    fn on_tile_composed(&self) {
        self.with_bar(|bar| bar.inc(1));
    }

    fn on_finish(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_with_message("done");
            }
        }
    }
}

fn make_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr_with_hz(10));
    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar.enable_steady_tick(Duration::from_millis(200));
    bar
}
