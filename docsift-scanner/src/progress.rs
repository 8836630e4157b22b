//! Progress and diagnostics sink shared by the crawler and the extractor.
//!
//! Callers inject an implementation so the library never talks to a terminal
//! or UI directly.

use tracing::{error, info, warn};

pub trait ProgressReporter: Send + Sync {
    /// Fraction of the page budget used so far, in `[0, 1]`.
    fn on_progress(&self, fraction: f64);

    /// The URL or step currently being processed.
    fn on_status(&self, message: &str);

    /// A recoverable failure, e.g. one page that could not be fetched.
    fn on_warning(&self, message: &str);

    /// A failure the user should see, e.g. an unparseable model reply.
    fn on_error(&self, message: &str);
}

/// Discards every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_progress(&self, _fraction: f64) {}
    fn on_status(&self, _message: &str) {}
    fn on_warning(&self, _message: &str) {}
    fn on_error(&self, _message: &str) {}
}

/// Routes every signal into `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn on_progress(&self, fraction: f64) {
        info!(progress = fraction, "Crawl progress");
    }

    fn on_status(&self, message: &str) {
        info!("{}", message);
    }

    fn on_warning(&self, message: &str) {
        warn!("{}", message);
    }

    fn on_error(&self, message: &str) {
        error!("{}", message);
    }
}
