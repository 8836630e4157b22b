pub mod crawler;
pub mod error;
pub mod filter;
pub mod progress;
pub mod result;
pub mod text;

pub use crawler::{Crawler, CrawlerConfig};
pub use error::ScanError;
pub use filter::is_valid_subpage;
pub use progress::{NoopReporter, ProgressReporter, TracingReporter};
pub use result::{CrawlTarget, PageRecord};
pub use text::normalize_text;
