use crate::completion::CompletionService;
use crate::error::PipelineError;
use crate::extract::HierarchyExtractor;
use crate::model::HierarchyResult;
use docsift_scanner::{Crawler, ProgressReporter};
use tracing::info;

/// Crawl `seed`, then extract the hierarchy from whatever was fetched.
///
/// An empty crawl stops the run before the model is called. An empty
/// extraction result is reported and returned as an error so callers can
/// show a terminal failure message.
pub async fn run_pipeline<C: CompletionService>(
    crawler: &Crawler,
    extractor: &HierarchyExtractor<C>,
    seed: &str,
    reporter: &dyn ProgressReporter,
) -> Result<HierarchyResult, PipelineError> {
    reporter.on_status("Crawling documentation pages...");
    let pages = crawler.crawl(seed).await?;

    if pages.is_empty() {
        let err = PipelineError::EmptyCrawl;
        reporter.on_error(&err.to_string());
        return Err(err);
    }

    info!("Crawled {} pages from {}", pages.len(), seed);
    reporter.on_status("Extracting product structure from crawled content...");

    let result = extractor.extract(&pages, seed).await?;

    if result.is_empty() {
        let err = PipelineError::EmptyExtraction;
        reporter.on_error(&err.to_string());
        return Err(err);
    }

    Ok(result)
}
