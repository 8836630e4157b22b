use docsift_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Completion service returned no text")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Crawl failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("No content could be crawled from the URL.")]
    EmptyCrawl,

    #[error("AI failed to generate structured output.")]
    EmptyExtraction,
}

pub type Result<T> = std::result::Result<T, ExtractError>;
