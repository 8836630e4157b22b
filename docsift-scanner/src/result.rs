use serde::{Deserialize, Serialize};

/// A URL waiting in the crawl queue, tagged with the seed's domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: String,
    pub domain: String,
}

impl CrawlTarget {
    pub fn new(url: String, domain: String) -> Self {
        Self { url, domain }
    }
}

/// Normalized text of one successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub text: String,
}

impl PageRecord {
    pub fn new(url: String, text: String) -> Self {
        Self { url, text }
    }

    /// The `SOURCE:`/`CONTENT:` block fed to the extraction prompt.
    pub fn as_context(&self) -> String {
        format!("SOURCE: {}\nCONTENT: {}", self.url, self.text)
    }
}
