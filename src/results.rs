use serde::{Deserialize, Serialize};

/// A successfully fetched page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Final URL of the page, after any redirects
    pub url: String,

    /// Raw body text of the page
    pub body: String,
}

impl Page {
    /// Create a new page instance
    pub fn new(url: String, body: String) -> Self {
        Self { url, body }
    }
}

/// Record of a single fetch that did not produce a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchFailure {
    /// URL as it was requested
    pub url: String,

    /// Human-readable failure reason (transport or HTTP status)
    pub reason: String,
}

impl FetchFailure {
    /// Create a new failure record
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.url, self.reason)
    }
}

/// Totals accumulated over one crawl run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// Number of scrape/parse rounds performed (one per depth level)
    pub rounds: usize,

    /// Number of pages fetched successfully
    pub pages: usize,

    /// Number of fetches that failed
    pub failures: usize,
}
