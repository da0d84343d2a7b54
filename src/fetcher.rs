use crate::results::{FetchFailure, Page};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::time::Duration;

/// Default per-request timeout, fixed for the whole run
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default user agent presented to crawled sites
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";

/// The transport seam the crawler fetches through.
///
/// Implementations must be safely invokable concurrently across many URLs;
/// per-URL outcomes are reported as values, never panics.
pub trait Fetcher {
    /// Fetch a single URL, following redirects, and return the page at its
    /// final URL or a failure record
    async fn fetch(&self, url: &str) -> Result<Page, FetchFailure>;
}

/// HTTP fetcher backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given run-level timeout and user agent
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US;en;q=0.9"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS), DEFAULT_USER_AGENT)
            .expect("default client configuration is valid")
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::new(url, e.to_string()))?;

        // The response URL is the final one after redirects
        let final_url = response.url().to_string();

        let response = response
            .error_for_status()
            .map_err(|e| FetchFailure::new(url, e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchFailure::new(url, e.to_string()))?;

        Ok(Page::new(final_url, body))
    }
}
