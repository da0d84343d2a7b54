// Re-export modules
pub mod callbacks;
pub mod config;
pub mod crawlers;
pub mod fetcher;
pub mod filter;
pub mod parsers;
pub mod results;

// Re-export commonly used types for convenience
pub use callbacks::{CallbackRegistry, Predicate, UrlMatcher};
pub use crawlers::Crawler;
pub use fetcher::{Fetcher, HttpFetcher};
pub use filter::{UrlFilter, UrlFilterConfig};
pub use results::{CrawlSummary, FetchFailure, Page};

use crate::config::CrawlerConfig;
use std::error::Error;
use std::time::Duration;

/// Builder for configuring and running one crawl over HTTP.
///
/// ```no_run
/// use linkscope::Crawl;
/// use regex::Regex;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = Crawl::new(["http://example.com/"])
///     .with_max_depth(2)
///     .on(Regex::new(r"/blog/").unwrap(), |page| {
///         println!("{}", page.url);
///         Ok(())
///     })
///     .run()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Crawl {
    seeds: Vec<String>,
    config: CrawlerConfig,
    callbacks: CallbackRegistry,
}

impl Crawl {
    /// Create a new crawl from seed URLs; the scope defaults to wherever
    /// the first seed points
    pub fn new<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let seeds: Vec<String> = seeds.into_iter().map(Into::into).collect();

        let config = match seeds.first().and_then(|seed| filter::scope_of(seed)) {
            Some((domain, subdomain)) => CrawlerConfig::new(&domain, &subdomain),
            None => CrawlerConfig::default(),
        };

        Self {
            seeds,
            config,
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Apply a configuration
    pub fn with_config(mut self, config: CrawlerConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file<P: AsRef<std::path::Path>>(
        mut self,
        path: P,
    ) -> Result<Self, Box<dyn Error>> {
        self.config = CrawlerConfig::from_file(path)?;
        Ok(self)
    }

    /// Apply configuration from a JSON string
    pub fn with_config_str(mut self, json: &str) -> Result<Self, Box<dyn Error>> {
        self.config = CrawlerConfig::from_json(json)?;
        Ok(self)
    }

    /// Override the maximum crawl depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Override the maximum number of concurrent requests
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Restrict followed links to paths matching the given regex patterns
    pub fn follow(mut self, patterns: Vec<String>) -> Self {
        self.config.follow_patterns = patterns;
        self
    }

    /// Register a handler for pages whose final URL matches
    pub fn on<M, H>(mut self, matcher: M, handler: H) -> Self
    where
        M: UrlMatcher + 'static,
        H: FnMut(&Page) -> Result<(), Box<dyn Error>> + 'static,
    {
        self.callbacks.register(matcher, handler);
        self
    }

    /// Run the crawl to completion and return its summary.
    ///
    /// Fails only on a degenerate configuration (no scope domain, an
    /// invalid follow pattern, an unbuildable HTTP client); individual
    /// fetch failures are recorded in the summary instead.
    pub async fn run(self) -> Result<CrawlSummary, Box<dyn Error>> {
        if self.config.domain.is_empty() {
            return Err("crawl scope domain is not configured".into());
        }

        let url_filter = UrlFilter::new(self.config.filter_config())?;
        let http_fetcher = HttpFetcher::new(
            Duration::from_secs(self.config.request_timeout_secs),
            &self.config.user_agent,
        )?;

        let mut crawler = Crawler::new(http_fetcher, url_filter)
            .with_max_concurrency(self.config.max_concurrency)
            .with_callbacks(self.callbacks);

        Ok(crawler.run(self.seeds, self.config.max_depth).await)
    }
}
