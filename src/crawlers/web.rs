use crate::callbacks::{CallbackRegistry, UrlMatcher};
use crate::fetcher::Fetcher;
use crate::filter::UrlFilter;
use crate::parsers;
use crate::results::{CrawlSummary, FetchFailure, Page};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::error::Error;
use url::Url;

/// Default bound on in-flight fetches within one batch
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Depth-synchronized breadth-first crawler.
///
/// Each depth round fetches the whole frontier concurrently, waits for
/// every fetch to resolve, then extracts and filters links into the next
/// frontier and dispatches the fetched pages to registered callbacks.
/// The crawler owns its `UrlFilter` (and with it the seen-set) for the
/// duration of the run, so no locking is needed anywhere.
pub struct Crawler<F: Fetcher> {
    fetcher: F,
    filter: UrlFilter,
    callbacks: CallbackRegistry,
    max_concurrency: usize,
}

impl<F: Fetcher> Crawler<F> {
    /// Create a crawler around a fetcher and the filter that scopes the run
    pub fn new(fetcher: F, filter: UrlFilter) -> Self {
        Self {
            fetcher,
            filter,
            callbacks: CallbackRegistry::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Bound the number of fetches in flight within one batch
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Install a pre-built callback registry
    pub fn with_callbacks(mut self, callbacks: CallbackRegistry) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Register a handler for pages whose final URL matches
    pub fn on<M, H>(&mut self, matcher: M, handler: H)
    where
        M: UrlMatcher + 'static,
        H: FnMut(&Page) -> Result<(), Box<dyn Error>> + 'static,
    {
        self.callbacks.register(matcher, handler);
    }

    /// The filter owned by this crawler, mostly useful to inspect the
    /// seen-set after a run
    pub fn filter(&self) -> &UrlFilter {
        &self.filter
    }

    /// Fetch a batch of URLs concurrently.
    ///
    /// Every input URL resolves to exactly one outcome; a failed fetch is
    /// recorded and never aborts or delays its siblings.
    pub async fn scrape(&self, urls: &[String]) -> (Vec<Page>, Vec<FetchFailure>) {
        ::log::info!("scraping {} urls", urls.len());

        let outcomes: Vec<Result<Page, FetchFailure>> = stream::iter(urls)
            .map(|url| self.fetcher.fetch(url))
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let mut pages = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(page) => pages.push(page),
                Err(failure) => {
                    ::log::warn!("fetch failed: {}", failure);
                    failures.push(failure);
                }
            }
        }
        (pages, failures)
    }

    /// Extract, absolutize and filter the links of a fetched batch into
    /// the next frontier.
    ///
    /// Hrefs are resolved against each page's final URL; duplicates across
    /// pages collapse before filtering.
    pub fn parse(&mut self, pages: &[Page]) -> Vec<String> {
        let mut unique = HashSet::new();
        let mut candidates = Vec::new();

        for page in pages {
            let Ok(base) = Url::parse(&page.url) else {
                continue;
            };
            for href in parsers::extract_links(&page.body) {
                let Ok(resolved) = base.join(href.trim()) else {
                    continue;
                };
                let absolute = String::from(resolved);
                if unique.insert(absolute.clone()) {
                    candidates.push(absolute);
                }
            }
        }

        let urls_to_follow = self.filter.filter(candidates);
        ::log::info!(
            "found {} urls to follow (from total {})",
            urls_to_follow.len(),
            unique.len()
        );
        urls_to_follow
    }

    /// Run registered callbacks against every fetched page
    fn dispatch(&mut self, pages: &[Page]) {
        for page in pages {
            self.callbacks.dispatch(page);
        }
    }

    /// Crawl from the seeds to the maximum depth or until no more URLs
    /// are found.
    ///
    /// Seeds pass through the filter first, so malformed or out-of-scope
    /// seeds are silently excluded rather than fetched. No fetch for depth
    /// d+1 starts before every fetch for depth d has resolved.
    pub async fn run(&mut self, seeds: Vec<String>, max_depth: usize) -> CrawlSummary {
        let mut summary = CrawlSummary::default();
        let mut url_pool = self.filter.filter(seeds);
        let mut depth = 0;

        while !url_pool.is_empty() && depth <= max_depth {
            let (pages, failures) = self.scrape(&url_pool).await;
            ::log::info!(
                "depth {}: scraped {} pages and failed {}",
                depth,
                pages.len(),
                failures.len()
            );

            summary.rounds += 1;
            summary.pages += pages.len();
            summary.failures += failures.len();

            url_pool = self.parse(&pages);
            self.dispatch(&pages);
            depth += 1;
        }

        summary
    }
}
