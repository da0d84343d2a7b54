use crate::results::Page;
use regex::Regex;
use std::error::Error;

/// Anything that can decide whether a page URL is of interest.
///
/// Regexes and plain predicate closures both qualify, so subscribers are
/// not tied to a single pattern syntax.
pub trait UrlMatcher {
    /// Whether the given (final) page URL matches
    fn matches(&self, url: &str) -> bool;
}

impl UrlMatcher for Regex {
    fn matches(&self, url: &str) -> bool {
        self.is_match(url)
    }
}

/// Adapter turning any predicate closure into a matcher
pub struct Predicate<F>(pub F);

impl<F> UrlMatcher for Predicate<F>
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, url: &str) -> bool {
        (self.0)(url)
    }
}

/// Handler invoked for every page whose final URL matches
pub type Handler = Box<dyn FnMut(&Page) -> Result<(), Box<dyn Error>>>;

/// Ordered list of (matcher, handler) pairs, evaluated per fetched page.
///
/// A page may fire zero, one or many handlers. A handler error is logged
/// and never blocks sibling handlers or later pages.
#[derive(Default)]
pub struct CallbackRegistry {
    entries: Vec<(Box<dyn UrlMatcher>, Handler)>,
}

impl CallbackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler behind a URL matcher; handlers are evaluated in
    /// registration order
    pub fn register<M, H>(&mut self, matcher: M, handler: H)
    where
        M: UrlMatcher + 'static,
        H: FnMut(&Page) -> Result<(), Box<dyn Error>> + 'static,
    {
        self.entries.push((Box::new(matcher), Box::new(handler)));
    }

    /// Run every matching handler against one page
    pub fn dispatch(&mut self, page: &Page) {
        for (matcher, handler) in &mut self.entries {
            if matcher.matches(&page.url) {
                ::log::debug!("found matching callback for {}", page.url);
                if let Err(e) = handler(page) {
                    ::log::error!("callback failed for {}: {}", page.url, e);
                }
            }
        }
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no callbacks have been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
