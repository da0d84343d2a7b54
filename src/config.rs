use crate::fetcher::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::filter::UrlFilterConfig;
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for one crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Registrable domain the crawl is scoped to
    #[serde(default)]
    pub domain: String,

    /// Exact subdomain the crawl is scoped to; empty means the bare domain
    #[serde(default)]
    pub subdomain: String,

    /// Regex patterns a URL path must match to be followed
    #[serde(default)]
    pub follow_patterns: Vec<String>,

    /// Maximum link-following depth from the seeds
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum number of concurrent requests
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds, fixed for the whole run
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User agent presented to crawled sites
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl CrawlerConfig {
    /// Create a configuration scoped to a domain/subdomain pair, with
    /// default values everywhere else
    pub fn new(domain: &str, subdomain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            subdomain: subdomain.to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// The filter configuration slice of this run configuration
    pub fn filter_config(&self) -> UrlFilterConfig {
        UrlFilterConfig {
            domain: self.domain.clone(),
            subdomain: self.subdomain.clone(),
            follow_patterns: self.follow_patterns.clone(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            subdomain: String::new(),
            follow_patterns: Vec::new(),
            max_depth: default_max_depth(),
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Default value for max_depth
fn default_max_depth() -> usize {
    5
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    5
}

/// Default value for request_timeout_secs
fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Default user agent
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_in() {
        let config = CrawlerConfig::from_json(r#"{"domain": "example.com"}"#).unwrap();

        assert_eq!(config.domain, "example.com");
        assert_eq!(config.subdomain, "");
        assert!(config.follow_patterns.is_empty());
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.max_concurrency, 5);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_explicit_values_win() {
        let json = r#"{
            "domain": "example.com",
            "subdomain": "docs",
            "follow_patterns": ["^/guide/"],
            "max_depth": 2,
            "max_concurrency": 16
        }"#;
        let config = CrawlerConfig::from_json(json).unwrap();

        assert_eq!(config.subdomain, "docs");
        assert_eq!(config.follow_patterns, vec!["^/guide/"]);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_concurrency, 16);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(CrawlerConfig::from_json("{nope").is_err());
    }
}
