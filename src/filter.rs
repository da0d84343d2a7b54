use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// File extensions that are never worth fetching
const IGNORED_EXTENSIONS: &[&str] = &[
    // archives
    "7z", "7zip", "bz2", "rar", "tar", "tar.gz", "xz", "zip",
    // images
    "mng", "pct", "bmp", "gif", "jpg", "jpeg", "png", "pst", "psp", "tif", "tiff", "ai", "drw",
    "dxf", "eps", "ps", "svg", "cdr", "ico",
    // audio
    "mp3", "wma", "ogg", "wav", "ra", "aac", "mid", "au", "aiff",
    // video
    "3gp", "asf", "asx", "avi", "mov", "mp4", "mpg", "qt", "rm", "swf", "wmv", "m4a", "m4v",
    "flv", "webm",
    // office suites
    "xls", "xlsx", "ppt", "pptx", "pps", "doc", "docx", "odt", "ods", "odg", "odp",
    // other
    "css", "pdf", "exe", "bin", "rss", "dmg", "iso", "apk",
];

/// Configuration for URL filtering in crawlers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Registrable domain the crawl is scoped to (e.g. "example.com")
    #[serde(default)]
    pub domain: String,

    /// Exact subdomain the crawl is scoped to; empty means the bare domain only
    #[serde(default)]
    pub subdomain: String,

    /// Regex patterns a URL path must match to be followed (OR-combined);
    /// if empty, all paths are followed
    #[serde(default)]
    pub follow_patterns: Vec<String>,
}

/// URL filter that narrows extracted links down to the in-scope frontier.
///
/// Candidates pass through a fixed predicate chain (scheme, domain,
/// extension, path, novelty) and every accepted URL's canonical form is
/// recorded so it is never accepted again.
#[derive(Debug)]
pub struct UrlFilter {
    config: UrlFilterConfig,
    follow: Vec<Regex>,
    seen: HashSet<String>,
}

impl UrlFilter {
    /// Create a new URL filter from configuration
    pub fn new(config: UrlFilterConfig) -> Result<Self, regex::Error> {
        let mut follow = Vec::with_capacity(config.follow_patterns.len());
        for pattern in &config.follow_patterns {
            follow.push(Regex::new(pattern)?);
        }

        ::log::info!(
            "filter created for domain {}.{} with follow rules {:?}",
            config.subdomain,
            config.domain,
            config.follow_patterns
        );

        Ok(Self {
            config,
            follow,
            seen: HashSet::new(),
        })
    }

    /// Create a filter scoped to a domain/subdomain pair with no path rules
    pub fn scoped(domain: &str, subdomain: &str) -> Self {
        Self::new(UrlFilterConfig {
            domain: domain.to_string(),
            subdomain: subdomain.to_string(),
            follow_patterns: Vec::new(),
        })
        .expect("empty follow rules cannot fail to compile")
    }

    /// Filter a batch of candidate URLs down to the ones worth crawling.
    ///
    /// Accepted URLs are returned in input order, in their original form.
    /// Each acceptance records the canonical form immediately, so
    /// duplicates later in the same batch collapse to the first instance.
    pub fn filter<I>(&mut self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut found = Vec::new();
        for url in candidates {
            if !self.is_valid_scheme(&url) {
                ::log::debug!("drop ignored scheme {}", url);
                continue;
            }
            if !self.is_valid_domain(&url) {
                ::log::debug!("drop domain mismatch {}", url);
                continue;
            }
            if !self.is_valid_ext(&url) {
                ::log::debug!("drop ignored extension {}", url);
                continue;
            }
            if !self.is_valid_path(&url) {
                ::log::debug!("drop ignored path {}", url);
                continue;
            }
            if !self.is_new(&url) {
                ::log::debug!("drop duplicate {}", url);
                continue;
            }
            if let Some(canonical) = canonicalize(&url) {
                self.seen.insert(canonical);
                found.push(url);
            }
        }
        found
    }

    /// Ignore non http/s links
    pub fn is_valid_scheme(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
            Err(_) => false,
        }
    }

    /// Ignore offsite urls
    pub fn is_valid_domain(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        match host_scope(host) {
            Some((domain, subdomain)) => {
                domain == self.config.domain && subdomain == self.config.subdomain
            }
            None => false,
        }
    }

    /// Ignore non-crawlable documents
    pub fn is_valid_ext(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let filename = parsed
            .path()
            .rsplit('/')
            .next()
            .unwrap_or("")
            .to_lowercase();
        !IGNORED_EXTENSIONS
            .iter()
            .any(|ext| filename.ends_with(&format!(".{ext}")))
    }

    /// Ignore urls of undesired paths
    pub fn is_valid_path(&self, url: &str) -> bool {
        if self.follow.is_empty() {
            return true;
        }
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let path = parsed.path();
        self.follow.iter().any(|pattern| pattern.is_match(path))
    }

    /// Ignore visited urls (compared in canonical form)
    pub fn is_new(&self, url: &str) -> bool {
        match canonicalize(url) {
            Some(canonical) => !self.seen.contains(&canonical),
            None => false,
        }
    }

    /// Whether a URL's canonical form has already been accepted
    pub fn has_seen(&self, url: &str) -> bool {
        !self.is_new(url)
    }

    /// Number of distinct URLs accepted so far
    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }
}

/// Reduce a URL to the canonical form used for deduplication.
///
/// Fragments are dropped, query parameters sorted and the trailing slash
/// stripped from non-root paths; the `url` crate already lowercases the
/// scheme and host and strips default ports. The canonical form is only
/// ever compared against the seen-set, never handed back to callers.
pub fn canonicalize(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    parsed.set_fragment(None);

    let mut pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        parsed.set_query(None);
    } else {
        pairs.sort();
        let mut serializer = parsed.query_pairs_mut();
        serializer.clear();
        serializer.extend_pairs(&pairs);
    }

    let path = parsed.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        parsed.set_path(&trimmed);
    }

    Some(parsed.into())
}

/// Derive the (registrable domain, subdomain) scope for a URL, for callers
/// that want to scope a crawl to wherever its first seed points
pub fn scope_of(url: &str) -> Option<(String, String)> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let (domain, subdomain) = host_scope(host)?;
    Some((domain.to_string(), subdomain.to_string()))
}

/// Split a host into its registrable domain and subdomain prefix
fn host_scope(host: &str) -> Option<(&str, &str)> {
    let domain = psl::domain_str(host)?;
    let subdomain = host.strip_suffix(domain)?.trim_end_matches('.');
    Some((domain, subdomain))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped(domain: &str, subdomain: &str) -> UrlFilter {
        UrlFilter::scoped(domain, subdomain)
    }

    #[test]
    fn test_scheme_check() {
        let filter = scoped("example.com", "");

        assert!(filter.is_valid_scheme("http://example.com/"));
        assert!(filter.is_valid_scheme("https://example.com/"));
        assert!(!filter.is_valid_scheme("ftp://example.com/"));
        assert!(!filter.is_valid_scheme("mailto:someone@example.com"));
        assert!(!filter.is_valid_scheme("javascript:void(0)"));
        assert!(!filter.is_valid_scheme("not a url at all"));
        assert!(!filter.is_valid_scheme("/relative/path"));
    }

    #[test]
    fn test_domain_check_is_exact() {
        let filter = scoped("example.com", "");

        assert!(filter.is_valid_domain("http://example.com/page"));
        assert!(!filter.is_valid_domain("http://other.com/page"));
        // An empty subdomain admits only the bare domain, not even "www."
        assert!(!filter.is_valid_domain("http://www.example.com/page"));
        assert!(!filter.is_valid_domain("http://deep.sub.example.com/page"));
    }

    #[test]
    fn test_subdomain_check_is_exact() {
        let filter = scoped("example.com", "docs");

        assert!(filter.is_valid_domain("http://docs.example.com/page"));
        assert!(!filter.is_valid_domain("http://example.com/page"));
        assert!(!filter.is_valid_domain("http://www.docs.example.com/page"));
        assert!(!filter.is_valid_domain("http://docs.other.com/page"));
    }

    #[test]
    fn test_extension_check() {
        let filter = scoped("example.com", "");

        assert!(filter.is_valid_ext("http://example.com/page"));
        assert!(filter.is_valid_ext("http://example.com/page.html"));
        assert!(!filter.is_valid_ext("http://example.com/image.png"));
        assert!(!filter.is_valid_ext("http://example.com/IMAGE.PNG"));
        assert!(!filter.is_valid_ext("http://example.com/archive.tar.gz"));
        assert!(!filter.is_valid_ext("http://example.com/styles.css"));
        assert!(!filter.is_valid_ext("http://example.com/report.pdf"));
        // Extension comes from the path, not the query string
        assert!(filter.is_valid_ext("http://example.com/download?file=x.zip"));
    }

    #[test]
    fn test_path_check() {
        // No follow rules means every path passes
        let open = scoped("example.com", "");
        assert!(open.is_valid_path("http://example.com/anything"));

        let filter = UrlFilter::new(UrlFilterConfig {
            domain: "example.com".to_string(),
            subdomain: String::new(),
            follow_patterns: vec![r"^/blog/".to_string(), r"^/news/".to_string()],
        })
        .unwrap();

        assert!(filter.is_valid_path("http://example.com/blog/post-1"));
        assert!(filter.is_valid_path("http://example.com/news/today"));
        assert!(!filter.is_valid_path("http://example.com/shop/item"));
    }

    #[test]
    fn test_invalid_follow_pattern_is_rejected() {
        let result = UrlFilter::new(UrlFilterConfig {
            domain: "example.com".to_string(),
            subdomain: String::new(),
            follow_patterns: vec![r"(unclosed".to_string()],
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_applies_all_predicates() {
        let mut filter = scoped("ex.com", "");

        let accepted = filter.filter(vec![
            "http://ex.com/a".to_string(),
            "http://ex.com/b".to_string(),
            "http://other.com/x".to_string(),
            "http://ex.com/a.png".to_string(),
            "mailto:admin@ex.com".to_string(),
        ]);

        assert_eq!(accepted, vec!["http://ex.com/a", "http://ex.com/b"]);
        assert_eq!(filter.seen_len(), 2);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let mut filter = scoped("ex.com", "");
        let batch = vec![
            "http://ex.com/a".to_string(),
            "http://ex.com/b".to_string(),
        ];

        let first = filter.filter(batch.clone());
        assert_eq!(first.len(), 2);

        let second = filter.filter(batch);
        assert!(second.is_empty());
    }

    #[test]
    fn test_in_batch_duplicates_collapse() {
        let mut filter = scoped("ex.com", "");

        let accepted = filter.filter(vec![
            "http://ex.com/a".to_string(),
            "http://ex.com/a".to_string(),
            "http://ex.com/a#section".to_string(),
        ]);

        assert_eq!(accepted, vec!["http://ex.com/a"]);
    }

    #[test]
    fn test_canonicalization_insensitivity() {
        let mut filter = scoped("a.com", "");

        let accepted = filter.filter(vec![
            "http://a.com/x?b=1&a=2".to_string(),
            "http://a.com/x?a=2&b=1".to_string(),
        ]);

        // First-seen literal form is the one returned
        assert_eq!(accepted, vec!["http://a.com/x?b=1&a=2"]);
        assert!(filter.has_seen("http://a.com/x?a=2&b=1"));
    }

    #[test]
    fn test_canonicalize_normalizations() {
        assert_eq!(
            canonicalize("HTTP://Example.COM:80/x"),
            canonicalize("http://example.com/x")
        );
        assert_eq!(
            canonicalize("http://a.com/x/"),
            canonicalize("http://a.com/x")
        );
        assert_eq!(
            canonicalize("http://a.com/x#frag"),
            canonicalize("http://a.com/x")
        );
        // Root path is left alone
        assert_eq!(canonicalize("http://a.com/").as_deref(), Some("http://a.com/"));
        assert!(canonicalize("not a url").is_none());
    }

    #[test]
    fn test_scope_of() {
        assert_eq!(
            scope_of("http://docs.example.com/page"),
            Some(("example.com".to_string(), "docs".to_string()))
        );
        assert_eq!(
            scope_of("http://example.com/"),
            Some(("example.com".to_string(), String::new()))
        );
        assert_eq!(scope_of("not a url"), None);
    }
}
