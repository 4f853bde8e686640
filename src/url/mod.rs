//! URL handling for Site-Scout
//!
//! This module owns the URL math for the crawl:
//! - `CrawlTarget`: a parsed target URL with its derived origin and path+query
//! - Proxy rewriting: routing a target through the same-origin proxy while
//!   carrying the original host as a query parameter
//! - Scope canonicalization: folding a discovered link back onto the
//!   original origin with the synthetic host parameter removed

use crate::{UrlError, UrlResult};
use url::Url;

/// Query parameter the proxy uses to carry the original origin
pub const HOST_PARAM: &str = "host";

/// Extensions of non-page resources that are never worth crawling
pub const IGNORED_EXTENSIONS: &[&str] = &[
    "css", "js", "png", "jpg", "jpeg", "webp", "eps", "pdf",
];

/// A URL scheduled for a visit, immutable once enqueued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    url: Url,
}

impl CrawlTarget {
    /// Parses and validates a target URL
    ///
    /// Only absolute http(s) URLs with a host are accepted.
    pub fn new(url_str: &str) -> UrlResult<Self> {
        let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        if url.host_str().is_none() {
            return Err(UrlError::MissingHost);
        }

        Ok(Self { url })
    }

    /// The parsed URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL as a string
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The target's origin, e.g. "https://example.com"
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// The target's path plus query string, e.g. "/page?a=b"
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(q) => format!("{}?{}", self.url.path(), q),
            None => self.url.path().to_string(),
        }
    }
}

impl std::fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.url.fmt(f)
    }
}

/// The two addresses of one target: the remote URL as requested and the
/// proxied URL actually loaded
#[derive(Debug, Clone)]
pub struct ProxySetup {
    /// The original URL, with the `host` parameter appended
    pub remote_url: Url,
    /// The original URL's origin
    pub remote_origin: String,
    /// The proxy-rewritten URL
    pub proxy_url: Url,
    /// The proxy's origin
    pub proxy_origin: String,
}

/// Rewrites a target URL to route through the same-origin proxy
///
/// The original origin travels along as a `host` query parameter (appended
/// only if the URL does not already carry one), and the proxied URL is the
/// proxy origin plus the target's path and query. Relative links on the
/// rendered page thereby resolve against the proxy while the original host
/// stays recoverable.
pub fn proxy_setup(url: &Url, proxy_origin: &str) -> UrlResult<ProxySetup> {
    let remote_origin = url.origin().ascii_serialization();

    let mut remote_url = url.clone();
    let has_host_param = remote_url.query_pairs().any(|(k, _)| k == HOST_PARAM);
    if !has_host_param {
        remote_url
            .query_pairs_mut()
            .append_pair(HOST_PARAM, &remote_origin);
    }

    let src = match remote_url.query() {
        Some(q) => format!(
            "{}{}?{}",
            proxy_origin.trim_end_matches('/'),
            remote_url.path(),
            q
        ),
        None => format!(
            "{}{}",
            proxy_origin.trim_end_matches('/'),
            remote_url.path()
        ),
    };
    let proxy_url = Url::parse(&src).map_err(|e| UrlError::Parse(e.to_string()))?;
    let proxy_origin = proxy_url.origin().ascii_serialization();

    Ok(ProxySetup {
        remote_url,
        remote_origin,
        proxy_url,
        proxy_origin,
    })
}

/// Folds an in-scope candidate link back onto the original origin
///
/// Strips the synthetic `host` parameter and rebuilds the URL as
/// `original_origin + path + remaining query`, the canonical form used for
/// dedup and enqueueing.
pub fn canonicalize_in_scope(candidate: &Url, original_origin: &str) -> UrlResult<String> {
    let mut out = Url::parse(original_origin).map_err(|e| UrlError::Parse(e.to_string()))?;
    out.set_path(candidate.path());

    let kept: Vec<(String, String)> = candidate
        .query_pairs()
        .filter(|(k, _)| k != HOST_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        out.set_query(None);
    } else {
        out.query_pairs_mut().extend_pairs(kept);
    }
    out.set_fragment(None);

    Ok(out.to_string())
}

/// Returns true if the path ends in an extension of a non-page resource
pub fn has_ignored_extension(path: &str) -> bool {
    match path.rsplit_once('.') {
        Some((_, ext)) => IGNORED_EXTENSIONS.contains(&ext),
        None => false,
    }
}
