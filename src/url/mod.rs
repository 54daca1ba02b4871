//! URL handling module for Linkrot
//!
//! This module provides tolerant parsing of feed URLs, host pattern matching
//! for per-host request headers, and resolution of redirect targets.

mod escape;
mod matcher;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use escape::escape_invalid_characters;
pub use matcher::matches_host;

/// Parses a feed or redirect URL into a request target
///
/// Structurally invalid characters are escaped first, so feed URLs such as
/// `http://example.com/{id}` are accepted. Only absolute http(s) URLs with a
/// host are valid request targets.
///
/// # Examples
///
/// ```
/// use linkrot::url::parse_request_url;
///
/// let url = parse_request_url("http://example.com/a|b").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/a%7Cb");
///
/// assert!(parse_request_url("mailto:someone@example.com").is_err());
/// assert!(parse_request_url("/relative/path").is_err());
/// ```
pub fn parse_request_url(raw: &str) -> UrlResult<Url> {
    let escaped = escape_invalid_characters(raw.trim());
    let url = Url::parse(&escaped).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;
    ensure_http(url)
}

/// Computes the absolute target of a redirect
///
/// An absolute `location` is used as given. A relative one is resolved
/// against the origin root (`scheme://host[:port]/`) of `previous`, the URL of
/// the hop that issued the redirect, not the URL the chain started from.
///
/// # Examples
///
/// ```
/// use linkrot::url::{parse_request_url, resolve_location};
///
/// let previous = parse_request_url("https://b.example/deep/path?q=1").unwrap();
///
/// let target = resolve_location(&previous, "/landing").unwrap();
/// assert_eq!(target.as_str(), "https://b.example/landing");
///
/// let target = resolve_location(&previous, "landing").unwrap();
/// assert_eq!(target.as_str(), "https://b.example/landing");
///
/// let target = resolve_location(&previous, "http://c.example/x").unwrap();
/// assert_eq!(target.as_str(), "http://c.example/x");
/// ```
pub fn resolve_location(previous: &Url, location: &str) -> UrlResult<Url> {
    let escaped = escape_invalid_characters(location.trim());

    match Url::parse(&escaped) {
        Ok(absolute) => ensure_http(absolute),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let mut origin = previous.clone();
            origin.set_path("/");
            origin.set_query(None);
            origin.set_fragment(None);

            let joined = origin
                .join(&escaped)
                .map_err(|e| UrlError::Parse(format!("{}: {}", location, e)))?;
            ensure_http(joined)
        }
        Err(e) => Err(UrlError::Parse(format!("{}: {}", location, e))),
    }
}

/// Removes a leading `http://` or `https://` from a URL string
///
/// # Examples
///
/// ```
/// use linkrot::url::strip_scheme;
///
/// assert_eq!(strip_scheme("https://example.com/a"), "example.com/a");
/// assert_eq!(strip_scheme("http://example.com/a"), "example.com/a");
/// assert_eq!(strip_scheme("example.com/a"), "example.com/a");
/// ```
pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

fn ensure_http(url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    Ok(url)
}
