//! Single-request HTTP fetcher
//!
//! This module issues exactly one GET per call and reports what came back,
//! without following redirects or retrying. It handles:
//! - Building the HTTP client (user agent, timeouts, TLS trust)
//! - Per-host extra headers from configuration
//! - Splitting responses into success, redirect, or failure

use crate::config::{HeaderRule, HttpConfig};
use crate::url::matches_host;
use crate::ConfigError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// A response that ended the request normally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResponse {
    /// 2xx response
    Success {
        /// The URL that answered
        final_url: Url,
        /// HTTP status code
        status_code: u16,
    },

    /// 3xx response with a Location header
    Redirect {
        /// HTTP status code
        status_code: u16,
        /// Raw Location header value, possibly relative
        location: String,
    },
}

/// Everything that prevents a request from producing a [`FetchResponse`]
#[derive(Debug)]
pub enum FetchFailure {
    /// 4xx/5xx, or any other status that is neither success nor redirect
    Server { status_code: u16 },

    /// The request never produced a response
    Transport(reqwest::Error),

    /// A 3xx response without a Location header
    MissingLocation { status_code: u16 },

    /// A Location header that cannot be turned into a request URL
    InvalidLocation {
        location: String,
        reason: crate::UrlError,
    },
}

/// Headers added to every request whose host matches `pattern`
#[derive(Debug, Clone)]
struct HostHeaders {
    pattern: String,
    headers: HeaderMap,
}

/// Builds an HTTP client for availability checks
///
/// Redirects are never followed by the client itself; the resolver drives
/// them one hop at a time.
///
/// When `accept_invalid_certs` is set (the default), certificate validation
/// is switched off. This is an explicit trust relaxation: linked sites with
/// expired or outdated chains are still "available" for the purposes of a
/// link-rot audit.
///
/// # Example
///
/// ```no_run
/// use linkrot::availability::build_http_client;
/// use linkrot::config::HttpConfig;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::none())
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds an HTTP client for the services the auditor itself talks to
///
/// Used for the archive index and the feed pages. Unlike
/// [`build_http_client`] it follows redirects and verifies certificates.
pub fn build_service_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues single GET requests
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    host_headers: Vec<HostHeaders>,
}

impl Fetcher {
    /// Creates a fetcher using `client` and the given per-host header table
    ///
    /// # Returns
    ///
    /// * `Ok(Fetcher)` - All header names and values are valid
    /// * `Err(ConfigError)` - A header rule cannot be sent over HTTP
    pub fn new(client: Client, rules: &[HeaderRule]) -> Result<Self, ConfigError> {
        let mut host_headers = Vec::with_capacity(rules.len());

        for rule in rules {
            let mut headers = HeaderMap::new();
            for (name, value) in &rule.headers {
                let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    ConfigError::Validation(format!("Invalid header name '{}': {}", name, e))
                })?;
                let value = HeaderValue::from_str(value).map_err(|e| {
                    ConfigError::Validation(format!("Invalid value for header '{}': {}", name, e))
                })?;
                headers.append(name, value);
            }

            host_headers.push(HostHeaders {
                pattern: rule.host.clone(),
                headers,
            });
        }

        Ok(Self {
            client,
            host_headers,
        })
    }

    /// Performs one GET request against `url`
    ///
    /// | Response | Result |
    /// |----------|--------|
    /// | 2xx | `Ok(Success)` |
    /// | 3xx with Location | `Ok(Redirect)` |
    /// | 3xx without Location | `Err(MissingLocation)` |
    /// | anything else | `Err(Server)` |
    /// | no response | `Err(Transport)` |
    pub async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchFailure> {
        let mut request = self.client.get(url.clone());
        if let Some(headers) = self.extra_headers_for(url) {
            request = request.headers(headers);
        }

        let response = request.send().await.map_err(FetchFailure::Transport)?;
        let status = response.status();

        tracing::debug!("GET {} -> {}", url, status.as_u16());

        if status.is_success() {
            return Ok(FetchResponse::Success {
                final_url: response.url().clone(),
                status_code: status.as_u16(),
            });
        }

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .ok_or(FetchFailure::MissingLocation {
                    status_code: status.as_u16(),
                })?;

            return Ok(FetchResponse::Redirect {
                status_code: status.as_u16(),
                location,
            });
        }

        Err(FetchFailure::Server {
            status_code: status.as_u16(),
        })
    }

    /// Collects the configured headers for the host of `url`
    fn extra_headers_for(&self, url: &Url) -> Option<HeaderMap> {
        let host = url.host_str()?;
        let mut merged = HeaderMap::new();

        for rule in &self.host_headers {
            if matches_host(&rule.pattern, host) {
                for (name, value) in &rule.headers {
                    merged.append(name.clone(), value.clone());
                }
            }
        }

        if merged.is_empty() {
            None
        } else {
            Some(merged)
        }
    }
}
