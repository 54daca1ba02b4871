use serde::Deserialize;
use std::collections::BTreeMap;

/// User agent sent with every availability check
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_4) AppleWebKit/602.1.29 (KHTML, like Gecko) Version/9.1.1 Safari/601.6.17";

/// Default CDX search endpoint of the Wayback Machine
pub const DEFAULT_INDEX_URL: &str = "http://web.archive.org/cdx/search/cdx";

/// Default prefix for archived snapshot URLs
pub const DEFAULT_SNAPSHOT_URL: &str = "http://web.archive.org/web";

/// Default linked-list index page
pub const DEFAULT_LINKED_LIST_URL: &str = "http://daringfireball.net/linked/";

/// Main configuration structure for Linkrot
///
/// Every section is optional in the TOML file; missing sections fall back to
/// their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "extra-headers")]
    pub extra_headers: Vec<HeaderRule>,
}

/// HTTP behavior for availability checks
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of redirects followed before giving up
    #[serde(rename = "redirect-limit", default = "default_redirect_limit")]
    pub redirect_limit: u32,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept invalid or outdated TLS certificates.
    ///
    /// On by default: many linked sites still serve old certificate chains
    /// and a certificate problem is not a sign of link rot.
    #[serde(rename = "accept-invalid-certs", default = "default_true")]
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            redirect_limit: default_redirect_limit(),
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_timeout(),
            accept_invalid_certs: true,
        }
    }
}

/// Web archive endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// CDX search endpoint
    #[serde(rename = "index-url", default = "default_index_url")]
    pub index_url: String,

    /// Prefix used to build archived snapshot URLs
    #[serde(rename = "snapshot-url", default = "default_snapshot_url")]
    pub snapshot_url: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            index_url: default_index_url(),
            snapshot_url: default_snapshot_url(),
        }
    }
}

/// Linked-list feed location
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Index page listing every monthly archive page
    #[serde(rename = "linked-list-url", default = "default_linked_list_url")]
    pub linked_list_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            linked_list_url: default_linked_list_url(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Report format: "stdout" or "csv"
    #[serde(default = "default_format")]
    pub format: String,

    /// Directory for per-archive-page reports
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_directory(),
        }
    }
}

/// Extra request headers for hosts matching a pattern
#[derive(Debug, Clone, Deserialize)]
pub struct HeaderRule {
    /// Host pattern (e.g., "linkedin.com" or "*.linkedin.com")
    pub host: String,

    /// Header name to value
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_redirect_limit() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_index_url() -> String {
    DEFAULT_INDEX_URL.to_string()
}

fn default_snapshot_url() -> String {
    DEFAULT_SNAPSHOT_URL.to_string()
}

fn default_linked_list_url() -> String {
    DEFAULT_LINKED_LIST_URL.to_string()
}

fn default_format() -> String {
    "stdout".to_string()
}

fn default_directory() -> String {
    "output".to_string()
}
