//! Linkrot: a link-rot auditor for a linked-list feed
//!
//! This crate checks whether the outbound links of a curated linked-list page
//! are still reachable, classifies each link's fate, and looks up the most
//! recent valid snapshot in a web-archive index when a link is broken.

pub mod archive;
pub mod audit;
pub mod availability;
pub mod config;
pub mod feed;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Linkrot operations
///
/// Reachability results are never reported through this type; see
/// [`availability::AvailabilityOutcome`]. An `Err` means a condition outside
/// the outcome taxonomy and must stop the audit.
#[derive(Debug, Error)]
pub enum LinkRotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Unclassified HTTP failure for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Redirect from {url} (status {status}) has no Location header")]
    MissingLocation { url: String, status: u16 },

    #[error("Malformed archive index response: {0}")]
    ArchiveFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTML error for {url}: {message}")]
    Html { url: String, message: String },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Linkrot operations
pub type Result<T> = std::result::Result<T, LinkRotError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use archive::{ArchiveEntry, ArchiveIndex};
pub use audit::Auditor;
pub use availability::{Availability, AvailabilityOutcome};
pub use config::Config;
pub use feed::{ArchivePage, LinkedListItem};
