//! Configuration module for Linkrot
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a configuration file is supported.
//!
//! # Example
//!
//! ```no_run
//! use linkrot::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkrot.toml")).unwrap();
//! println!("Following at most {} redirects", config.http.redirect_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ArchiveConfig, Config, FeedConfig, HeaderRule, HttpConfig, OutputConfig, DEFAULT_INDEX_URL,
    DEFAULT_LINKED_LIST_URL, DEFAULT_SNAPSHOT_URL, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
