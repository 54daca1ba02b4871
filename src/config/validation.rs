use crate::config::types::{
    ArchiveConfig, Config, FeedConfig, HeaderRule, HttpConfig, OutputConfig,
};
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_archive_config(&config.archive)?;
    validate_feed_config(&config.feed)?;
    validate_output_config(&config.output)?;
    validate_header_rules(&config.extra_headers)?;
    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if HeaderValue::from_str(&config.user_agent).is_err() {
        return Err(ConfigError::Validation(format!(
            "user-agent is not a valid header value: '{}'",
            config.user_agent
        )));
    }

    if config.redirect_limit < 1 || config.redirect_limit > 20 {
        return Err(ConfigError::Validation(format!(
            "redirect-limit must be between 1 and 20, got {}",
            config.redirect_limit
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

fn validate_archive_config(config: &ArchiveConfig) -> Result<(), ConfigError> {
    validate_http_url("index-url", &config.index_url)?;
    validate_http_url("snapshot-url", &config.snapshot_url)?;
    Ok(())
}

fn validate_feed_config(config: &FeedConfig) -> Result<(), ConfigError> {
    validate_http_url("linked-list-url", &config.linked_list_url)
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if !matches!(config.format.as_str(), "stdout" | "csv") {
        return Err(ConfigError::Validation(format!(
            "output format must be 'stdout' or 'csv', got '{}'",
            config.format
        )));
    }

    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the per-host extra header table
fn validate_header_rules(rules: &[HeaderRule]) -> Result<(), ConfigError> {
    for rule in rules {
        validate_host_pattern(&rule.host)?;

        for (name, value) in &rule.headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(ConfigError::Validation(format!(
                    "Invalid header name '{}' for host '{}'",
                    name, rule.host
                )));
            }

            if HeaderValue::from_str(value).is_err() {
                return Err(ConfigError::Validation(format!(
                    "Invalid value for header '{}' on host '{}'",
                    name, rule.host
                )));
            }
        }
    }

    Ok(())
}

/// Validates a host pattern
///
/// Valid patterns:
/// - "example.com" (exact match)
/// - "*.example.com" (the domain and any subdomain)
fn validate_host_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Host pattern cannot be empty".to_string(),
        ));
    }

    let base = pattern.strip_prefix("*.").unwrap_or(pattern);

    if base.is_empty() || base.contains('*') {
        return Err(ConfigError::InvalidPattern(format!(
            "Wildcards are only allowed as a leading '*.' in '{}'",
            pattern
        )));
    }

    if base.contains('/') || base.contains(':') || base.contains(' ') {
        return Err(ConfigError::InvalidPattern(format!(
            "Host pattern must be a bare host name, got '{}'",
            pattern
        )));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
