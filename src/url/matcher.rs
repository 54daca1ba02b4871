/// Checks if a request host matches a host pattern
///
/// Two kinds of pattern are supported:
/// 1. Exact: "linkedin.com" matches only "linkedin.com"
/// 2. Wildcard: "*.linkedin.com" matches "linkedin.com" and any of its
///    subdomains ("www.linkedin.com", "a.b.linkedin.com")
///
/// Comparison ignores ASCII case.
///
/// # Examples
///
/// ```
/// use linkrot::url::matches_host;
///
/// assert!(matches_host("*.linkedin.com", "www.linkedin.com"));
/// assert!(matches_host("*.linkedin.com", "linkedin.com"));
/// assert!(!matches_host("*.linkedin.com", "notlinkedin.com"));
/// assert!(!matches_host("linkedin.com", "www.linkedin.com"));
/// ```
pub fn matches_host(pattern: &str, host: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let host = host.to_ascii_lowercase();

    match pattern.strip_prefix("*.") {
        Some(base) => host == base || host.ends_with(&format!(".{}", base)),
        None => host == pattern,
    }
}
