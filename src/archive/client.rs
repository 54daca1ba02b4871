//! Archive index client
//!
//! Looks up the captures the web archive holds for one URL. The lookup runs
//! at most once per [`ArchiveIndex`]; later calls reuse the cached result.

use crate::archive::entry::{parse_index_response, ArchiveEntry};
use crate::config::ArchiveConfig;
use crate::url::strip_scheme;
use crate::{LinkRotError, Result};
use reqwest::Client;
use tokio::sync::OnceCell;
use url::Url;

/// Archive history of a single URL
///
/// A new instance is needed for every URL; entries are fetched on first use
/// and kept for the lifetime of the instance.
#[derive(Debug)]
pub struct ArchiveIndex {
    client: Client,
    index_url: Url,
    snapshot_url: String,
    url: String,
    entries: OnceCell<Vec<ArchiveEntry>>,
}

impl ArchiveIndex {
    /// Creates an index lookup for `url`
    ///
    /// # Returns
    ///
    /// * `Ok(ArchiveIndex)` - Ready to query
    /// * `Err(LinkRotError)` - The configured index URL does not parse
    pub fn new(client: Client, config: &ArchiveConfig, url: &str) -> Result<Self> {
        let index_url = Url::parse(&config.index_url)?;

        Ok(Self {
            client,
            index_url,
            snapshot_url: config.snapshot_url.clone(),
            url: url.trim().to_string(),
            entries: OnceCell::new(),
        })
    }

    /// The URL whose history this instance looks up
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Builds the index query: `<index>?url=<scheme-less url>&output=json`
    ///
    /// # Examples
    ///
    /// ```
    /// use linkrot::archive::ArchiveIndex;
    /// use linkrot::config::ArchiveConfig;
    ///
    /// let index = ArchiveIndex::new(
    ///     reqwest::Client::new(),
    ///     &ArchiveConfig::default(),
    ///     "https://example.com/a b",
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(
    ///     index.request_url().as_str(),
    ///     "http://web.archive.org/cdx/search/cdx?url=example.com%2Fa+b&output=json"
    /// );
    /// ```
    pub fn request_url(&self) -> Url {
        let mut request_url = self.index_url.clone();
        request_url
            .query_pairs_mut()
            .append_pair("url", strip_scheme(&self.url))
            .append_pair("output", "json");
        request_url
    }

    /// All captures, in the order the index returned them (oldest first)
    ///
    /// # Returns
    ///
    /// * `Ok(&[ArchiveEntry])` - Possibly empty; an HTTP error from the index
    ///   means "no history" and yields an empty list
    /// * `Err(LinkRotError)` - The index could not be reached or answered
    ///   with something other than a CDX JSON table
    pub async fn entries(&self) -> Result<&[ArchiveEntry]> {
        self.entries
            .get_or_try_init(|| self.fetch_entries())
            .await
            .map(Vec::as_slice)
    }

    /// The oldest capture that answered 200
    pub async fn first_valid_entry(&self) -> Result<Option<&ArchiveEntry>> {
        Ok(self.entries().await?.iter().find(|entry| entry.is_valid()))
    }

    /// The most recent capture that answered 200
    pub async fn last_valid_entry(&self) -> Result<Option<&ArchiveEntry>> {
        Ok(self.entries().await?.iter().rev().find(|entry| entry.is_valid()))
    }

    /// Snapshot URL of `entry` under the configured snapshot prefix
    pub fn archived_url(&self, entry: &ArchiveEntry) -> String {
        entry.archived_url(&self.snapshot_url)
    }

    async fn fetch_entries(&self) -> Result<Vec<ArchiveEntry>> {
        let request_url = self.request_url();
        tracing::debug!("Querying archive index: {}", request_url);

        let response = self
            .client
            .get(request_url.clone())
            .send()
            .await
            .map_err(|source| LinkRotError::Http {
                url: request_url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                "Archive index returned {} for {}; treating as no history",
                status.as_u16(),
                self.url
            );
            return Ok(Vec::new());
        }

        let body = response.text().await?;
        let entries = parse_index_response(&body)?;

        tracing::debug!("Archive index has {} captures for {}", entries.len(), self.url);
        Ok(entries)
    }
}
