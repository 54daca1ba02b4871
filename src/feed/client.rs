//! Linked-list feed fetching
//!
//! Downloads the linked-list index, monthly archive pages and item pages, and
//! hands the HTML to the parser.

use crate::config::FeedConfig;
use crate::feed::parser::{parse_archive_pages, parse_linked_list_items, parse_single_item};
use crate::feed::{ArchivePage, LinkedListItem};
use crate::{LinkRotError, Result};
use reqwest::Client;
use url::Url;

/// Reads the linked-list feed
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    linked_list_url: Url,
}

impl FeedClient {
    /// Creates a feed client
    ///
    /// # Returns
    ///
    /// * `Ok(FeedClient)` - Ready to fetch
    /// * `Err(LinkRotError)` - The configured linked-list URL does not parse
    pub fn new(client: Client, config: &FeedConfig) -> Result<Self> {
        Ok(Self {
            client,
            linked_list_url: Url::parse(&config.linked_list_url)?,
        })
    }

    /// Lists every monthly archive page linked from the index
    pub async fn archive_pages(&self) -> Result<Vec<ArchivePage>> {
        let (page_url, html) = self.fetch_page(self.linked_list_url.as_str()).await?;
        let pages = parse_archive_pages(&html, &page_url);

        tracing::info!("Found {} archive pages", pages.len());
        Ok(pages)
    }

    /// Lists the linked-list items on one archive page
    pub async fn items_on_page(&self, archive_url: &str) -> Result<Vec<LinkedListItem>> {
        let (page_url, html) = self.fetch_page(archive_url).await?;
        let items = parse_linked_list_items(&html, &page_url);

        tracing::info!("Found {} linked-list items on {}", items.len(), archive_url);
        Ok(items)
    }

    /// Reads the item on a single permalink page
    ///
    /// The item's source page is `item_url` as requested, even when the page
    /// was served from elsewhere after a redirect.
    pub async fn single_item(&self, item_url: &str) -> Result<LinkedListItem> {
        let (page_url, html) = self.fetch_page(item_url).await?;

        parse_single_item(&html, &page_url, item_url).ok_or_else(|| LinkRotError::Html {
            url: item_url.to_string(),
            message: "no linked-list item found on page".to_string(),
        })
    }

    /// Downloads a feed page, returning the URL it was served from and its body
    async fn fetch_page(&self, url: &str) -> Result<(Url, String)> {
        let request_url = Url::parse(url)?;
        tracing::debug!("Fetching feed page {}", request_url);

        let response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(|source| LinkRotError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkRotError::Html {
                url: url.to_string(),
                message: format!("feed page returned HTTP {}", status.as_u16()),
            });
        }

        let page_url = response.url().clone();
        let html = response.text().await?;
        Ok((page_url, html))
    }
}
