//! Linked-list feed
//!
//! This module discovers the links to audit:
//! - Monthly archive pages listed on the linked-list index
//! - Linked-list items on each archive page
//! - The item on a single permalink page

mod client;
mod parser;

pub use client::FeedClient;
pub use parser::{parse_archive_pages, parse_linked_list_items, parse_single_item};

/// A link published in the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedListItem {
    /// The outbound link being audited
    pub url: String,
    /// The feed page the link was published on
    pub source_page_url: String,
    /// Link text
    pub title: String,
}

/// A monthly archive page of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePage {
    pub url: String,
}

impl ArchivePage {
    /// Report file stem for this page: the last two path segments joined by '-'
    ///
    /// # Examples
    ///
    /// ```
    /// use linkrot::feed::ArchivePage;
    ///
    /// let page = ArchivePage { url: "http://daringfireball.net/linked/2016/05".to_string() };
    /// assert_eq!(page.to_file_name(), "2016-05");
    ///
    /// let page = ArchivePage { url: "http://daringfireball.net/linked/2016/05/".to_string() };
    /// assert_eq!(page.to_file_name(), "2016-05");
    /// ```
    pub fn to_file_name(&self) -> String {
        let mut segments = self.url.trim_end_matches('/').rsplit('/');
        let last = segments.next().unwrap_or_default();

        match segments.next() {
            Some(previous) if !previous.is_empty() => format!("{}-{}", previous, last),
            _ => last.to_string(),
        }
    }
}
