//! HTML parser for linked-list pages
//!
//! This module extracts from the feed's HTML:
//! - Monthly archive page links from the linked-list index
//! - Linked-list items (target link, permalink, title) from an archive page
//! - The single item on an item permalink page

use crate::feed::{ArchivePage, LinkedListItem};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Archive page links on the linked-list index
const ARCHIVE_LINK_SELECTOR: &str = "#Main > div:nth-of-type(3) > ul > li > a[href]";

/// One entry per linked-list item
const ITEM_SELECTOR: &str = "#Main > dl > dt";

/// Anchor of the single item on a permalink page
const SINGLE_ITEM_SELECTOR: &str = "#Main > dl > dt > a[href]";

/// Extracts monthly archive pages from the linked-list index
///
/// # Example
///
/// ```
/// use linkrot::feed::parse_archive_pages;
/// use url::Url;
///
/// let html = r#"<div id="Main"><div></div><div></div><div><ul>
///     <li><a href="/linked/2016/05">May 2016</a></li>
/// </ul></div></div>"#;
/// let base = Url::parse("http://daringfireball.net/linked/").unwrap();
///
/// let pages = parse_archive_pages(html, &base);
/// assert_eq!(pages[0].url, "http://daringfireball.net/linked/2016/05");
/// ```
pub fn parse_archive_pages(html: &str, base_url: &Url) -> Vec<ArchivePage> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(ARCHIVE_LINK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_href(href, base_url))
        .map(|url| ArchivePage { url })
        .collect()
}

/// Extracts every linked-list item on an archive page
///
/// For each `dt` the first anchor is the linked URL and its text the title;
/// the `a.permalink` anchor points at the item's own page. Entries missing
/// either anchor are skipped.
pub fn parse_linked_list_items(html: &str, page_url: &Url) -> Vec<LinkedListItem> {
    let document = Html::parse_document(html);
    let (Ok(item_selector), Ok(anchor_selector), Ok(permalink_selector)) = (
        Selector::parse(ITEM_SELECTOR),
        Selector::parse("a[href]"),
        Selector::parse("a.permalink[href]"),
    ) else {
        return Vec::new();
    };

    let mut items = Vec::new();

    for element in document.select(&item_selector) {
        let Some(anchor) = element.select(&anchor_selector).next() else {
            tracing::warn!("Skipping linked-list entry without a link on {}", page_url);
            continue;
        };
        let Some(permalink) = element
            .select(&permalink_selector)
            .next()
            .and_then(|p| p.value().attr("href"))
            .and_then(|href| resolve_href(href, page_url))
        else {
            tracing::warn!("Skipping linked-list entry without a permalink on {}", page_url);
            continue;
        };

        items.push(LinkedListItem {
            url: link_target(anchor, page_url),
            source_page_url: permalink,
            title: anchor_text(anchor),
        });
    }

    items
}

/// Extracts the item on a single permalink page
///
/// Relative links resolve against `page_url`, the URL the page was served
/// from. `source_page_url` is recorded as given.
pub fn parse_single_item(
    html: &str,
    page_url: &Url,
    source_page_url: &str,
) -> Option<LinkedListItem> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(SINGLE_ITEM_SELECTOR).ok()?;
    let anchor = document.select(&selector).next()?;

    Some(LinkedListItem {
        url: link_target(anchor, page_url),
        source_page_url: source_page_url.to_string(),
        title: anchor_text(anchor),
    })
}

/// The linked URL of an anchor, kept verbatim unless it is relative
///
/// Feed links are checked as published, so absolute hrefs are not normalized.
fn link_target(anchor: ElementRef<'_>, page_url: &Url) -> String {
    let href = anchor.value().attr("href").unwrap_or_default().trim();

    match Url::parse(href) {
        Ok(_) => href.to_string(),
        Err(_) => resolve_href(href, page_url).unwrap_or_else(|| href.to_string()),
    }
}

fn anchor_text(anchor: ElementRef<'_>) -> String {
    anchor
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    base_url.join(href).ok().map(|url| url.to_string())
}
