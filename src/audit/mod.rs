//! Audit driver - runs feed items through the availability check
//!
//! This module ties the pieces together:
//! - Reading items from the feed
//! - Checking each item's link
//! - Looking up the archive for broken links
//! - Sending each result to a formatter

use crate::archive::ArchiveIndex;
use crate::availability::{build_service_client, Availability, AvailabilityOutcome};
use crate::config::Config;
use crate::feed::{FeedClient, LinkedListItem};
use crate::output::{fetch_formatter, file_extension, Formatter};
use crate::Result;
use reqwest::Client;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Totals for one audit run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub checked: usize,
    pub reachable: usize,
    pub redirected: usize,
    pub too_many_redirects: usize,
    pub server_problems: usize,
    pub connection_problems: usize,
    pub archived: usize,
}

impl AuditSummary {
    fn record(&mut self, link: &AuditedLink) {
        self.checked += 1;
        match link.outcome {
            AvailabilityOutcome::Available { .. } => self.reachable += 1,
            AvailabilityOutcome::Redirected { .. } => self.redirected += 1,
            AvailabilityOutcome::TooManyRedirects { .. } => self.too_many_redirects += 1,
            AvailabilityOutcome::ServerProblem { .. } => self.server_problems += 1,
            AvailabilityOutcome::ConnectionProblem { .. } => self.connection_problems += 1,
        }
        if link.archived_url.is_some() {
            self.archived += 1;
        }
    }

    fn merge(&mut self, other: &AuditSummary) {
        self.checked += other.checked;
        self.reachable += other.reachable;
        self.redirected += other.redirected;
        self.too_many_redirects += other.too_many_redirects;
        self.server_problems += other.server_problems;
        self.connection_problems += other.connection_problems;
        self.archived += other.archived;
    }

    /// Links that no longer work
    pub fn broken(&self) -> usize {
        self.server_problems + self.connection_problems
    }
}

/// Result of auditing one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditedLink {
    pub outcome: AvailabilityOutcome,
    /// Most recent valid snapshot, looked up only for broken links
    pub archived_url: Option<String>,
}

/// Runs audits of feed items
pub struct Auditor {
    config: Config,
    availability: Availability,
    feed: FeedClient,
    service_client: Client,
}

impl Auditor {
    /// Creates an auditor from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Auditor)` - Ready to audit
    /// * `Err(LinkRotError)` - HTTP clients could not be built or a configured
    ///   URL is invalid
    pub fn new(config: Config) -> Result<Self> {
        let availability = Availability::new(&config)?;
        let service_client = build_service_client(&config.http)?;
        let feed = FeedClient::new(service_client.clone(), &config.feed)?;

        Ok(Self {
            config,
            availability,
            feed,
            service_client,
        })
    }

    /// The configuration in effect
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Checks one item and reports it
    ///
    /// Broken links (server or connection problems) are looked up in the
    /// archive and reported with the most recent valid snapshot, if any.
    ///
    /// # Returns
    ///
    /// * `Ok(AuditedLink)` - The reported outcome and snapshot
    /// * `Err(LinkRotError)` - The check failed outside the outcome taxonomy,
    ///   the archive could not be queried, or the formatter failed
    pub async fn audit_item(
        &self,
        item: &LinkedListItem,
        formatter: &mut dyn Formatter,
    ) -> Result<AuditedLink> {
        let outcome = self.availability.check(&item.url).await?;
        let archived_url = if outcome.needs_archive() {
            self.last_valid_snapshot(&item.url).await?
        } else {
            None
        };

        if outcome.is_reachable() {
            tracing::info!("[{}] {} - {}", item.source_page_url, item.url, outcome.label());
        } else {
            tracing::warn!("[{}] {} - {}", item.source_page_url, item.url, outcome);
        }

        match &outcome {
            AvailabilityOutcome::Available { .. } => formatter.available(item)?,
            AvailabilityOutcome::Redirected { final_url } => formatter.redirected(item, final_url)?,
            AvailabilityOutcome::TooManyRedirects {
                last_url,
                hop_count,
            } => formatter.too_many_redirects(item, last_url, *hop_count)?,
            AvailabilityOutcome::ServerProblem { status_code } => {
                formatter.server_problem(item, *status_code, archived_url.as_deref())?
            }
            AvailabilityOutcome::ConnectionProblem { message } => {
                formatter.connection_problem(item, message, archived_url.as_deref())?
            }
        }

        Ok(AuditedLink {
            outcome,
            archived_url,
        })
    }

    /// Audits a list of items between `start` and `finish`
    pub async fn audit_items(
        &self,
        items: &[LinkedListItem],
        formatter: &mut dyn Formatter,
    ) -> Result<AuditSummary> {
        let mut summary = AuditSummary::default();

        formatter.start()?;
        for item in items {
            let link = self.audit_item(item, formatter).await?;
            summary.record(&link);
        }
        formatter.finish()?;

        Ok(summary)
    }

    /// Audits the item on a single permalink page
    pub async fn audit_single(
        &self,
        item_url: &str,
        formatter: &mut dyn Formatter,
    ) -> Result<AuditSummary> {
        let item = self.feed.single_item(item_url).await?;
        self.audit_items(std::slice::from_ref(&item), formatter).await
    }

    /// Audits every item on one archive page
    pub async fn audit_archive_page(
        &self,
        archive_url: &str,
        formatter: &mut dyn Formatter,
    ) -> Result<AuditSummary> {
        let items = self.feed.items_on_page(archive_url).await?;
        self.audit_items(&items, formatter).await
    }

    /// Audits every archive page, one report file per page
    ///
    /// Reports go to `<output_dir>/<year>-<month>.<ext>`. Pages whose report
    /// already exists are skipped, so an interrupted run can be restarted.
    /// A report is written to a `.partial` file first and only renamed into
    /// place once its page has been audited completely.
    pub async fn audit_all(&self, output_dir: &Path) -> Result<AuditSummary> {
        fs::create_dir_all(output_dir)?;
        let extension = file_extension(&self.config.output.format)?;
        let mut summary = AuditSummary::default();

        for page in self.feed.archive_pages().await? {
            let path = report_path(output_dir, &page.to_file_name(), extension);
            if path.exists() {
                tracing::info!("Skipping {}: {} already exists", page.url, path.display());
                continue;
            }

            tracing::info!("Auditing {} into {}", page.url, path.display());
            let partial = partial_path(&path);
            let writer = BufWriter::new(File::create(&partial)?);
            let mut formatter = fetch_formatter(&self.config.output.format, Box::new(writer))?;

            let result = self.audit_archive_page(&page.url, formatter.as_mut()).await;
            drop(formatter);

            match result {
                Ok(page_summary) => {
                    fs::rename(&partial, &path)?;
                    summary.merge(&page_summary);
                }
                Err(err) => {
                    if let Err(remove_err) = fs::remove_file(&partial) {
                        tracing::warn!("Could not remove {}: {}", partial.display(), remove_err);
                    }
                    return Err(err);
                }
            }
        }

        Ok(summary)
    }

    /// Archived URL of the most recent valid capture of `url`
    async fn last_valid_snapshot(&self, url: &str) -> Result<Option<String>> {
        let index = ArchiveIndex::new(self.service_client.clone(), &self.config.archive, url)?;
        let Some(entry) = index.last_valid_entry().await? else {
            tracing::debug!("No valid archive capture for {}", url);
            return Ok(None);
        };

        match entry.captured_at() {
            Some(captured) => tracing::debug!("Using capture of {} from {}", url, captured),
            None => tracing::debug!("Using capture of {} stamped {}", url, entry.timestamp),
        }
        Ok(Some(index.archived_url(entry)))
    }
}

fn report_path(output_dir: &Path, stem: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", stem, extension))
}

fn partial_path(report: &Path) -> PathBuf {
    let mut name = report.as_os_str().to_os_string();
    name.push(".partial");
    PathBuf::from(name)
}
