//! Availability checking for linked URLs
//!
//! This module contains the link-checking engine:
//! - Single-request fetching with per-host headers
//! - Bounded redirect following
//! - Classification of failures into the outcome taxonomy
//!
//! [`Availability::check`] is the single entry point used by reporting code.

mod classifier;
mod fetcher;
mod outcome;
mod resolver;

pub use classifier::{classify, is_connection_failure};
pub use fetcher::{build_http_client, build_service_client, FetchFailure, FetchResponse, Fetcher};
pub use outcome::AvailabilityOutcome;
pub use resolver::{HopFailure, RedirectAttempt, Resolver, DEFAULT_REDIRECT_LIMIT};

use crate::config::Config;
use crate::url::parse_request_url;
use crate::Result;
use reqwest::Client;

/// Checks whether URLs are still reachable
///
/// Holds no per-check state: every call to [`check`](Self::check) builds its
/// own resolver, so one instance may be shared across tasks.
#[derive(Debug, Clone)]
pub struct Availability {
    fetcher: Fetcher,
    redirect_limit: u32,
}

impl Availability {
    /// Creates a checker from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Availability)` - Ready to check URLs
    /// * `Err(LinkRotError)` - The HTTP client or header table could not be built
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.http)?;
        Self::from_client(client, config)
    }

    /// Creates a checker around an existing client
    ///
    /// The client must not follow redirects on its own (see
    /// [`build_http_client`]).
    pub fn from_client(client: Client, config: &Config) -> Result<Self> {
        let fetcher = Fetcher::new(client, &config.extra_headers)?;
        Ok(Self {
            fetcher,
            redirect_limit: config.http.redirect_limit,
        })
    }

    /// Returns a copy that follows at most `limit` redirects
    pub fn with_redirect_limit(mut self, limit: u32) -> Self {
        self.redirect_limit = limit;
        self
    }

    /// The redirect limit in effect
    pub fn redirect_limit(&self) -> u32 {
        self.redirect_limit
    }

    /// Determines the current fate of `url`
    ///
    /// # Returns
    ///
    /// * `Ok(AvailabilityOutcome)` - Exactly one outcome for the URL
    /// * `Err(LinkRotError)` - The URL is unusable, or the request failed in a
    ///   way the taxonomy does not cover; callers should stop rather than
    ///   report a misleading outcome
    ///
    /// # Example
    ///
    /// ```no_run
    /// use linkrot::availability::{Availability, AvailabilityOutcome};
    /// use linkrot::config::Config;
    ///
    /// # async fn example() -> linkrot::Result<()> {
    /// let availability = Availability::new(&Config::default())?;
    /// match availability.check("http://example.com/").await? {
    ///     AvailabilityOutcome::Available { .. } => println!("still good"),
    ///     other => println!("{}", other),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn check(&self, url: &str) -> Result<AvailabilityOutcome> {
        let target = parse_request_url(url)?;
        let resolver = Resolver::new(&self.fetcher, self.redirect_limit);

        let outcome = match resolver.resolve(&target).await {
            Ok(outcome) => outcome,
            Err(failure) => classify(failure)?,
        };

        tracing::debug!("{} => {}", url, outcome);
        Ok(outcome)
    }
}
