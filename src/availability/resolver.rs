//! Bounded redirect following
//!
//! The resolver drives the fetcher one hop at a time. It stops at the first
//! success, the first failure, or when the hop budget runs out. There is no
//! cycle detection: a loop simply burns through the budget.

use crate::availability::fetcher::{FetchFailure, FetchResponse, Fetcher};
use crate::availability::outcome::AvailabilityOutcome;
use crate::url::resolve_location;
use url::Url;

/// Default number of redirects followed before giving up
pub const DEFAULT_REDIRECT_LIMIT: u32 = 5;

/// Position in a redirect chain
///
/// Owned by a single [`Resolver::resolve`] call and advanced only by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectAttempt {
    /// URL requested at this hop
    pub url: Url,
    /// Redirects that may still be followed
    pub hops_remaining: u32,
    /// Redirects followed so far
    pub hops_taken: u32,
}

impl RedirectAttempt {
    /// Starts a chain at `url` with `limit` hops available
    pub fn start(url: Url, limit: u32) -> Self {
        Self {
            url,
            hops_remaining: limit,
            hops_taken: 0,
        }
    }

    /// Moves to the next hop, spending one unit of the budget
    pub fn follow(self, next: Url) -> Self {
        Self {
            url: next,
            hops_remaining: self.hops_remaining.saturating_sub(1),
            hops_taken: self.hops_taken + 1,
        }
    }

    /// Returns true once no further redirect may be followed
    pub fn is_exhausted(&self) -> bool {
        self.hops_remaining == 0
    }
}

/// A request in the chain that failed
#[derive(Debug)]
pub struct HopFailure {
    /// URL of the failing request
    pub url: Url,
    /// Redirects followed before the failure
    pub hops_taken: u32,
    /// What went wrong
    pub failure: FetchFailure,
}

/// Follows redirects for one check
pub struct Resolver<'a> {
    fetcher: &'a Fetcher,
    redirect_limit: u32,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver that follows at most `redirect_limit` redirects
    pub fn new(fetcher: &'a Fetcher, redirect_limit: u32) -> Self {
        Self {
            fetcher,
            redirect_limit,
        }
    }

    /// Resolves `original` to an outcome
    ///
    /// # Algorithm
    ///
    /// 1. If the budget is spent, stop with `TooManyRedirects` naming the
    ///    target that would have been requested next
    /// 2. Fetch the current URL
    /// 3. On success, compare the answering URL with `original` (not with the
    ///    previous hop): equal is `Available`, anything else `Redirected`
    /// 4. On redirect, resolve Location against the current hop and repeat
    ///
    /// # Returns
    ///
    /// * `Ok(AvailabilityOutcome)` - Available, Redirected, or TooManyRedirects
    /// * `Err(HopFailure)` - A request failed; classify it to finish the check
    pub async fn resolve(&self, original: &Url) -> Result<AvailabilityOutcome, HopFailure> {
        let mut attempt = RedirectAttempt::start(original.clone(), self.redirect_limit);

        loop {
            if attempt.is_exhausted() {
                tracing::debug!(
                    "Redirect limit reached after {} hops at {}",
                    attempt.hops_taken,
                    attempt.url
                );
                return Ok(AvailabilityOutcome::TooManyRedirects {
                    last_url: attempt.url.to_string(),
                    hop_count: attempt.hops_taken,
                });
            }

            let response = match self.fetcher.fetch(&attempt.url).await {
                Ok(response) => response,
                Err(failure) => {
                    return Err(HopFailure {
                        url: attempt.url,
                        hops_taken: attempt.hops_taken,
                        failure,
                    })
                }
            };

            match response {
                FetchResponse::Success { final_url, .. } => {
                    let final_url_string = final_url.to_string();
                    return Ok(if final_url == *original {
                        AvailabilityOutcome::Available {
                            final_url: final_url_string,
                        }
                    } else {
                        AvailabilityOutcome::Redirected {
                            final_url: final_url_string,
                        }
                    });
                }
                FetchResponse::Redirect {
                    status_code,
                    location,
                } => {
                    let next = match resolve_location(&attempt.url, &location) {
                        Ok(next) => next,
                        Err(reason) => {
                            return Err(HopFailure {
                                url: attempt.url,
                                hops_taken: attempt.hops_taken,
                                failure: FetchFailure::InvalidLocation { location, reason },
                            })
                        }
                    };

                    tracing::debug!("{} {} -> {}", status_code, attempt.url, next);
                    attempt = attempt.follow(next);
                }
            }
        }
    }
}
