/// Availability outcome definitions
///
/// This module defines the closed set of results a link check can produce.
use std::fmt;

/// The fate of a single link
///
/// Exactly one variant is produced per check. Conditions outside this set are
/// reported as [`crate::LinkRotError`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityOutcome {
    /// The requested URL answered 200 directly
    Available {
        /// The URL that answered
        final_url: String,
    },

    /// The request succeeded after one or more redirects to a different URL
    Redirected {
        /// The URL of the last hop
        final_url: String,
    },

    /// The redirect chain was still going when the hop limit ran out
    TooManyRedirects {
        /// The next target that was not requested
        last_url: String,
        /// Redirects actually followed
        hop_count: u32,
    },

    /// The server answered with an HTTP error status
    ServerProblem {
        /// The HTTP status code
        status_code: u16,
    },

    /// The server could not be reached (timeout, DNS, reset)
    ConnectionProblem {
        /// Transport error description
        message: String,
    },
}

impl AvailabilityOutcome {
    /// Human-readable result label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Available { .. } => "Reachable",
            Self::Redirected { .. } => "Redirected",
            Self::TooManyRedirects { .. } => "Too Many Redirects",
            Self::ServerProblem { .. } => "Server Problem",
            Self::ConnectionProblem { .. } => "Connection Problem",
        }
    }

    /// Returns true if the link is still usable (directly or via redirect)
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Available { .. } | Self::Redirected { .. })
    }

    /// Returns true if the link is broken and an archived copy should be looked up
    pub fn needs_archive(&self) -> bool {
        matches!(
            self,
            Self::ServerProblem { .. } | Self::ConnectionProblem { .. }
        )
    }
}

impl fmt::Display for AvailabilityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { final_url } => write!(f, "{}: {}", self.label(), final_url),
            Self::Redirected { final_url } => write!(f, "{} to {}", self.label(), final_url),
            Self::TooManyRedirects {
                last_url,
                hop_count,
            } => write!(f, "{} ({}) ending at {}", self.label(), hop_count, last_url),
            Self::ServerProblem { status_code } => {
                write!(f, "{} (HTTP {})", self.label(), status_code)
            }
            Self::ConnectionProblem { message } => write!(f, "{}: {}", self.label(), message),
        }
    }
}
