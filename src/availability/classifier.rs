//! Failure classification
//!
//! Maps a failed hop onto the outcome taxonomy:
//!
//! | Failure | Outcome |
//! |---------|---------|
//! | HTTP 4xx/5xx (or other non-success, non-redirect status) | `ServerProblem` |
//! | Timeout | `ConnectionProblem` |
//! | Connect error (DNS, refused) | `ConnectionProblem` |
//! | Connection reset/aborted, broken pipe, early EOF | `ConnectionProblem` |
//! | Connection closed before a response arrived | `ConnectionProblem` |
//! | Anything else | `Err`, the check cannot be trusted |

use crate::availability::fetcher::FetchFailure;
use crate::availability::outcome::AvailabilityOutcome;
use crate::availability::resolver::HopFailure;
use crate::{LinkRotError, Result};
use std::error::Error as StdError;
use std::io;

/// Classifies a failed hop
///
/// # Returns
///
/// * `Ok(AvailabilityOutcome)` - `ServerProblem` or `ConnectionProblem`
/// * `Err(LinkRotError)` - The failure is outside the taxonomy
pub fn classify(hop: HopFailure) -> Result<AvailabilityOutcome> {
    let HopFailure {
        url,
        hops_taken,
        failure,
    } = hop;

    match failure {
        FetchFailure::Server { status_code } => {
            Ok(AvailabilityOutcome::ServerProblem { status_code })
        }
        FetchFailure::Transport(error) if is_connection_failure(&error) => {
            let message = describe(&error);
            tracing::debug!("Connection problem at {} after {} hops: {}", url, hops_taken, message);
            Ok(AvailabilityOutcome::ConnectionProblem { message })
        }
        FetchFailure::Transport(source) => Err(LinkRotError::Http {
            url: url.to_string(),
            source,
        }),
        FetchFailure::MissingLocation { status_code } => Err(LinkRotError::MissingLocation {
            url: url.to_string(),
            status: status_code,
        }),
        FetchFailure::InvalidLocation { reason, .. } => Err(LinkRotError::Url(reason)),
    }
}

/// Returns true for transport errors that mean "could not reach the server"
pub fn is_connection_failure(error: &reqwest::Error) -> bool {
    if error.is_timeout() || error.is_connect() {
        return true;
    }

    // A peer that closes the socket before answering surfaces as a hyper
    // error with no io::Error underneath.
    if closed_before_response(error) {
        return true;
    }

    io_error_kind(error).map_or(false, |kind| {
        matches!(
            kind,
            io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::ConnectionRefused
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof
                | io::ErrorKind::TimedOut
        )
    })
}

/// Returns true if hyper gave up because the connection closed mid-exchange
fn closed_before_response(error: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);

    while let Some(err) = current {
        if let Some(hyper_err) = err.downcast_ref::<hyper::Error>() {
            return hyper_err.is_incomplete_message() || hyper_err.is_closed();
        }
        current = err.source();
    }

    false
}

/// Finds the first I/O error in the source chain
fn io_error_kind(error: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);

    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        current = err.source();
    }

    None
}

/// Renders an error with its causes, e.g. "error sending request: connection refused"
fn describe(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut current = error.source();

    while let Some(err) = current {
        let cause = err.to_string();
        if !cause.is_empty() && !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
        current = err.source();
    }

    if message.is_empty() {
        "connection failed".to_string()
    } else {
        message
    }
}
