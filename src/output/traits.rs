//! Formatter trait and output errors
//!
//! A formatter receives one call per audited item, named after the outcome,
//! between a `start` and a `finish`.

use crate::feed::LinkedListItem;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Could not find formatter for '{0}'")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Renders audit results
pub trait Formatter {
    /// Called once before the first item
    fn start(&mut self) -> OutputResult<()> {
        Ok(())
    }

    /// The link answered directly
    fn available(&mut self, item: &LinkedListItem) -> OutputResult<()>;

    /// The link now ends up at `final_url`
    fn redirected(&mut self, item: &LinkedListItem, final_url: &str) -> OutputResult<()>;

    /// The link redirected `hop_count` times without settling
    fn too_many_redirects(
        &mut self,
        item: &LinkedListItem,
        last_url: &str,
        hop_count: u32,
    ) -> OutputResult<()>;

    /// The server answered with an error status
    fn server_problem(
        &mut self,
        item: &LinkedListItem,
        status_code: u16,
        archived_url: Option<&str>,
    ) -> OutputResult<()>;

    /// The server could not be reached
    fn connection_problem(
        &mut self,
        item: &LinkedListItem,
        message: &str,
        archived_url: Option<&str>,
    ) -> OutputResult<()>;

    /// Called once after the last item
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
