//! Web archive lookups
//!
//! When a link is broken, the archive index is asked for the captures it
//! holds of that URL, so a report can point at a snapshot that still works.

mod client;
mod entry;

pub use client::ArchiveIndex;
pub use entry::{parse_index_response, ArchiveEntry};
