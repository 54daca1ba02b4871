//! Output module for audit reports
//!
//! This module handles:
//! - Plain-text reports (one line per link)
//! - CSV reports (one row per link)
//! - Choosing a formatter by name

mod csv;
mod stdout;
mod traits;

pub use self::csv::{CsvFormatter, CSV_HEADER};
pub use stdout::StdoutFormatter;
pub use traits::{Formatter, OutputError, OutputResult};

use std::io::Write;

/// Supported report formats
pub const FORMATS: [&str; 2] = ["stdout", "csv"];

/// Creates the formatter named `format` writing to `writer`
///
/// # Returns
///
/// * `Ok(Box<dyn Formatter>)` - "stdout" or "csv"
/// * `Err(OutputError::UnknownFormat)` - Any other name
///
/// # Example
///
/// ```
/// use linkrot::output::fetch_formatter;
///
/// assert!(fetch_formatter("csv", Box::new(std::io::sink())).is_ok());
/// assert!(fetch_formatter("xml", Box::new(std::io::sink())).is_err());
/// ```
pub fn fetch_formatter(format: &str, writer: Box<dyn Write>) -> OutputResult<Box<dyn Formatter>> {
    match format {
        "stdout" => Ok(Box::new(StdoutFormatter::new(writer))),
        "csv" => Ok(Box::new(CsvFormatter::new(writer))),
        other => Err(OutputError::UnknownFormat(other.to_string())),
    }
}

/// File extension for reports written in `format`
pub fn file_extension(format: &str) -> OutputResult<&'static str> {
    match format {
        "stdout" => Ok("txt"),
        "csv" => Ok("csv"),
        other => Err(OutputError::UnknownFormat(other.to_string())),
    }
}
