use crate::{LinkRotError, Result};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::HashMap;

/// Status code of a capture that was valid when it was taken
const VALID_STATUS: &str = "200";

/// Format of CDX capture timestamps
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// One capture listed by the archive index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// SURT-form key the index sorts by
    pub url_key: String,
    /// Capture time, `YYYYMMDDhhmmss`
    pub timestamp: String,
    /// URL as it was captured
    pub original_url: String,
    pub mime_type: String,
    /// HTTP status at capture time, as text
    pub status_code: String,
    pub digest: String,
    pub length: String,
}

impl ArchiveEntry {
    /// Returns true if the page answered 200 when it was captured
    pub fn is_valid(&self) -> bool {
        self.status_code == VALID_STATUS
    }

    /// Parses the capture timestamp
    ///
    /// Returns None if the index returned a timestamp that is not 14 digits.
    pub fn captured_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }

    /// Builds the URL of this snapshot under `snapshot_base`
    ///
    /// # Examples
    ///
    /// ```
    /// use linkrot::archive::ArchiveEntry;
    ///
    /// let entry = ArchiveEntry {
    ///     url_key: "com,example)/".to_string(),
    ///     timestamp: "20160510210845".to_string(),
    ///     original_url: "http://example.com/".to_string(),
    ///     mime_type: "text/html".to_string(),
    ///     status_code: "200".to_string(),
    ///     digest: "ABC".to_string(),
    ///     length: "1024".to_string(),
    /// };
    ///
    /// assert_eq!(
    ///     entry.archived_url("http://web.archive.org/web/"),
    ///     "http://web.archive.org/web/20160510210845/http://example.com/"
    /// );
    /// ```
    pub fn archived_url(&self, snapshot_base: &str) -> String {
        format!(
            "{}/{}/{}",
            snapshot_base.trim_end_matches('/'),
            self.timestamp,
            self.original_url
        )
    }

    /// Maps a positional row onto the column names of the header row
    ///
    /// Columns not used by [`ArchiveEntry`] are ignored. A row shorter than
    /// the header leaves its trailing fields empty.
    pub(crate) fn from_row(columns: &[String], row: Vec<Value>) -> Result<Self> {
        let mut cells = row.into_iter().map(cell_to_string);
        let mut fields: HashMap<&str, String> = columns
            .iter()
            .map(|column| (column.as_str(), cells.next().unwrap_or_default()))
            .collect();

        let mut take = |column: &str| {
            fields.remove(column).ok_or_else(|| {
                LinkRotError::ArchiveFormat(format!("index response has no '{}' column", column))
            })
        };

        Ok(Self {
            url_key: take("urlkey")?,
            timestamp: take("timestamp")?,
            original_url: take("original")?,
            mime_type: take("mimetype")?,
            status_code: take("statuscode")?,
            digest: take("digest")?,
            length: take("length")?,
        })
    }
}

/// Parses a CDX `output=json` body
///
/// The body is an array of arrays: the first row names the columns, every
/// following row holds one capture. An empty body, an empty array, or an
/// empty header row all mean "no captures".
///
/// # Returns
///
/// * `Ok(Vec<ArchiveEntry>)` - Captures in the order the index returned them
/// * `Err(LinkRotError)` - The body is not an array of arrays, or the header lacks
///   a required column
pub fn parse_index_response(body: &str) -> Result<Vec<ArchiveEntry>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<Vec<Value>> = serde_json::from_str(body)?;
    let mut rows = rows.into_iter();

    let columns: Vec<String> = match rows.next() {
        Some(header) if !header.is_empty() => header.into_iter().map(cell_to_string).collect(),
        _ => return Ok(Vec::new()),
    };

    rows.map(|row| ArchiveEntry::from_row(&columns, row)).collect()
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
