use crate::feed::LinkedListItem;
use crate::output::traits::{Formatter, OutputResult};
use std::io::Write;

/// Column headers of the CSV report
pub const CSV_HEADER: [&str; 8] = [
    "Result",
    "DF URL",
    "Original URL",
    "Title",
    "Last Valid Web Archive URL",
    "Redirect URL",
    "Redirect Count",
    "Response Code",
];

/// CSV report, one row per item
pub struct CsvFormatter<W: Write> {
    writer: W,
}

/// Optional report columns of one row
#[derive(Default)]
struct Row<'a> {
    archived_url: Option<&'a str>,
    redirect_url: Option<&'a str>,
    redirect_count: Option<u32>,
    response_code: Option<u16>,
}

impl<W: Write> CsvFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the formatter and returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, fields: &[&str]) -> OutputResult<()> {
        let record = fields
            .iter()
            .map(|field| quote(field))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.writer, "{}", record)?;
        Ok(())
    }

    fn write_item(&mut self, result: &str, item: &LinkedListItem, row: Row<'_>) -> OutputResult<()> {
        let redirect_count = row.redirect_count.map(|n| n.to_string()).unwrap_or_default();
        let response_code = row.response_code.map(|c| c.to_string()).unwrap_or_default();

        self.write_record(&[
            result,
            &item.source_page_url,
            &item.url,
            &item.title,
            row.archived_url.unwrap_or_default(),
            row.redirect_url.unwrap_or_default(),
            &redirect_count,
            &response_code,
        ])
    }
}

/// Quotes a field when it contains a delimiter, quote, or line break
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

impl<W: Write> Formatter for CsvFormatter<W> {
    fn start(&mut self) -> OutputResult<()> {
        self.write_record(&CSV_HEADER)
    }

    fn available(&mut self, item: &LinkedListItem) -> OutputResult<()> {
        self.write_item(
            "Reachable",
            item,
            Row {
                response_code: Some(200),
                ..Row::default()
            },
        )
    }

    fn redirected(&mut self, item: &LinkedListItem, final_url: &str) -> OutputResult<()> {
        self.write_item(
            "Redirected",
            item,
            Row {
                redirect_url: Some(final_url),
                ..Row::default()
            },
        )
    }

    fn too_many_redirects(
        &mut self,
        item: &LinkedListItem,
        last_url: &str,
        hop_count: u32,
    ) -> OutputResult<()> {
        self.write_item(
            "Too Many Redirects",
            item,
            Row {
                redirect_url: Some(last_url),
                redirect_count: Some(hop_count),
                ..Row::default()
            },
        )
    }

    fn server_problem(
        &mut self,
        item: &LinkedListItem,
        status_code: u16,
        archived_url: Option<&str>,
    ) -> OutputResult<()> {
        self.write_item(
            "Server Problem",
            item,
            Row {
                archived_url,
                response_code: Some(status_code),
                ..Row::default()
            },
        )
    }

    fn connection_problem(
        &mut self,
        item: &LinkedListItem,
        _message: &str,
        archived_url: Option<&str>,
    ) -> OutputResult<()> {
        self.write_item(
            "Connection Problem",
            item,
            Row {
                archived_url,
                ..Row::default()
            },
        )
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
