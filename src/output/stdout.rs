use crate::feed::LinkedListItem;
use crate::output::traits::{Formatter, OutputResult};
use std::io::Write;

/// Plain-text report, one line per item
pub struct StdoutFormatter<W: Write> {
    writer: W,
}

impl<W: Write> StdoutFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the formatter and returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn line(&mut self, item: &LinkedListItem, text: &str) -> OutputResult<()> {
        writeln!(self.writer, "[{}] {}", item.source_page_url, text)?;
        Ok(())
    }
}

fn with_archive(text: String, archived_url: Option<&str>) -> String {
    match archived_url {
        Some(archived) => format!("{}. Last Valid Web Archive URL is {}", text, archived),
        None => text,
    }
}

impl<W: Write> Formatter for StdoutFormatter<W> {
    fn available(&mut self, item: &LinkedListItem) -> OutputResult<()> {
        let text = format!("Found {}. Link is still good!", item.url);
        self.line(item, &text)
    }

    fn redirected(&mut self, item: &LinkedListItem, final_url: &str) -> OutputResult<()> {
        let text = format!("Linked list item redirected {} -> {}", item.url, final_url);
        self.line(item, &text)
    }

    fn too_many_redirects(
        &mut self,
        item: &LinkedListItem,
        last_url: &str,
        hop_count: u32,
    ) -> OutputResult<()> {
        let text = format!(
            "Linked list item redirected too many ({}) times {} -> {}",
            hop_count, item.url, last_url
        );
        self.line(item, &text)
    }

    fn server_problem(
        &mut self,
        item: &LinkedListItem,
        status_code: u16,
        archived_url: Option<&str>,
    ) -> OutputResult<()> {
        let text = with_archive(
            format!("Could not connect to {}. Code {}", item.url, status_code),
            archived_url,
        );
        self.line(item, &text)
    }

    fn connection_problem(
        &mut self,
        item: &LinkedListItem,
        message: &str,
        archived_url: Option<&str>,
    ) -> OutputResult<()> {
        let text = with_archive(
            format!("Could not connect to {}. {}", item.url, message),
            archived_url,
        );
        self.line(item, &text)
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
