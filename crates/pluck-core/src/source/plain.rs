//! Degraded plain-text source.
//!
//! Uses the stock per-page text extraction, trading positional precision for
//! working on any document the library can read. Spacing repair for this
//! path lives in `text::heuristics`.

use tracing::debug;

use super::{PageContent, PageSource};
use crate::error::SourceError;

/// PDF source yielding pre-tokenized text lines per page.
#[derive(Default)]
pub struct PlainTextSource {
    pages: Vec<Vec<String>>,
}

impl PlainTextSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageSource for PlainTextSource {
    fn load(&mut self, data: &[u8]) -> Result<(), SourceError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(data)
            .map_err(|e| SourceError::TextExtraction(e.to_string()))?;

        if pages.is_empty() {
            return Err(SourceError::NoPages);
        }

        debug!("extracted text for {} pages", pages.len());
        self.pages = pages.iter().map(|text| page_lines(text)).collect();
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_page(&self, index: usize) -> Result<PageContent, SourceError> {
        self.pages
            .get(index)
            .cloned()
            .map(PageContent::Lines)
            .ok_or(SourceError::InvalidPage(index))
    }
}

/// Split one page of extracted text into trimmed, non-empty lines.
fn page_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_lines_drops_blank_lines_and_trims() {
        let lines = page_lines("  Invoice 42\n\n   \nTotal: 9.99  \n");
        assert_eq!(lines, vec!["Invoice 42", "Total: 9.99"]);
    }

    #[test]
    fn unreadable_bytes_are_a_text_extraction_error() {
        let mut source = PlainTextSource::new();
        assert!(matches!(
            source.load(b"definitely not a pdf"),
            Err(SourceError::TextExtraction(_))
        ));
    }
}
