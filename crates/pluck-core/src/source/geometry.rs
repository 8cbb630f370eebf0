//! Character-level geometry source.
//!
//! Walks the PDF content streams through `pdf_extract`'s output device hook
//! and records one positioned character per glyph. Positions come from the
//! text rendering matrix; the media box flips them into top-down page
//! coordinates so downstream code never sees the PDF's bottom-up convention.

use pdf_extract::{output_doc, Document as LoadedPdf, MediaBox, OutputDev, OutputError, Transform};
use tracing::debug;

use super::{PageContent, PageSource};
use crate::error::SourceError;
use crate::models::document::Char;

/// PDF source with per-character geometry.
#[derive(Default)]
pub struct GeometrySource {
    pages: Vec<Vec<Char>>,
}

impl GeometrySource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageSource for GeometrySource {
    fn load(&mut self, data: &[u8]) -> Result<(), SourceError> {
        let doc = LoadedPdf::load_mem(data).map_err(|e| SourceError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(SourceError::Encrypted);
        }
        if doc.get_pages().is_empty() {
            return Err(SourceError::NoPages);
        }

        let mut collector = CharCollector::default();
        output_doc(&doc, &mut collector)
            .map_err(|e| SourceError::TextExtraction(e.to_string()))?;

        debug!(
            "collected {} characters across {} pages",
            collector.pages.iter().map(Vec::len).sum::<usize>(),
            collector.pages.len()
        );
        self.pages = collector.pages;
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_page(&self, index: usize) -> Result<PageContent, SourceError> {
        self.pages
            .get(index)
            .cloned()
            .map(PageContent::Chars)
            .ok_or(SourceError::InvalidPage(index))
    }
}

/// Output device that records positioned characters instead of writing text.
#[derive(Default)]
struct CharCollector {
    pages: Vec<Vec<Char>>,
    current: Vec<Char>,
    page_height: f64,
}

impl OutputDev for CharCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.page_height = media_box.ury - media_box.lly;
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.pages.push(std::mem::take(&mut self.current));
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        text: &str,
    ) -> Result<(), OutputError> {
        if text.is_empty() {
            return Ok(());
        }

        // Effective size: side of the square with the same area as the
        // font-size vector pushed through the text matrix.
        let scaled_x = font_size * (trm.m11 + trm.m21);
        let scaled_y = font_size * (trm.m12 + trm.m22);
        let size = (scaled_x * scaled_y).abs().sqrt();

        let x = trm.m31;
        let y = self.page_height - trm.m32;
        let advance = width * size;

        self.current.push(Char {
            text: text.to_string(),
            x0: x,
            x1: x + advance,
            y,
            height: size,
            font_size: size,
        });
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unloaded_source_has_no_pages() {
        let source = GeometrySource::new();
        assert_eq!(source.page_count(), 0);
        assert!(matches!(
            source.extract_page(0),
            Err(SourceError::InvalidPage(0))
        ));
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let mut source = GeometrySource::new();
        assert!(matches!(
            source.load(b"not a pdf"),
            Err(SourceError::Parse(_))
        ));
    }
}
