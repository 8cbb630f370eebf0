//! Geometry sources: pluggable backends that turn document bytes into
//! per-page character streams or pre-tokenized text lines.

mod geometry;
mod plain;

pub use geometry::GeometrySource;
pub use plain::PlainTextSource;

use crate::error::SourceError;
use crate::models::config::SourceKind;
use crate::models::document::Char;

/// What one page yields: full character geometry, or plain text lines when
/// positional data is unavailable (degraded mode).
#[derive(Debug, Clone)]
pub enum PageContent {
    Chars(Vec<Char>),
    Lines(Vec<String>),
}

/// A loaded document that can be read page by page.
pub trait PageSource {
    /// Load a document from bytes.
    fn load(&mut self, data: &[u8]) -> Result<(), SourceError>;

    /// Number of pages in the loaded document.
    fn page_count(&self) -> usize;

    /// Content of one page by zero-based index.
    fn extract_page(&self, index: usize) -> Result<PageContent, SourceError>;
}

/// Construct and load the configured source variant. Selection happens here,
/// by configuration, never by inspecting types downstream.
pub fn open_source(kind: SourceKind, data: &[u8]) -> Result<Box<dyn PageSource>, SourceError> {
    let mut source: Box<dyn PageSource> = match kind {
        SourceKind::Geometry => Box::new(GeometrySource::new()),
        SourceKind::Plain => Box::new(PlainTextSource::new()),
    };
    source.load(data)?;
    Ok(source)
}
