//! Error types for the pluck-core library.

use thiserror::Error;

/// Main error type for the pluck library.
#[derive(Error, Debug)]
pub enum PluckError {
    /// Geometry source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Extraction rule error.
    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised when a geometry source cannot produce a character or
/// line stream. Reported per file; a batch run continues past them.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to open/parse the document.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to walk the content streams for text.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The document is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The document is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page index requested.
    #[error("invalid page index: {0}")]
    InvalidPage(usize),
}

/// Errors raised when an extraction rule fails the
/// `keyword:direction:distance:type` contract. The offending rule is
/// skipped; other rules still apply.
#[derive(Error, Debug)]
pub enum RuleError {
    /// Wrong number of colon-separated fields.
    #[error("rule must have format 'keyword:direction:distance:type', got: {0}")]
    FieldCount(String),

    /// Unknown direction token.
    #[error("direction must be one of left, right, above, below, got: {0}")]
    BadDirection(String),

    /// Distance is not a non-negative integer.
    #[error("distance must be a non-negative integer, got: {0}")]
    BadDistance(String),

    /// Unknown extract type token.
    #[error("extract type must be one of word, number, line, text, got: {0}")]
    BadKind(String),

    /// Empty keyword after trimming.
    #[error("rule keyword is empty")]
    EmptyKeyword,

    /// A rule line in a rules file failed to parse.
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<RuleError>,
    },
}

/// Result type for the pluck library.
pub type Result<T> = std::result::Result<T, PluckError>;
