//! Core library for positional PDF field extraction.
//!
//! This crate provides:
//! - Geometry sources (character-level and plain-text PDF backends)
//! - Text reconstruction (line grouping and center-distance spacing repair)
//! - Directional extraction rules (`keyword:direction:distance:type`)
//! - A pattern extractor resolving rules against the reconstructed model

pub mod error;
pub mod models;
pub mod pattern;
pub mod source;
pub mod text;

pub use error::{PluckError, Result, RuleError, SourceError};
pub use models::config::{PluckConfig, ReconstructConfig, SourceConfig, SourceKind, SpacingConfig};
pub use models::document::{BBox, Char, Document, Line, Page, Word};
pub use pattern::{parse_rules, Direction, ExtractKind, Extraction, PatternExtractor, Rule};
pub use source::{open_source, GeometrySource, PageContent, PageSource, PlainTextSource};
pub use text::Reconstructor;
