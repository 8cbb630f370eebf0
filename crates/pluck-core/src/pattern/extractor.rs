//! Directional pattern extraction over the reconstructed document model.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::models::document::{Document, Line};
use crate::pattern::{Direction, ExtractKind, Extraction, Rule};

lazy_static! {
    /// Numeric substring: digits with optional comma thousands groups and an
    /// optional decimal part. Signs and currency symbols stay outside the
    /// match; a directly preceding minus is re-attached afterwards when it
    /// is not part of an identifier.
    static ref NUMBER: Regex =
        Regex::new(r"(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?").unwrap();
}

/// How many words past the target a `number` extraction may look before
/// giving up (covers detached currency symbols).
const NUMBER_LOOKAHEAD: usize = 3;

/// Location of a keyword match in the line/word model. A keyword may span
/// several consecutive words on one line; it never crosses lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub page: usize,
    pub line: usize,
    pub first_word: usize,
    pub last_word: usize,
}

/// Resolved target of a directional offset.
enum Target<'a> {
    /// A word at an index within a line (left/right moves).
    Word(&'a Line, usize),
    /// A whole line (above/below moves).
    Line(&'a Line),
}

/// Resolves extraction rules against a document. Pure: absence of a match
/// is an unmatched result, never an error.
#[derive(Debug, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Resolve one rule. Every failure mode (keyword absent, offset out of
    /// bounds, no numeric substring) comes back as `Extraction::none()`.
    pub fn extract(&self, document: &Document, rule: &Rule) -> Extraction {
        let Some(anchor) = self.find_anchor(document, &rule.keyword) else {
            trace!("keyword {:?} not found", rule.keyword);
            return Extraction::none();
        };

        let Some(target) = resolve_target(document, anchor, rule) else {
            trace!("offset out of bounds for keyword {:?}", rule.keyword);
            return Extraction::none();
        };

        match (rule.extract, target) {
            (ExtractKind::Word, Target::Word(line, index)) => {
                Extraction::found(line.words[index].text.clone())
            }
            // Above/below land on a line; the word form takes its first word.
            (ExtractKind::Word, Target::Line(line)) => line
                .words
                .first()
                .map(|w| Extraction::found(w.text.clone()))
                .unwrap_or_else(Extraction::none),
            (ExtractKind::Number, Target::Word(line, index)) => {
                let window_end = (index + NUMBER_LOOKAHEAD).min(line.words.len());
                line.words[index..window_end]
                    .iter()
                    .find_map(|w| extract_number(&w.text))
                    .map_or_else(Extraction::none, Extraction::found)
            }
            (ExtractKind::Number, Target::Line(line)) => extract_number(&line.text())
                .map_or_else(Extraction::none, Extraction::found),
            (ExtractKind::Line, Target::Word(line, _)) | (ExtractKind::Line, Target::Line(line)) => {
                Extraction::found(line.text())
            }
            (ExtractKind::Text, Target::Word(line, index)) => {
                let slice = match rule.direction {
                    Direction::Left => &line.words[..=index],
                    _ => &line.words[index..],
                };
                Extraction::found(
                    slice
                        .iter()
                        .map(|w| w.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" "),
                )
            }
            (ExtractKind::Text, Target::Line(line)) => Extraction::found(line.text()),
        }
    }

    /// Find the first keyword match in document order.
    ///
    /// Matching is case-insensitive against the concatenated text of a
    /// consecutive-word window, with whitespace removed from the keyword, so
    /// "Invoice Number" anchors equally on `["Invoice", "Number:"]` and on a
    /// reconstruction that kept `["InvoiceNumber:"]` glued. One trailing
    /// colon on the keyword or on the window's last word is tolerated.
    pub fn find_anchor(&self, document: &Document, keyword: &str) -> Option<Anchor> {
        let needle = normalize_keyword(keyword);
        if needle.is_empty() {
            return None;
        }

        for (page_index, page) in document.pages.iter().enumerate() {
            for (line_index, line) in page.lines.iter().enumerate() {
                for first_word in 0..line.words.len() {
                    let mut window = String::new();
                    for (offset, word) in line.words[first_word..].iter().enumerate() {
                        window.push_str(&word.text.to_lowercase());
                        let candidate = window.strip_suffix(':').unwrap_or(&window);
                        if candidate == needle {
                            return Some(Anchor {
                                page: page_index,
                                line: line_index,
                                first_word,
                                last_word: first_word + offset,
                            });
                        }
                        if window.len() > needle.len() + 1 {
                            break;
                        }
                    }
                }
            }
        }
        None
    }
}

/// Apply the rule's direction and distance to the anchor. `None` on any
/// bounds failure; lines never wrap and pages are never crossed.
fn resolve_target<'a>(document: &'a Document, anchor: Anchor, rule: &Rule) -> Option<Target<'a>> {
    let page = &document.pages[anchor.page];
    let line = &page.lines[anchor.line];

    match rule.direction {
        Direction::Right => {
            let index = anchor.last_word + rule.distance + 1;
            (index < line.words.len()).then_some(Target::Word(line, index))
        }
        Direction::Left => {
            let index = anchor.first_word.checked_sub(rule.distance + 1)?;
            Some(Target::Word(line, index))
        }
        Direction::Below => {
            let index = anchor.line + rule.distance + 1;
            page.lines.get(index).map(Target::Line)
        }
        Direction::Above => {
            let index = anchor.line.checked_sub(rule.distance + 1)?;
            Some(Target::Line(&page.lines[index]))
        }
    }
}

/// Lowercase, trim, strip one trailing colon, drop internal whitespace.
fn normalize_keyword(keyword: &str) -> String {
    let lowered = keyword.trim().to_lowercase();
    let stripped = lowered.strip_suffix(':').unwrap_or(&lowered);
    stripped.split_whitespace().collect()
}

/// First maximal numeric substring of `text`, normalized: thousands commas
/// removed, decimal point kept, a directly preceding free-standing minus
/// kept. Currency symbols never match. `None` when no digits occur.
fn extract_number(text: &str) -> Option<String> {
    let found = NUMBER.find(text)?;
    let mut value = found.as_str().replace(',', "");

    let before = &text[..found.start()];
    if let Some(prefix) = before.strip_suffix('-') {
        // "-12.5" keeps its sign; the dash in "INV-2024" does not.
        if prefix.chars().next_back().is_none_or(|c| !c.is_alphanumeric()) {
            value.insert(0, '-');
        }
    }
    Some(value)
}
