//! The reconstructed line/word model of a document.
//!
//! Coordinates are top-down page points: y grows toward the bottom of the
//! page. Sources that read PDF bottom-up coordinates flip them at ingest.

use serde::Serialize;

/// A single positioned character produced by a geometry source.
#[derive(Debug, Clone, PartialEq)]
pub struct Char {
    /// Character text (one grapheme; may be a space).
    pub text: String,
    /// Left edge.
    pub x0: f64,
    /// Right edge.
    pub x1: f64,
    /// Vertical center.
    pub y: f64,
    /// Glyph height.
    pub height: f64,
    /// Effective font size at this glyph.
    pub font_size: f64,
}

impl Char {
    /// Horizontal center of the glyph box.
    pub fn x_center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    /// Whether this character is a literal space.
    pub fn is_space(&self) -> bool {
        self.text == " "
    }
}

/// Axis-aligned bounding box in top-down page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

impl From<&Char> for BBox {
    fn from(c: &Char) -> Self {
        BBox {
            x0: c.x0,
            y0: c.y - c.height / 2.0,
            x1: c.x1,
            y1: c.y + c.height / 2.0,
        }
    }
}

/// A run of non-space characters inside a line.
#[derive(Debug, Clone, Serialize)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
    /// Index of the containing line on its page.
    pub line_index: usize,
    /// Index of this word within its line.
    pub word_index: usize,
}

/// An ordered sequence of words sharing a vertical band.
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub words: Vec<Word>,
    /// Dominant vertical position of the line's words.
    pub y_position: f64,
    /// Index of this line on its page.
    pub line_index: usize,
}

impl Line {
    /// The reconstructed text of the line, words joined with single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One page of reconstructed lines, ordered top to bottom.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Zero-based source page index.
    pub index: usize,
    pub lines: Vec<Line>,
}

/// A whole reconstructed document, pages in source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    /// Full reconstructed text, pages separated by blank lines.
    pub fn text(&self) -> String {
        self.pages
            .iter()
            .map(|p| {
                p.lines
                    .iter()
                    .map(|l| l.text())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
