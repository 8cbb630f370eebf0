//! Center-distance text reconstruction.
//!
//! Machine-generated PDFs exhibit two spacing failures: words typeset with
//! wide glyph advances but no literal space character, and literal spaces
//! that are kerning artifacts rather than word boundaries. Both are repaired
//! here from character center positions before any keyword matching runs.

use tracing::debug;

use crate::models::config::{PluckConfig, SpacingConfig};
use crate::models::document::{BBox, Char, Document, Line, Page, Word};
use crate::source::{PageContent, PageSource};
use crate::text::repair_spacing;
use crate::SourceError;

/// Typical center-to-center advance for 12pt text, used when a line has too
/// few characters to measure.
const FALLBACK_SPACING: f64 = 4.8;

/// Spacings above this many points are layout gaps, not glyph advances, and
/// are excluded from the median.
const MAX_GLYPH_SPACING: f64 = 50.0;

/// Rebuilds pages of positioned characters into ordered lines of words.
pub struct Reconstructor {
    spacing: SpacingConfig,
    line_tolerance_ratio: f64,
    smart_spacing: bool,
}

impl Reconstructor {
    pub fn new(config: &PluckConfig) -> Self {
        Self {
            spacing: config.spacing,
            line_tolerance_ratio: config.reconstruct.line_tolerance_ratio,
            smart_spacing: config.source.smart_spacing,
        }
    }

    /// Reconstruct every page of a loaded source into a document model.
    pub fn document(&self, source: &dyn PageSource) -> Result<Document, SourceError> {
        let mut pages = Vec::with_capacity(source.page_count());
        for index in 0..source.page_count() {
            let page = match source.extract_page(index)? {
                PageContent::Chars(chars) => self.reconstruct_page(index, chars),
                PageContent::Lines(lines) => self.page_from_lines(index, &lines),
            };
            pages.push(page);
        }
        Ok(Document { pages })
    }

    /// Turn one page's raw character stream into ordered lines of words.
    pub fn reconstruct_page(&self, index: usize, mut chars: Vec<Char>) -> Page {
        chars.sort_by(|a, b| {
            a.y.total_cmp(&b.y).then_with(|| a.x0.total_cmp(&b.x0))
        });

        let groups = self.group_into_lines(chars);
        debug!("page {}: {} line groups", index, groups.len());

        let mut lines = Vec::new();
        for group in groups {
            if let Some(line) = self.build_line(lines.len(), group) {
                lines.push(line);
            }
        }
        Page { index, lines }
    }

    /// Build a page from pre-tokenized plain text (degraded mode). Words get
    /// empty boxes; the line index doubles as the vertical position.
    pub fn page_from_lines(&self, index: usize, raw_lines: &[String]) -> Page {
        let mut lines = Vec::new();
        for raw in raw_lines {
            let repaired;
            let text = if self.smart_spacing {
                repaired = repair_spacing(raw);
                repaired.as_str()
            } else {
                raw.as_str()
            };

            let tokens: Vec<&str> = text.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            let line_index = lines.len();
            let words = tokens
                .iter()
                .enumerate()
                .map(|(word_index, t)| Word {
                    text: (*t).to_string(),
                    bbox: BBox::new(0.0, line_index as f64, 0.0, line_index as f64),
                    line_index,
                    word_index,
                })
                .collect();
            lines.push(Line {
                words,
                y_position: line_index as f64,
                line_index,
            });
        }
        Page { index, lines }
    }

    /// Group vertically-sorted characters into line bands. A character joins
    /// the current band when its vertical center lies within a font-size
    /// fraction of the band's running center.
    fn group_into_lines(&self, chars: Vec<Char>) -> Vec<Vec<Char>> {
        let mut groups: Vec<Vec<Char>> = Vec::new();
        let mut current: Vec<Char> = Vec::new();
        let mut y_sum = 0.0f64;

        for c in chars {
            if current.is_empty() {
                y_sum = c.y;
                current.push(c);
                continue;
            }
            let running_y = y_sum / current.len() as f64;
            let tolerance = self.line_tolerance_ratio * c.font_size;
            if (c.y - running_y).abs() <= tolerance {
                y_sum += c.y;
                current.push(c);
            } else {
                groups.push(std::mem::take(&mut current));
                y_sum = c.y;
                current.push(c);
            }
        }
        if !current.is_empty() {
            groups.push(current);
        }
        groups
    }

    /// Classify the gaps of one line band and split it into words. Returns
    /// `None` when nothing but whitespace survives.
    fn build_line(&self, line_index: usize, mut chars: Vec<Char>) -> Option<Line> {
        chars.sort_by(|a, b| a.x0.total_cmp(&b.x0));

        let (add_space, min_space) = self.resolve_thresholds(&chars);

        let mut words: Vec<Word> = Vec::new();
        let mut text = String::new();
        let mut bbox: Option<BBox> = None;

        let flush = |text: &mut String, bbox: &mut Option<BBox>, words: &mut Vec<Word>| {
            if !text.is_empty() {
                words.push(Word {
                    text: std::mem::take(text),
                    bbox: bbox.take().unwrap_or(BBox::new(0.0, 0.0, 0.0, 0.0)),
                    line_index,
                    word_index: words.len(),
                });
            }
        };

        for i in 0..chars.len() {
            let c = &chars[i];
            if c.is_space() {
                if keep_space(&chars, i, min_space) {
                    flush(&mut text, &mut bbox, &mut words);
                }
                // dropped spaces contribute nothing
            } else {
                text.push_str(&c.text);
                let cb = BBox::from(c);
                bbox = Some(match bbox {
                    Some(b) => b.union(&cb),
                    None => cb,
                });
                if add_space_after(&chars, i, add_space) {
                    flush(&mut text, &mut bbox, &mut words);
                }
            }
        }
        flush(&mut text, &mut bbox, &mut words);

        if words.is_empty() {
            return None;
        }

        let y_sum: f64 = chars.iter().map(|c| c.y).sum();
        Some(Line {
            words,
            y_position: y_sum / chars.len() as f64,
            line_index,
        })
    }

    /// Resolve the configured spacing mode into concrete distances for one
    /// line. Ratio mode scales with the line's median glyph advance.
    fn resolve_thresholds(&self, chars: &[Char]) -> (f64, f64) {
        match self.spacing {
            SpacingConfig::Absolute { add_space, min_space } => (add_space, min_space),
            SpacingConfig::Ratio { add_space, min_space } => {
                let median = median_spacing(chars);
                (add_space * median, min_space * median)
            }
        }
    }
}

/// Median center-to-center spacing of adjacent non-space characters,
/// robust against wide layout gaps.
fn median_spacing(chars: &[Char]) -> f64 {
    let centers: Vec<f64> = chars
        .iter()
        .filter(|c| !c.is_space())
        .map(|c| c.x_center())
        .collect();
    if centers.len() < 2 {
        return FALLBACK_SPACING;
    }

    let mut spacings: Vec<f64> = centers
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|s| *s > 0.0 && *s < MAX_GLYPH_SPACING)
        .collect();
    if spacings.is_empty() {
        return FALLBACK_SPACING;
    }

    spacings.sort_by(f64::total_cmp);
    let mid = spacings.len() / 2;
    if spacings.len() % 2 == 0 {
        (spacings[mid - 1] + spacings[mid]) / 2.0
    } else {
        spacings[mid]
    }
}

/// A literal space survives only when the non-space characters around it are
/// strictly further apart than the minimum-space distance. Spaces at the
/// edges of a line are kept.
fn keep_space(chars: &[Char], space_index: usize, min_space: f64) -> bool {
    let prev = chars[..space_index].iter().rev().find(|c| !c.is_space());
    let next = chars[space_index + 1..].iter().find(|c| !c.is_space());

    match (prev, next) {
        (Some(p), Some(n)) => n.x_center() - p.x_center() > min_space,
        _ => true,
    }
}

/// A synthetic space goes after character `i` only when the next character
/// exists, is not already a space, and sits strictly further away than the
/// add-space distance. The literal-space check keeps reconstruction
/// idempotent on already-correct input.
fn add_space_after(chars: &[Char], i: usize, add_space: f64) -> bool {
    let Some(next) = chars.get(i + 1) else {
        return false;
    };
    if next.is_space() {
        return false;
    }
    next.x_center() - chars[i].x_center() > add_space
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Lay glyphs out on one baseline. `'_'` in the layout string becomes a
    /// wide gap (no character); a space becomes a literal space character
    /// occupying one slot.
    fn lay_out(layout: &str, pitch: f64, gap: f64, font_size: f64) -> Vec<Char> {
        let mut chars = Vec::new();
        let mut x = 0.0;
        for ch in layout.chars() {
            if ch == '_' {
                x += gap;
                continue;
            }
            chars.push(Char {
                text: ch.to_string(),
                x0: x,
                x1: x + pitch * 0.8,
                y: 10.0,
                height: font_size,
                font_size,
            });
            x += pitch;
        }
        chars
    }

    fn reconstructor() -> Reconstructor {
        Reconstructor::new(&PluckConfig::default())
    }

    fn line_words(page: &Page, index: usize) -> Vec<String> {
        page.lines[index].words.iter().map(|w| w.text.clone()).collect()
    }

    #[test]
    fn no_gaps_yield_a_single_word() {
        let page = reconstructor().reconstruct_page(0, lay_out("Subtotal", 5.0, 0.0, 10.0));
        assert_eq!(line_words(&page, 0), vec!["Subtotal"]);
    }

    #[test]
    fn wide_gap_inserts_exactly_one_space() {
        // Gap of 3 pitches between ':' and 'I': ratio 3.0 > 1.1 threshold.
        let chars = lay_out("InvoiceNumber:_INV-2024-001", 5.0, 15.0, 10.0);
        let page = reconstructor().reconstruct_page(0, chars);
        assert_eq!(line_words(&page, 0), vec!["InvoiceNumber:", "INV-2024-001"]);
    }

    #[test]
    fn tight_literal_space_is_dropped() {
        // A literal space between glyphs at uniform pitch: surrounding
        // centers are 2 pitches apart only because the space occupies a
        // slot; shrink it so the distance ratio falls at the threshold.
        let mut chars = lay_out("Sub Total", 5.0, 0.0, 10.0);
        // Pull everything after the space leftward so the glyphs around the
        // space are 1.2 pitches apart (<= 1.3 ratio -> removed).
        for c in chars.iter_mut().skip(4) {
            c.x0 -= 4.0;
            c.x1 -= 4.0;
        }
        let page = reconstructor().reconstruct_page(0, chars);
        assert_eq!(line_words(&page, 0), vec!["SubTotal"]);
    }

    #[test]
    fn real_literal_space_is_kept() {
        // Space slot leaves surrounding centers 2 pitches apart: 2.0 > 1.3.
        let page = reconstructor().reconstruct_page(0, lay_out("Sub Total", 5.0, 0.0, 10.0));
        assert_eq!(line_words(&page, 0), vec!["Sub", "Total"]);
    }

    #[test]
    fn reconstruction_is_idempotent_on_correct_text() {
        let chars = lay_out("Amount Due 1,234.56", 5.0, 0.0, 10.0);
        let first = reconstructor().reconstruct_page(0, chars.clone());
        let second = reconstructor().reconstruct_page(0, chars);
        let render = |p: &Page| p.lines.iter().map(Line::text).collect::<Vec<_>>();
        assert_eq!(render(&first), render(&second));
        assert_eq!(render(&first), vec!["Amount Due 1,234.56"]);
    }

    #[test]
    fn characters_group_into_lines_by_font_relative_tolerance() {
        let mut chars = lay_out("Top", 5.0, 0.0, 10.0);
        let mut below = lay_out("Bottom", 5.0, 0.0, 10.0);
        for c in below.iter_mut() {
            c.y = 24.0; // 14pt below: outside 0.3 * 10pt tolerance
        }
        chars.extend(below);
        let page = reconstructor().reconstruct_page(0, chars);
        assert_eq!(page.lines.len(), 2);
        assert_eq!(line_words(&page, 0), vec!["Top"]);
        assert_eq!(line_words(&page, 1), vec!["Bottom"]);
    }

    #[test]
    fn line_ordering_is_monotonic_top_down() {
        // Feed lines out of order; the model must come back sorted.
        let mut chars = Vec::new();
        for (text, y) in [("second", 30.0), ("first", 12.0), ("third", 55.0)] {
            let mut line = lay_out(text, 5.0, 0.0, 10.0);
            for c in line.iter_mut() {
                c.y = y;
            }
            chars.extend(line);
        }
        let page = reconstructor().reconstruct_page(0, chars);
        let ys: Vec<f64> = page.lines.iter().map(|l| l.y_position).collect();
        assert!(ys.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(line_words(&page, 0), vec!["first"]);
    }

    #[test]
    fn whitespace_only_band_is_dropped() {
        let chars = vec![Char {
            text: " ".into(),
            x0: 0.0,
            x1: 4.0,
            y: 10.0,
            height: 10.0,
            font_size: 10.0,
        }];
        let page = reconstructor().reconstruct_page(0, chars);
        assert!(page.lines.is_empty());
    }

    #[test]
    fn absolute_mode_uses_fixed_distances() {
        let config = PluckConfig {
            spacing: SpacingConfig::Absolute {
                add_space: 8.0,
                min_space: 6.0,
            },
            ..Default::default()
        };
        // Pitch 5.0: no centers are more than 8pt apart, nothing is added.
        let page = Reconstructor::new(&config).reconstruct_page(0, lay_out("ABCD", 5.0, 0.0, 10.0));
        assert_eq!(line_words(&page, 0), vec!["ABCD"]);

        // A 12pt hole clears the 8pt fixed threshold.
        let page = Reconstructor::new(&config).reconstruct_page(0, lay_out("AB_CD", 5.0, 12.0, 10.0));
        assert_eq!(line_words(&page, 0), vec!["AB", "CD"]);
    }

    #[test]
    fn word_bbox_is_the_union_of_member_glyphs() {
        let page = reconstructor().reconstruct_page(0, lay_out("Net", 5.0, 0.0, 10.0));
        let bbox = page.lines[0].words[0].bbox;
        assert_eq!(bbox.x0, 0.0);
        assert_eq!(bbox.x1, 10.0 + 5.0 * 0.8);
    }

    #[test]
    fn degraded_lines_become_words_by_whitespace() {
        let r = reconstructor();
        let page = r.page_from_lines(0, &["Amount Due  1,234.56".to_string(), "  ".to_string()]);
        assert_eq!(page.lines.len(), 1);
        assert_eq!(line_words(&page, 0), vec!["Amount", "Due", "1,234.56"]);
    }

    #[test]
    fn word_and_line_indices_are_dense() {
        let chars = lay_out("a b_c", 5.0, 20.0, 10.0);
        let page = reconstructor().reconstruct_page(0, chars);
        for line in &page.lines {
            for (i, w) in line.words.iter().enumerate() {
                assert_eq!(w.word_index, i);
                assert_eq!(w.line_index, line.line_index);
            }
        }
    }
}
