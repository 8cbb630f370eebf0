//! Extraction rules: `keyword:direction:distance:type`.

mod extractor;

pub use extractor::{Anchor, PatternExtractor};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Where to move from the keyword anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Above,
    Below,
}

impl FromStr for Direction {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "above" => Ok(Direction::Above),
            "below" => Ok(Direction::Below),
            other => Err(RuleError::BadDirection(other.to_string())),
        }
    }
}

/// What to pull out of the resolved target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractKind {
    /// The single target word.
    Word,
    /// First numeric substring of the target, normalized.
    Number,
    /// The full target line.
    Line,
    /// All words from the target to the line edge, joined.
    Text,
}

impl FromStr for ExtractKind {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" => Ok(ExtractKind::Word),
            "number" => Ok(ExtractKind::Number),
            "line" => Ok(ExtractKind::Line),
            "text" => Ok(ExtractKind::Text),
            other => Err(RuleError::BadKind(other.to_string())),
        }
    }
}

/// One parsed extraction rule. Immutable after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Keyword to anchor on (matched case-insensitively).
    pub keyword: String,
    pub direction: Direction,
    /// Words (left/right) or lines (above/below) to skip past the anchor.
    pub distance: usize,
    pub extract: ExtractKind,
}

impl Rule {
    /// Parse one `keyword:direction:distance:type` rule.
    ///
    /// The three rightmost colons delimit the fields, so the keyword itself
    /// may contain colons ("Total::right:0:number" anchors on "Total:").
    pub fn parse(input: &str) -> Result<Rule, RuleError> {
        let trimmed = input.trim();
        let mut fields = trimmed.rsplitn(4, ':');
        let kind = fields.next();
        let distance = fields.next();
        let direction = fields.next();
        let keyword = fields.next();

        let (Some(kind), Some(distance), Some(direction), Some(keyword)) =
            (kind, distance, direction, keyword)
        else {
            return Err(RuleError::FieldCount(trimmed.to_string()));
        };

        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(RuleError::EmptyKeyword);
        }

        let distance = distance
            .trim()
            .parse::<usize>()
            .map_err(|_| RuleError::BadDistance(distance.trim().to_string()))?;

        Ok(Rule {
            keyword: keyword.to_string(),
            direction: direction.trim().parse()?,
            distance,
            extract: kind.trim().parse()?,
        })
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::parse(s)
    }
}

/// Parse a rules file: one rule per line, `#` comments and blank lines
/// skipped. Malformed lines are collected with their line numbers; the
/// remaining rules still apply.
pub fn parse_rules(content: &str) -> (Vec<Rule>, Vec<RuleError>) {
    let mut rules = Vec::new();
    let mut errors = Vec::new();

    for (number, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match Rule::parse(line) {
            Ok(rule) => rules.push(rule),
            Err(source) => errors.push(RuleError::AtLine {
                line: number + 1,
                source: Box::new(source),
            }),
        }
    }
    (rules, errors)
}

/// Outcome of resolving one rule against one document. Absence (keyword not
/// found, offset out of bounds, no numeric substring) is a normal unmatched
/// result, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub value: String,
    pub matched: bool,
}

impl Extraction {
    pub fn found(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            matched: true,
        }
    }

    pub fn none() -> Self {
        Self {
            value: String::new(),
            matched: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_basic_rule() {
        let rule = Rule::parse("Invoice Number:right:0:word").unwrap();
        assert_eq!(rule.keyword, "Invoice Number");
        assert_eq!(rule.direction, Direction::Right);
        assert_eq!(rule.distance, 0);
        assert_eq!(rule.extract, ExtractKind::Word);
    }

    #[test]
    fn keyword_may_contain_colons() {
        let rule = Rule::parse("Total::right:0:number").unwrap();
        assert_eq!(rule.keyword, "Total:");
        assert_eq!(rule.extract, ExtractKind::Number);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let rule = Rule::parse("  Due Date : below : 1 : line  ").unwrap();
        assert_eq!(rule.keyword, "Due Date");
        assert_eq!(rule.direction, Direction::Below);
        assert_eq!(rule.distance, 1);
        assert_eq!(rule.extract, ExtractKind::Line);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(matches!(
            Rule::parse("Total:right:word"),
            Err(RuleError::FieldCount(_))
        ));
    }

    #[test]
    fn rejects_bad_direction_distance_and_kind() {
        assert!(matches!(
            Rule::parse("Total:sideways:0:word"),
            Err(RuleError::BadDirection(_))
        ));
        assert!(matches!(
            Rule::parse("Total:right:-1:word"),
            Err(RuleError::BadDistance(_))
        ));
        assert!(matches!(
            Rule::parse("Total:right:two:word"),
            Err(RuleError::BadDistance(_))
        ));
        assert!(matches!(
            Rule::parse("Total:right:0:sentence"),
            Err(RuleError::BadKind(_))
        ));
    }

    #[test]
    fn rules_file_skips_comments_and_recovers_from_bad_lines() {
        let content = "\
# invoice fields
Invoice Number:right:0:word

Total:right:0:number
Date:nowhere:0:word
Description:right:0:text
";
        let (rules, errors) = parse_rules(content);
        assert_eq!(rules.len(), 3);
        assert_eq!(errors.len(), 1);
        let message = errors[0].to_string();
        assert!(message.starts_with("line 5:"), "got: {message}");
    }
}
