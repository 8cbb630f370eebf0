//! Regex spacing repair for the degraded plain-text path.
//!
//! Without character geometry the only evidence of a missing space is the
//! text itself. An ordered rule list is applied repeatedly until no rule
//! fires or the pass cap is hit, so the repair always terminates.

use lazy_static::lazy_static;
use regex::Regex;

/// Upper bound on repair passes over one line.
const MAX_PASSES: usize = 8;

lazy_static! {
    /// Ordered (pattern, replacement) repair rules. Conservative on
    /// purpose: identifiers like INV-2024-001 and decimals must survive.
    static ref REPAIR_RULES: Vec<(Regex, &'static str)> = vec![
        // camel-case seam: "AmountDue" -> "Amount Due"
        (Regex::new(r"([a-z])([A-Z])").unwrap(), "$1 $2"),
        // label colon glued to its value: "Total:1,234" -> "Total: 1,234"
        (Regex::new(r"([A-Za-z]):([A-Za-z0-9])").unwrap(), "$1: $2"),
        // letter running into a digit: "Qty2" -> "Qty 2"
        (Regex::new(r"([a-z])(\d)").unwrap(), "$1 $2"),
    ];
}

/// Repair concatenation errors in one line of pre-tokenized text.
pub fn repair_spacing(line: &str) -> String {
    let mut text = line.to_string();
    for _ in 0..MAX_PASSES {
        let mut changed = false;
        for (pattern, replacement) in REPAIR_RULES.iter() {
            let repaired = pattern.replace_all(&text, *replacement);
            if repaired != text {
                text = repaired.into_owned();
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    text
}
