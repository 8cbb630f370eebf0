//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod dump;
pub mod extract;

use std::path::Path;

use console::style;
use pluck_core::{parse_rules, PluckConfig, Rule};

/// Load the pipeline configuration, defaults when no file is given.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PluckConfig> {
    match config_path {
        Some(path) => Ok(PluckConfig::from_file(Path::new(path))?),
        None => Ok(PluckConfig::default()),
    }
}

/// Collect rules from inline `--rule` flags or a rules file. File parse
/// errors are reported per line and the offending rules skipped; the batch
/// still runs with whatever parsed.
pub fn collect_rules(
    inline: &[String],
    rules_file: Option<&Path>,
) -> anyhow::Result<Vec<Rule>> {
    let mut rules = Vec::new();

    for raw in inline {
        rules.push(Rule::parse(raw).map_err(|e| anyhow::anyhow!("bad --rule {raw:?}: {e}"))?);
    }

    if let Some(path) = rules_file {
        let content = std::fs::read_to_string(path)?;
        let (parsed, errors) = parse_rules(&content);
        for error in &errors {
            eprintln!(
                "{} {}: {}",
                style("!").yellow(),
                path.display(),
                error
            );
        }
        rules.extend(parsed);
    }

    if rules.is_empty() {
        anyhow::bail!("no valid extraction rules specified");
    }
    Ok(rules)
}

/// Column headers: filename plus one column per rule, labeled with the
/// keyword unless `--headers` overrides them.
pub fn rule_headers(rules: &[Rule], overrides: Option<&[String]>) -> anyhow::Result<Vec<String>> {
    let mut headers = vec!["filename".to_string()];
    match overrides {
        Some(labels) => {
            if labels.len() != rules.len() {
                anyhow::bail!(
                    "number of headers ({}) must match number of rules ({})",
                    labels.len(),
                    rules.len()
                );
            }
            headers.extend(labels.iter().cloned());
        }
        None => headers.extend(rules.iter().map(|r| r.keyword.clone())),
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_default_to_keywords() {
        let rules = vec![
            Rule::parse("Invoice Number:right:0:word").unwrap(),
            Rule::parse("Total:right:0:number").unwrap(),
        ];
        let headers = rule_headers(&rules, None).unwrap();
        assert_eq!(headers, vec!["filename", "Invoice Number", "Total"]);
    }

    #[test]
    fn header_override_must_match_rule_count() {
        let rules = vec![Rule::parse("Total:right:0:number").unwrap()];
        assert!(rule_headers(&rules, Some(&["a".to_string(), "b".to_string()])).is_err());
        let headers = rule_headers(&rules, Some(&["Amount".to_string()])).unwrap();
        assert_eq!(headers, vec!["filename", "Amount"]);
    }
}
