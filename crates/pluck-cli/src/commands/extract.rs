//! Extract command - run rules against a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use pluck_core::{open_source, PatternExtractor, Reconstructor};

use super::{collect_rules, load_config, rule_headers};
use crate::output::{write_tsv, write_tsv_to};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Inline rule `keyword:direction:distance:type` (repeatable)
    #[arg(short, long = "rule")]
    rules: Vec<String>,

    /// File containing rules, one per line
    #[arg(long)]
    rules_file: Option<PathBuf>,

    /// Custom column headers (default: rule keywords)
    #[arg(long, num_args = 1..)]
    headers: Option<Vec<String>>,

    /// Output TSV file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let rules = collect_rules(&args.rules, args.rules_file.as_deref())?;
    let headers = rule_headers(&rules, args.headers.as_deref())?;

    info!("Processing file: {}", args.input.display());

    let data = fs::read(&args.input)?;
    let source = open_source(config.source.kind, &data)?;
    let document = Reconstructor::new(&config).document(source.as_ref())?;
    debug!("reconstructed {} pages", document.pages.len());

    let extractor = PatternExtractor::new();
    let mut row = vec![args.input.display().to_string()];
    for rule in &rules {
        row.push(extractor.extract(&document, rule).value);
    }

    if let Some(output_path) = &args.output {
        write_tsv(output_path, &headers, &[row])?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        write_tsv_to(std::io::stdout().lock(), &headers, &[row])?;
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
