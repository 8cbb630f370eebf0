//! Batch command - run rules across many documents.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use pluck_core::{open_source, Document, PatternExtractor, PluckConfig, Reconstructor, Rule};

use super::{collect_rules, load_config, rule_headers};
use crate::output::write_tsv;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Inline rule `keyword:direction:distance:type` (repeatable)
    #[arg(short, long = "rule")]
    rules: Vec<String>,

    /// File containing rules, one per line
    #[arg(long)]
    rules_file: Option<PathBuf>,

    /// Custom column headers (default: rule keywords)
    #[arg(long, num_args = 1..)]
    headers: Option<Vec<String>>,

    /// Output TSV file
    #[arg(short, long, default_value = "extracted_data.tsv")]
    output: PathBuf,

    /// Write one TSV per document (invoice.pdf -> invoice.tsv) instead
    #[arg(long)]
    split_output: bool,

    /// Output directory for split files
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    row: Vec<String>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let rules = collect_rules(&args.rules, args.rules_file.as_deref())?;
    let headers = rule_headers(&rules, args.headers.as_deref())?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Each file owns its model exclusively; one row per document either way.
    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let result = match process_file(&path, &rules, &config) {
            Ok(row) => FileResult {
                path,
                row,
                error: None,
            },
            Err(e) => {
                let message = e.to_string();
                warn!("Failed to process {}: {}", path.display(), message);
                // Degrade every cell to empty; the batch keeps going.
                let mut row = vec![path.display().to_string()];
                row.resize(1 + rules.len(), String::new());
                FileResult {
                    path,
                    row,
                    error: Some(message),
                }
            }
        };
        results.push(result);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.split_output {
        for result in &results {
            if result.error.is_some() {
                continue;
            }
            let stem = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document");
            let file_name = format!("{stem}.tsv");
            let output_path = match &args.output_dir {
                Some(dir) => dir.join(file_name),
                None => result.path.with_file_name(file_name),
            };
            write_tsv(&output_path, &headers, std::slice::from_ref(&result.row))?;
            debug!("Wrote output to {}", output_path.display());
        }
    } else {
        let rows: Vec<Vec<String>> = results.iter().map(|r| r.row.clone()).collect();
        write_tsv(&args.output, &headers, &rows)?;
        println!(
            "{} Results written to {}",
            style("✓").green(),
            args.output.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Reconstruct one document and resolve every rule against it.
fn process_file(
    path: &PathBuf,
    rules: &[Rule],
    config: &PluckConfig,
) -> anyhow::Result<Vec<String>> {
    let data = fs::read(path)?;
    let source = open_source(config.source.kind, &data)?;
    let document: Document = Reconstructor::new(config).document(source.as_ref())?;

    let extractor = PatternExtractor::new();
    let mut row = vec![path.display().to_string()];
    for rule in rules {
        row.push(extractor.extract(&document, rule).value);
    }
    Ok(row)
}
