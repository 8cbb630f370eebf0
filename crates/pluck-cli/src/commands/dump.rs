//! Dump command - reconstructed text content, one row per page.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use glob::glob;
use tracing::warn;

use pluck_core::{open_source, Line, Reconstructor};

use super::load_config;
use crate::output::{write_tsv, write_tsv_to};

/// Arguments for the dump command.
#[derive(Args)]
pub struct DumpArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output TSV file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write one TSV per document instead
    #[arg(long)]
    split_output: bool,
}

pub async fn run(args: DumpArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

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

    let headers = vec![
        "filename".to_string(),
        "page".to_string(),
        "text_content".to_string(),
    ];
    let reconstructor = Reconstructor::new(&config);

    let mut all_rows = Vec::new();
    let mut processed = 0usize;

    for path in &files {
        let rows = match dump_file(path, &reconstructor, &config) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                eprintln!("{} {}: {}", style("!").yellow(), path.display(), e);
                continue;
            }
        };
        processed += 1;

        if args.split_output {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document");
            let output_path = path.with_file_name(format!("{stem}.tsv"));
            write_tsv(&output_path, &headers, &rows)?;
        } else {
            all_rows.extend(rows);
        }
    }

    if !args.split_output {
        if all_rows.is_empty() {
            anyhow::bail!("No text could be extracted from any files");
        }
        match &args.output {
            Some(path) => {
                write_tsv(path, &headers, &all_rows)?;
                println!(
                    "{} Text dump written to {}",
                    style("✓").green(),
                    path.display()
                );
            }
            None => write_tsv_to(std::io::stdout().lock(), &headers, &all_rows)?,
        }
    }

    if processed == 0 {
        anyhow::bail!("No files could be processed");
    }

    Ok(())
}

fn dump_file(
    path: &PathBuf,
    reconstructor: &Reconstructor,
    config: &pluck_core::PluckConfig,
) -> anyhow::Result<Vec<Vec<String>>> {
    let data = fs::read(path)?;
    let source = open_source(config.source.kind, &data)?;
    let document = reconstructor.document(source.as_ref())?;

    Ok(document
        .pages
        .iter()
        .map(|page| {
            let text = page
                .lines
                .iter()
                .map(Line::text)
                .collect::<Vec<_>>()
                .join("\n");
            vec![
                path.display().to_string(),
                (page.index + 1).to_string(),
                text,
            ]
        })
        .collect())
}
