//! TSV output writing.

use std::io::Write;
use std::path::Path;

/// Clean a cell value for the tab-delimited sink: tabs, newlines and
/// carriage returns become single spaces and runs of whitespace collapse.
pub fn sanitize_cell(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Write headers and rows to a TSV file.
pub fn write_tsv(path: &Path, headers: &[String], rows: &[Vec<String>]) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    write_records(&mut wtr, headers, rows)?;
    wtr.flush()?;
    Ok(())
}

/// Write headers and rows as TSV to any writer (stdout in single-file mode).
pub fn write_tsv_to<W: Write>(
    writer: W,
    headers: &[String],
    rows: &[Vec<String>],
) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    write_records(&mut wtr, headers, rows)?;
    wtr.flush()?;
    Ok(())
}

fn write_records<W: Write>(
    wtr: &mut csv::Writer<W>,
    headers: &[String],
    rows: &[Vec<String>],
) -> anyhow::Result<()> {
    wtr.write_record(headers)?;
    for row in rows {
        let cleaned: Vec<String> = row.iter().map(|cell| sanitize_cell(cell)).collect();
        wtr.write_record(&cleaned)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_tabs_and_newlines() {
        assert_eq!(sanitize_cell("a\tb\nc\r\nd"), "a b c d");
        assert_eq!(sanitize_cell("  spaced   out  "), "spaced out");
        assert_eq!(sanitize_cell(""), "");
    }

    #[test]
    fn writes_tab_delimited_rows() {
        let mut buffer = Vec::new();
        write_tsv_to(
            &mut buffer,
            &["file".to_string(), "Total".to_string()],
            &[vec!["a.pdf".to_string(), "1234.56".to_string()]],
        )
        .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "file\tTotal\na.pdf\t1234.56\n");
    }
}
