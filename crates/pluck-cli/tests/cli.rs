//! End-to-end checks of the pluck binary's argument handling.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn pluck() -> Command {
    Command::cargo_bin("pluck").unwrap()
}

#[test]
fn help_lists_subcommands() {
    pluck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("dump"));
}

#[test]
fn extract_rejects_missing_input() {
    pluck()
        .args(["extract", "does-not-exist.pdf", "--rule", "Total:right:0:number"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn extract_rejects_malformed_inline_rule() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.pdf");
    std::fs::File::create(&input).unwrap();

    pluck()
        .args(["extract"])
        .arg(&input)
        .args(["--rule", "Total:right:number"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad --rule"));
}

#[test]
fn batch_fails_when_glob_matches_nothing() {
    pluck()
        .args([
            "batch",
            "no-such-dir/*.pdf",
            "--rule",
            "Total:right:0:number",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn batch_reports_bad_rules_file_lines_but_keeps_going() {
    let dir = tempfile::tempdir().unwrap();
    let rules_path = dir.path().join("rules.txt");
    let mut file = std::fs::File::create(&rules_path).unwrap();
    writeln!(file, "# comment").unwrap();
    writeln!(file, "Total:sideways:0:number").unwrap();
    writeln!(file, "Total:right:0:number").unwrap();
    drop(file);

    // The bad line is reported; the run then fails only because the glob
    // matches nothing, not because of the rules file.
    pluck()
        .args(["batch", "no-such-dir/*.pdf", "--rules-file"])
        .arg(&rules_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("direction must be one of"))
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_path_is_reported() {
    pluck()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file:"));
}
