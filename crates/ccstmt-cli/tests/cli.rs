use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BUNDLE: &str = r#"{
  "tables": [[
    ["Payment Due Date", "Total Amount Due", "Minimum Amount Due"],
    ["04/11/2021", "78,708.38", "3,935.42"]
  ]],
  "blocks": [
    {"text": "Card No: 4375 XXXX XXXX 7381", "bbox": [40.0, 10.0, 300.0, 22.0], "page": 0},
    {"text": "Statement Period: 17/09/2021 to 15/10/2021", "bbox": [40.0, 30.0, 300.0, 42.0], "page": 0}
  ],
  "raw_text": "Card No: 4375 XXXX XXXX 7381 Statement Period: 17/09/2021 to 15/10/2021 Payment Due Date 04/11/2021 Total Amount Due 78,708.38 Credit Limit 1,32,000.00"
}"#;

const TEXT_STATEMENT: &str = "\
Card No XXXX XXXX XXXX 1234
Payment Due Date: 05/12/2021
Total Amount Due 12,500.00
";

fn ccstmt() -> Command {
    Command::cargo_bin("ccstmt").unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn bundle(dir: &Path) -> PathBuf {
    write(dir, "october.json", BUNDLE)
}

#[test]
fn extract_bundle_as_json() {
    let dir = TempDir::new().unwrap();
    let input = bundle(dir.path());

    let output = ccstmt().arg("extract").arg(&input).output().unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["card_last_4"], "7381");
    assert_eq!(result["due_date"], "04/11/2021");
    assert_eq!(result["amount_due"], 78708.38);
    assert_eq!(result["credit_limit"], 132000.0);
    assert_eq!(result["statement_period"], "17/09/2021 to 15/10/2021");
    assert_eq!(result["fields_extracted"], 5);
    assert_eq!(result["confidence"], "high");
    assert_eq!(result["has_warnings"], false);
}

#[test]
fn extract_plain_text_as_text() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "statement.txt", TEXT_STATEMENT);

    ccstmt()
        .args(["extract", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("****1234"))
        .stdout(predicate::str::contains("05/12/2021"))
        .stdout(predicate::str::contains("₹12,500.00"))
        .stdout(predicate::str::contains("Not Found"))
        .stdout(predicate::str::contains("credit_limit not found"));
}

#[test]
fn extract_as_csv() {
    let dir = TempDir::new().unwrap();
    let input = bundle(dir.path());

    ccstmt()
        .args(["extract", "-f", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "card_last_4,statement_period,due_date,amount_due,credit_limit",
        ))
        .stdout(predicate::str::contains("7381"))
        .stdout(predicate::str::contains("78708.38"));
}

#[test]
fn extract_writes_output_file_and_trace() {
    let dir = TempDir::new().unwrap();
    let input = bundle(dir.path());
    let output = dir.path().join("out.json");

    ccstmt()
        .arg("extract")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--show-trace")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Resolution trace"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"amount_due\": 78708.38"));
}

#[test]
fn extract_writes_artifacts() {
    let dir = TempDir::new().unwrap();
    let input = bundle(dir.path());
    let artifacts = dir.path().join("artifacts");

    ccstmt()
        .arg("extract")
        .arg(&input)
        .arg("--artifacts")
        .arg(&artifacts)
        .assert()
        .success();

    for suffix in ["result.json", "raw_text.txt", "tables.json", "blocks.json", "trace.json"] {
        let path = artifacts.join(format!("october_{suffix}"));
        assert!(path.exists(), "missing {}", path.display());
    }

    let trace: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(artifacts.join("october_trace.json")).unwrap())
            .unwrap();
    assert!(trace.as_array().is_some_and(|entries| !entries.is_empty()));
}

#[test]
fn extract_rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "statement.docx", "Total Amount Due 500.00");

    ccstmt()
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("docx"));
}

#[test]
fn extract_missing_file_fails() {
    ccstmt()
        .args(["extract", "does/not/exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn extract_malformed_bundle_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "broken.json", "{ not json");

    ccstmt().arg("extract").arg(&input).assert().failure();
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    bundle(dir.path());
    write(dir.path(), "november.txt", TEXT_STATEMENT);
    write(dir.path(), "notes.md", "ignored");
    let out = dir.path().join("out");

    let pattern = format!("{}/*", dir.path().display());
    ccstmt()
        .args(["batch", &pattern, "--summary", "-j", "2"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    assert!(out.join("october.json").exists());
    assert!(out.join("november.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let mut lines = summary.lines();
    assert!(lines.next().unwrap().starts_with("filename,status,card_last_4"));
    assert_eq!(lines.filter(|l| l.contains(",success,")).count(), 2);
}

#[test]
fn batch_continues_past_failures() {
    let dir = TempDir::new().unwrap();
    bundle(dir.path());
    write(dir.path(), "broken.json", "[1, 2");
    let out = dir.path().join("out");

    let pattern = format!("{}/*.json", dir.path().display());
    ccstmt()
        .args(["batch", &pattern, "--summary", "--continue-on-error"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed files"));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("broken.json,error"));
}

#[test]
fn batch_stops_on_failure_by_default() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "broken.json", "[1, 2");

    let pattern = format!("{}/*.json", dir.path().display());
    ccstmt().args(["batch", &pattern]).assert().failure();
}

#[test]
fn config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");

    ccstmt()
        .args(["config", "init", "--config"])
        .arg(&config)
        .assert()
        .success();
    assert!(config.exists());

    ccstmt()
        .args(["config", "init", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    ccstmt()
        .args(["config", "set", "extraction.block_lookahead", "7", "--config"])
        .arg(&config)
        .assert()
        .success();

    ccstmt()
        .args(["config", "get", "extraction.block_lookahead", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::diff("7\n"));

    ccstmt()
        .args(["config", "validate", "--config"])
        .arg(&config)
        .assert()
        .success();
}

#[test]
fn config_set_rejects_unusable_values() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    ccstmt()
        .args(["config", "set", "extraction.table_candidate_limit", "0", "--config"])
        .arg(&config)
        .assert()
        .failure();
    assert!(!config.exists());

    ccstmt()
        .args(["config", "set", "extraction.no_such_key", "1", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn extract_uses_config_bounds() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    let input = bundle(dir.path());

    ccstmt()
        .args(["config", "set", "extraction.amount_due_bounds.max", "50000", "--config"])
        .arg(&config)
        .assert()
        .success();

    let output = ccstmt()
        .arg("extract")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["amount_due"], serde_json::Value::Null);
}
