//! Integration tests for the docxmill CLI.
//!
//! External engines are disabled by pointing their executable paths at
//! nonexistent binaries, so these tests are deterministic on machines
//! without LibreOffice or poppler installed.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a CLI command with external engines disabled
fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_docxmill"));
    cmd.env("SOFFICE_PATH", "/nonexistent/soffice")
        .env("PDFTOTEXT_PATH", "/nonexistent/pdftotext");
    cmd
}

#[test]
fn test_help_describes_the_tool() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Converts a PDF file to DOCX"))
        .stdout(predicate::str::contains("Usage: docxmill"));
}

#[test]
fn test_missing_input_fails_without_side_effects() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("out");

    cli()
        .arg(dir.path().join("missing.pdf"))
        .arg(&out_dir)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("not found"));

    assert!(!out_dir.exists());
}

#[test]
fn test_strict_mode_rejects_non_pdf_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "plain text").unwrap();

    cli()
        .arg(&input)
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("invalid input"));
}

#[test]
fn test_json_error_envelope_is_a_single_parseable_line() {
    let dir = TempDir::new().unwrap();

    let output = cli()
        .arg(dir.path().join("missing.pdf"))
        .arg(dir.path())
        .args(["--format", "json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);

    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value["status"], "error");
    assert!(value["message"].as_str().unwrap().contains("not found"));
}

#[test]
fn test_corrupt_pdf_reports_every_engine() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.pdf");
    fs::write(&input, b"%PDF-1.4\nnot a real pdf").unwrap();
    let out_dir = dir.path().join("out");

    let output = cli()
        .arg(&input)
        .arg(format!("{}/", out_dir.display()))
        .args(["--format", "json", "--timeout", "30"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value["status"], "error");

    // One recorded reason per engine: two disabled externals plus the
    // pure-Rust extractor that choked on the garbage input
    let detail = value["detail"].as_str().unwrap();
    assert!(detail.contains("libreoffice:"));
    assert!(detail.contains("poppler:"));
    assert!(detail.contains("pdf-extract:"));

    assert!(!out_dir.join("broken.docx").exists());
}

#[test]
fn test_lenient_mode_still_requires_readable_pdf() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "plain text").unwrap();

    // Accepted past the extension check, then every engine fails on it
    cli()
        .arg(&input)
        .arg(dir.path())
        .arg("--lenient")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("no conversion engine succeeded"));
}
