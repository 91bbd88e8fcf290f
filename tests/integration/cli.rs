//! The compiled binary: arguments, exit codes and console output.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

use crate::common::{CONCAT_FAIL, CONCAT_OK, Workspace};

const ENV_VARS: [&str; 4] = [
    "WINPDFMERGE_PRESET",
    "WINPDFMERGE_OUTPUT_DIR",
    "WINPDFMERGE_PDFTK",
    "WINPDFMERGE_GS",
];

fn winpdfmerge() -> Command {
    let mut cmd = Command::cargo_bin("winpdfmerge").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_missing_folder_argument() {
    winpdfmerge()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_help_succeeds() {
    winpdfmerge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--preset"));
}

#[test]
fn test_unknown_preset_is_usage_error() {
    let ws = Workspace::new();
    winpdfmerge()
        .args(["--preset", "tiny"])
        .arg(ws.source.path())
        .assert()
        .code(1);
}

#[test]
fn test_nonexistent_folder() {
    let output = TempDir::new().unwrap();
    winpdfmerge()
        .arg("--output-dir")
        .arg(output.path())
        .arg(output.path().join("nope"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_folder_that_is_a_file() {
    let ws = Workspace::new();
    let file = ws.add_pdf("single.pdf");
    winpdfmerge()
        .arg("--output-dir")
        .arg(ws.output.path())
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_folder_without_pdfs() {
    let ws = Workspace::new();
    winpdfmerge()
        .arg("--output-dir")
        .arg(ws.output.path())
        .arg(ws.source.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No PDF files"));
    assert!(ws.output_files().is_empty());
}

#[test]
fn test_output_dir_equal_to_source_is_rejected() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf");
    winpdfmerge()
        .arg("--output-dir")
        .arg(ws.source.path())
        .arg(ws.source.path())
        .assert()
        .code(1);
    assert_eq!(ws.source_files(), ["a.pdf"]);
}

#[test]
#[serial]
fn test_successful_run_with_tool_overrides() {
    let ws = Workspace::new();
    ws.add_pdf("part 2.pdf");
    ws.add_pdf("part 10.pdf");
    let pdftk = ws.tool("pdftk", CONCAT_OK);

    winpdfmerge()
        .arg("--output-dir")
        .arg(ws.output.path())
        .arg("--pdftk")
        .arg(&pdftk)
        .arg("--no-email")
        .arg(ws.source.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 2 file(s)"))
        .stdout(predicate::str::contains("Email copy disabled"));

    let outputs = ws.output_files();
    assert_eq!(outputs.len(), 2);
    assert!(outputs.iter().any(|name| name.ends_with(".pdf")));
    assert!(outputs.iter().any(|name| name.ends_with(".log")));
}

#[test]
#[serial]
fn test_verbose_run_lists_merge_order_and_sizes() {
    let ws = Workspace::new();
    ws.add_pdf("b.pdf");
    ws.add_pdf("a.pdf");
    let pdftk = ws.tool("pdftk", CONCAT_OK);

    winpdfmerge()
        .arg("-v")
        .arg("--no-email")
        .arg("--output-dir")
        .arg(ws.output.path())
        .arg("--pdftk")
        .arg(&pdftk)
        .arg(ws.source.path())
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"1\. .*a\.pdf").unwrap())
        .stdout(predicate::str::is_match(r"2\. .*b\.pdf").unwrap())
        .stdout(predicate::str::contains("Master size"));
}

#[test]
#[serial]
fn test_quiet_run_prints_nothing() {
    let ws = Workspace::new();
    ws.add_pdf("a.pdf");
    let pdftk = ws.tool("pdftk", CONCAT_OK);

    winpdfmerge()
        .arg("-q")
        .arg("--no-email")
        .arg("--output-dir")
        .arg(ws.output.path())
        .env("WINPDFMERGE_PDFTK", &pdftk)
        .arg(ws.source.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
#[serial]
fn test_merge_failure_propagates_tool_exit_code() {
    let ws = Workspace::new();
    ws.add_pdf("locked.pdf");
    let pdftk = ws.tool("pdftk", CONCAT_FAIL);

    winpdfmerge()
        .arg("--output-dir")
        .arg(ws.output.path())
        .arg("--pdftk")
        .arg(&pdftk)
        .arg(ws.source.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("lossless merge"));
}
