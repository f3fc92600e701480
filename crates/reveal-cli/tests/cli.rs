//! CLI integration tests using assert_cmd
//!
//! Tests the full `reveal` binary with real command-line arguments.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cli_version() {
    Command::cargo_bin("reveal").unwrap().arg("--version").assert().success();
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("reveal")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reveal"))
        .stdout(predicate::str::contains("--check"))
        .stdout(predicate::str::contains("--validate-schema"));
}

#[test]
fn test_cli_shows_structure_for_python_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("app.py");
    fs::write(&file_path, "import os\n\ndef add(a, b):\n    return a + b\n").unwrap();

    Command::cargo_bin("reveal")
        .unwrap()
        .arg(&file_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"imports\""))
        .stdout(predicate::str::contains("\"functions\""));
}

#[test]
fn test_cli_check_reports_line_length_violations() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("long.py");
    fs::write(&file_path, format!("x = \"{}\"\n", "a".repeat(200))).unwrap();

    Command::cargo_bin("reveal")
        .unwrap()
        .arg(&file_path)
        .arg("--check")
        .arg("--select")
        .arg("E501")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("E501"));
}

#[test]
fn test_cli_check_clean_file_exits_zero() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("clean.py");
    fs::write(&file_path, "def add(a, b):\n    return a + b\n").unwrap();

    Command::cargo_bin("reveal")
        .unwrap()
        .arg(&file_path)
        .arg("--check")
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_cli_grep_format_is_parseable_lines() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("long.py");
    fs::write(&file_path, format!("x = \"{}\"\n", "a".repeat(200))).unwrap();

    Command::cargo_bin("reveal")
        .unwrap()
        .arg(&file_path)
        .arg("--check")
        .arg("--select")
        .arg("E501")
        .arg("--format")
        .arg("grep")
        .assert()
        .code(1)
        .stdout(predicate::str::is_match(r"^.+:\d+:\d+:E501:.+$").unwrap());
}

#[test]
fn test_cli_unknown_schema_reports_error() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("post.md");
    fs::write(&file_path, "---\ntitle: hi\n---\nbody\n").unwrap();

    Command::cargo_bin("reveal")
        .unwrap()
        .arg(&file_path)
        .arg("--validate-schema")
        .arg("nonexistent-schema")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_imports_adapter_summary() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.py"), "import os\n").unwrap();

    Command::cargo_bin("reveal")
        .unwrap()
        .arg(format!("imports://{}", temp_dir.path().display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("import_summary"));
}

#[test]
fn test_cli_help_scheme_shows_adapter_metadata() {
    Command::cargo_bin("reveal")
        .unwrap()
        .arg("help://imports")
        .assert()
        .success()
        .stdout(predicate::str::contains("imports"));
}

#[test]
fn test_cli_adapter_uri_element_segment_dispatches_to_get_element() {
    Command::cargo_bin("reveal")
        .unwrap()
        .arg("ssl://example.com/san")
        .assert()
        .success()
        .stdout(predicate::str::contains("ssl_san"));
}

#[test]
fn test_cli_adapter_uri_unknown_element_reports_not_found() {
    Command::cargo_bin("reveal")
        .unwrap()
        .arg("ssl://example.com/bogus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_element_suffix_reports_missing_element() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("app.py");
    fs::write(&file_path, "def add(a, b):\n    return a + b\n").unwrap();

    Command::cargo_bin("reveal")
        .unwrap()
        .arg(format!("{}::NoSuchThing", file_path.display()))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}
