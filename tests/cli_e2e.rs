//! End-to-end CLI tests for the downbot binary.

mod support;
use support::socket_guard::start_mock_server_or_skip;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_flag_displays_usage() {
    let mut cmd = Command::cargo_bin("downbot").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("numbered 7z parts"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("downbot").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("downbot"));
}

/// Test that no arguments and an empty stdin pipe exit cleanly.
#[test]
fn test_binary_no_args_empty_stdin_exits_zero() {
    let mut cmd = Command::cargo_bin("downbot").unwrap();
    cmd.arg("-q").write_stdin("").assert().success();
}

/// Test that a request can arrive on stdin instead of the arguments.
#[test]
fn test_binary_reads_request_from_stdin() {
    let mut cmd = Command::cargo_bin("downbot").unwrap();
    cmd.arg("-q")
        .write_stdin("/help\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("part_size_mb"));
}

/// Test that stdin lines run as separate requests and the worst
/// status drives the exit code.
#[test]
fn test_binary_stdin_lines_run_sequentially() {
    let mut cmd = Command::cargo_bin("downbot").unwrap();
    let assert = cmd
        .arg("-q")
        .write_stdin("not-a-link\n\n/help\n")
        .assert()
        .failure();
    assert_eq!(
        assert.get_output().status.code(),
        Some(2),
        "a rejected line must win over a completed one"
    );
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(
        stdout.contains("part_size_mb"),
        "later lines still run after a rejection; got: {stdout:?}"
    );
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("downbot").unwrap();
    cmd.arg("--invalid-flag")
        .arg("/help")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test that a /help request prints usage and exits with code 0.
#[test]
fn test_binary_help_request_prints_usage() {
    let mut cmd = Command::cargo_bin("downbot").unwrap();
    cmd.arg("-q")
        .arg("/help")
        .assert()
        .success()
        .stdout(predicate::str::contains("part_size_mb"))
        .stdout(predicate::str::contains("cat "));
}

/// Test that a non-URL request is rejected with exit code 2.
#[test]
fn test_binary_rejects_non_url_with_exit_code_two() {
    let mut cmd = Command::cargo_bin("downbot").unwrap();
    let assert = cmd.arg("-q").arg("not-a-link").assert().failure();
    assert_eq!(
        assert.get_output().status.code(),
        Some(2),
        "rejected input must yield exit code 2"
    );
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(
        stdout.contains("/help"),
        "rejection should point at /help; got: {stdout:?}"
    );
}

/// Test that an out-of-range part size is rejected with exit code 2.
#[test]
fn test_binary_rejects_bad_part_size_with_exit_code_two() {
    let mut cmd = Command::cargo_bin("downbot").unwrap();
    let assert = cmd
        .arg("-q")
        .arg("https://example.com/file.bin")
        .arg("0")
        .assert()
        .failure();
    assert_eq!(assert.get_output().status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(
        stdout.contains("Part size"),
        "rejection should explain the part size range; got: {stdout:?}"
    );
}

/// Test a full run: fetch from a local server into the output directory.
#[tokio::test]
async fn test_binary_downloads_file_into_output_dir() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"meeting notes".to_vec()))
        .mount(&mock_server)
        .await;

    let temp = TempDir::new().unwrap();
    let output = temp.path().join("out");
    let workspace = temp.path().join("work");

    let mut cmd = Command::cargo_bin("downbot").unwrap();
    cmd.arg("-q")
        .arg("--output-dir")
        .arg(&output)
        .arg("--workspace-dir")
        .arg(&workspace)
        .arg(format!("{}/notes.txt", mock_server.uri()));
    cmd.assert().success();

    let delivered = std::fs::read(output.join("notes.txt")).unwrap();
    assert_eq!(delivered, b"meeting notes");
    let leftover = std::fs::read_dir(&workspace).unwrap().count();
    assert_eq!(leftover, 0, "workspace must be emptied after the run");
}

/// Test that a failed download reports on stdout and exits with code 1.
#[tokio::test]
async fn test_binary_download_failure_exits_one() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let temp = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("downbot").unwrap();
    let assert = cmd
        .arg("-q")
        .arg("--output-dir")
        .arg(temp.path().join("out"))
        .arg("--workspace-dir")
        .arg(temp.path().join("work"))
        .arg(format!("{}/gone", mock_server.uri()))
        .assert()
        .failure();
    assert_eq!(
        assert.get_output().status.code(),
        Some(1),
        "download failure must yield exit code 1"
    );
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(
        stdout.contains("Download failed"),
        "failure reply should print; got: {stdout:?}"
    );
}
