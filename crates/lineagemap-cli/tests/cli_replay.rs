//! End-to-end runs of the `lineagemap` binary against saved responses.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::tempdir;

const SUM_RESPONSE: &str = r#"{
  "mappings": [
    {"source_column": "a", "target_column": "total", "transformation": "SUM", "confidence": 5},
    {"source_column": "b", "target_column": "total", "transformation": "SUM", "confidence": 5}
  ],
  "transformation_summary": ["SUM"]
}"#;

/// Runs the binary in `dir` with no API key in the environment.
fn lineagemap(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_lineagemap"))
        .args(args)
        .current_dir(dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("LINEAGEMAP_TIMEOUT_SECS")
        .env_remove("LINEAGEMAP_MODEL")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("run CLI");

    // The binary may exit before reading stdin
    if let Some(mut pipe) = child.stdin.take() {
        let _ = pipe.write_all(stdin.as_bytes());
    }
    child.wait_with_output().expect("wait for CLI")
}

#[test]
fn replays_saved_response_as_json() {
    let dir = tempdir().expect("temp dir");
    let response_path = dir.path().join("response.json");
    let sql_path = dir.path().join("query.sql");
    std::fs::write(&response_path, SUM_RESPONSE).expect("write response");
    std::fs::write(&sql_path, "SELECT a + b AS total FROM t").expect("write sql");

    let output = lineagemap(
        dir.path(),
        &[
            "--from-response",
            "response.json",
            "-f",
            "json",
            "--compact",
            "query.sql",
        ],
        "",
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(json["mappings"].as_array().unwrap().len(), 2);
    assert_eq!(json["transformation_summary"][0], "SUM");
}

#[test]
fn writes_markdown_report_to_file() {
    let dir = tempdir().expect("temp dir");
    std::fs::write(dir.path().join("response.json"), SUM_RESPONSE).expect("write response");

    let output = lineagemap(
        dir.path(),
        &[
            "--from-response",
            "response.json",
            "-f",
            "markdown",
            "-o",
            "report.md",
            "--quiet",
        ],
        "SELECT a + b AS total FROM t",
    );

    assert!(output.status.success());
    let report = std::fs::read_to_string(dir.path().join("report.md")).expect("report");
    assert!(report.contains("| a | total | SUM | 5 |"));
    assert!(report.contains("| b | total | SUM | 5 |"));
    assert!(output.stderr.is_empty());
}

#[test]
fn missing_api_key_is_a_configuration_error() {
    let dir = tempdir().expect("temp dir");

    let output = lineagemap(dir.path(), &["-f", "json"], "SELECT 1");

    assert_eq!(output.status.code(), Some(66));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GEMINI_API_KEY"), "{stderr}");
}

#[test]
fn empty_input_fails_the_analysis() {
    let dir = tempdir().expect("temp dir");
    std::fs::write(dir.path().join("response.json"), SUM_RESPONSE).expect("write response");

    let output = lineagemap(dir.path(), &["--from-response", "response.json"], "  \n");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("EMPTY_INPUT"));
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_saved_response_fails_the_analysis() {
    let dir = tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join("response.json"),
        r#"{"mappings":[{"source_column":"a","target_column":"t","transformation":"direct","confidence":7}],"transformation_summary":[]}"#,
    )
    .expect("write response");

    let output = lineagemap(
        dir.path(),
        &["--from-response", "response.json"],
        "SELECT a AS t FROM x",
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SCHEMA_VALIDATION"), "{stderr}");
    assert!(stderr.contains("mappings[0].confidence"), "{stderr}");
}

#[test]
fn out_of_range_timeout_is_a_configuration_error() {
    let dir = tempdir().expect("temp dir");
    std::fs::write(dir.path().join("response.json"), SUM_RESPONSE).expect("write response");

    let output = lineagemap(
        dir.path(),
        &["--from-response", "response.json", "--timeout", "0"],
        "SELECT 1",
    );

    assert_eq!(output.status.code(), Some(66));
}
