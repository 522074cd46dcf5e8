// Runs the real `casecheck` binary against a mock chat completion server.

mod common;

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use httpmock::prelude::*;
use serde_json::json;

fn casecheck(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_casecheck"))
        .args(args)
        .current_dir(dir)
        .env_remove("CASECHECK_OPENAI_KEY")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn casecheck");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().expect("wait for casecheck")
}

#[test]
fn analyzes_rows_against_mock_server() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer sk-test");
        then.status(200).json_body(json!({
            "choices": [{"message": {"role": "assistant", "content": "GOOD"}}],
            "usage": {"total_tokens": 90}
        }));
    });

    let dir = tempfile::tempdir().unwrap();
    common::write_cases(dir.path(), &["TC-1", "TC-2"]);
    common::write_config(dir.path(), "sk-test", &server.url("/v1"));

    let output = casecheck(dir.path(), &["5"], "");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {}\nstderr: {}", stdout, String::from_utf8_lossy(&output.stderr));

    mock.assert_hits(2);
    assert!(stdout.contains("Requested 5 tests, but only 2 exist."));
    assert!(stdout.contains("Tests analyzed: 2"));
    assert!(stdout.contains("Total tokens: 180"));

    let files = common::output_files(dir.path());
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("analysis_results_") && name.ends_with(".xlsx"), "{}", name);
    assert_eq!(common::cell(&files[0], "AI Detailed Analysis", 2, 7).as_deref(), Some("GOOD"));
}

#[test]
fn prompt_answer_selects_rows() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({
            "choices": [{"message": {"content": "Issue: no expected result"}}],
            "usage": {"total_tokens": 40}
        }));
    });

    let dir = tempfile::tempdir().unwrap();
    common::write_cases(dir.path(), &["TC-1", "TC-2", "TC-3"]);
    common::write_config(dir.path(), "sk-test", &server.url("/v1"));

    let output = casecheck(dir.path(), &[], "1\n");
    assert!(output.status.success());
    mock.assert_hits(1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 3 test cases in Excel."));
    assert!(stdout.contains("Analyzing 1 of 3 test cases..."));
}

#[test]
fn placeholder_key_exits_before_any_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200);
    });

    let dir = tempfile::tempdir().unwrap();
    common::write_cases(dir.path(), &["TC-1"]);
    common::write_config(dir.path(), "YOUR-ACTUAL-API-KEY-HERE", &server.url("/v1"));

    let output = casecheck(dir.path(), &["1"], "");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: OpenAI API key is still the placeholder value"), "{}", stderr);
    assert!(stderr.contains("hint:"));
    mock.assert_hits(0);
    assert!(common::output_files(dir.path()).is_empty());
}

#[test]
fn missing_config_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = casecheck(dir.path(), &[], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration file not found"));
}

#[test]
fn negative_count_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    common::write_cases(dir.path(), &["TC-1"]);
    common::write_config(dir.path(), "sk-test", "http://127.0.0.1:9/v1");

    let output = casecheck(dir.path(), &["-2"], "");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Test count must be at least 1"));
}
