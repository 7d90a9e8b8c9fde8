// CLI integration tests for ingest/render/sanitize flows.
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_diffuse-normalize");
    Command::new(exe)
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn parse_json_line(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    let line = text.lines().next().expect("json line");
    parse_json(line)
}

fn write_file(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write input");
    path.to_str().expect("utf8 path").to_string()
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("output")
}

#[test]
fn ingest_file_emits_container_and_content() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write_file(
        temp.path(),
        "response.json",
        r#"[{"output":[{"content":[{"type":"output_text","text":"{\"title\":\"X\",\"content\":\"body\"}"}]}]}]"#,
    );

    let output = cmd().args(["ingest", &input]).output().expect("ingest");
    assert!(output.status.success());
    let value = parse_json_line(&output.stdout);
    assert_eq!(value["container"]["title"], "Untitled Project");
    assert_eq!(value["container"]["description"], "");
    assert_eq!(value["content"]["title"], "X");
    assert_eq!(value["content"]["content"], "body");
    assert_eq!(value["content"]["author"], "Diffuse.AI");
    assert_eq!(value["decode"]["tier"], "strict");
    assert!(output.stderr.is_empty());
}

#[test]
fn ingest_stdin_degraded_emits_notice() {
    let raw = serde_json::json!({"output": "{\"title\":\"A\",\"content\":\"Line1\nLine2\"}"})
        .to_string();

    let output = run_with_stdin(&["ingest", "--default-author", "Desk"], &raw);
    assert!(output.status.success());
    let value = parse_json_line(&output.stdout);
    assert_eq!(value["content"]["content"], "Line1\nLine2");
    assert_eq!(value["content"]["author"], "Desk");
    assert_eq!(value["decode"]["status"], "degraded");

    let notice = parse_json_line(&output.stderr);
    assert_eq!(notice["notice"]["kind"], "decode-degraded");
    assert_eq!(notice["notice"]["cmd"], "ingest");
    assert_eq!(notice["notice"]["details"]["tier"], "sanitized");
}

#[test]
fn ingest_empty_array_fails_with_envelope_error() {
    let output = run_with_stdin(&["ingest"], "[]");
    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "EnvelopeNotFound");
    assert!(err["error"]["hint"].is_string());
}

#[test]
fn ingest_blank_body_fails_with_empty_body_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write_file(temp.path(), "blank.json", "  \n\n");
    let output = cmd().args(["ingest", &input]).output().expect("ingest");
    assert_eq!(output.status.code(), Some(3));
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "EmptyBody");
    assert!(err["error"]["path"].as_str().unwrap().ends_with("blank.json"));
}

#[test]
fn ingest_missing_file_is_io_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("nope.json");
    let output = cmd()
        .args(["ingest", missing.to_str().unwrap()])
        .output()
        .expect("ingest");
    assert_eq!(output.status.code(), Some(5));
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Io");
}

#[test]
fn render_emits_one_line_per_input() {
    let temp = tempfile::tempdir().expect("tempdir");
    let clean = write_file(
        temp.path(),
        "clean.json",
        r#"{"title":"Stored","author":"Ana"}"#,
    );
    let broken = write_file(
        temp.path(),
        "broken.json",
        "{\"title\": \"Old draft\", \"content\": oops",
    );

    let output = cmd()
        .args(["render", &clean, &broken])
        .output()
        .expect("render");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<Value> = stdout.lines().map(parse_json).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["content"]["title"], "Stored");
    assert_eq!(lines[0]["content"]["author"], "Ana");
    assert_eq!(lines[0]["decode"]["tier"], "strict");
    assert!(lines[0].get("container").is_none());
    assert_eq!(lines[1]["content"]["title"], "Old draft");
    assert_eq!(lines[1]["decode"]["tier"], "extracted");
    assert!(lines[1]["source"].as_str().unwrap().ends_with("broken.json"));
}

#[test]
fn sanitize_prints_repaired_text() {
    let output = run_with_stdin(&["sanitize"], "{\n\"a\": \"x\ny\"\n}");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).expect("utf8"),
        "{\n\"a\": \"x\\ny\"\n}"
    );
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let output = cmd().args(["explode"]).output().expect("run");
    assert_eq!(output.status.code(), Some(2));
    let err = parse_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
}

#[test]
fn version_emits_json_when_piped() {
    let output = cmd().args(["version"]).output().expect("version");
    assert!(output.status.success());
    let value = parse_json_line(&output.stdout);
    assert_eq!(value["name"], "diffuse-normalize");
    assert!(value["version"].is_string());
}
