use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LABELED: &str = "Status: Needs Attention\nConfidence Score: 72\nNext Best Action: Book a deload week\nReasoning: Volume outpaced recovery.\nSleep: Averaging 6h.\n";

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_coach-analysis"))
}

fn run(args: &[&str]) -> Output {
    bin().args(args).output().expect("failed to run coach-analysis")
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = bin()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn coach-analysis");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// normalize / classify
// ---------------------------------------------------------------------------

#[test]
fn normalize_labeled_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "report.txt", LABELED);

    let json = stdout_json(&run(&["normalize", "--input", &input]));
    assert_eq!(json["status"], "Needs Attention");
    assert_eq!(json["confidenceScore"], 72);
    assert_eq!(json["nextBestAction"], "Book a deload week");
    assert_eq!(json["sleep"], "Averaging 6h.");
}

#[test]
fn normalize_reads_stdin() {
    let output = run_with_stdin(&["normalize"], "not json at all");
    let json = stdout_json(&output);
    assert_eq!(json["status"], "Analyzed");
    assert_eq!(json["reasoning"], "not json at all");
    assert_eq!(json["confidenceScore"], 0);
}

#[test]
fn normalize_with_report_and_clamp() {
    let output = run_with_stdin(
        &["normalize", "--with-report", "--clamp-confidence"],
        r#"{"confidence": 140, "summary": "Great block"}"#,
    );
    let json = stdout_json(&output);
    assert_eq!(json["analysis"]["confidenceScore"], 100);
    assert_eq!(json["report"]["strategy"], "json");
    assert_eq!(json["report"]["raw_confidence"], 140);
    assert_eq!(json["report"]["confidence_clamped"], true);
}

#[test]
fn normalize_empty_input_fails() {
    let output = run_with_stdin(&["normalize"], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: "));
}

#[test]
fn classify_prints_severity() {
    for (status, expected) in [
        ("Needs Attention", "warning"),
        ("All Green", "positive"),
        ("Critical issue", "critical"),
        ("Stable", "neutral"),
    ] {
        let output = run(&["classify", status]);
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), expected);
    }
}

// ---------------------------------------------------------------------------
// review
// ---------------------------------------------------------------------------

#[test]
fn review_approves_edits() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "report.txt", LABELED);

    let json = stdout_json(&run(&[
        "review",
        "--input",
        &input,
        "--client-id",
        "C001",
        "--set",
        "reasoning=Recovery looks fine after all.",
        "--set",
        "confidence=88",
    ]));
    assert_eq!(json["clientId"], "C001");
    assert!(json["approvedAt"].is_string());
    assert_eq!(
        json["analysis"]["reasoning"],
        "Recovery looks fine after all."
    );
    assert_eq!(json["analysis"]["confidenceScore"], 88);
    assert_eq!(json["analysis"]["status"], "Needs Attention");
}

#[test]
fn review_discard_keeps_original() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "report.txt", LABELED);

    let json = stdout_json(&run(&[
        "review",
        "--input",
        &input,
        "--set",
        "reasoning=thrown away",
        "--discard",
    ]));
    assert_eq!(json["reasoning"], "Volume outpaced recovery.");
}

#[test]
fn review_rejects_unknown_field() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "report.txt", LABELED);

    let output = run(&["review", "--input", &input, "--set", "mood=happy"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown analysis field: mood"), "{stderr}");
}

// ---------------------------------------------------------------------------
// roster / batch
// ---------------------------------------------------------------------------

#[test]
fn roster_demo_overview() {
    let json = stdout_json(&run(&["roster", "--format", "json"]));
    assert_eq!(json["overview"]["totalClients"], 4);
    assert_eq!(json["overview"]["averageProgress"], 65);
    assert_eq!(json["overview"]["averageHeartRate"], 69);
    assert_eq!(json["overview"]["totalWorkouts"], 90);
}

#[test]
fn roster_rejects_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let output = run(&["roster", "--input", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn batch_normalizes_directory() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "c001.json", r#"{"status":"On Track","confidence":90}"#);
    write(input.path(), "c002.txt", LABELED);
    write(input.path(), "c003.txt", "");

    let result = run(&[
        "batch",
        "--input",
        input.path().to_str().unwrap(),
        "--output",
        output.path().to_str().unwrap(),
        "--jobs",
        "2",
    ]);
    assert!(
        result.status.success(),
        "{}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Normalized 2 file(s)"), "{stdout}");
    assert!(stdout.contains("(1 empty, 0 failed)"), "{stdout}");

    let c001: Value =
        serde_json::from_str(&fs::read_to_string(output.path().join("c001.json.json")).unwrap())
            .unwrap();
    assert_eq!(c001["confidenceScore"], 90);
    let c002: Value =
        serde_json::from_str(&fs::read_to_string(output.path().join("c002.txt.json")).unwrap())
            .unwrap();
    assert_eq!(c002["status"], "Needs Attention");
    assert!(!output.path().join("c003.txt.json").exists());
}

#[test]
fn batch_keeps_inputs_sharing_a_stem_apart() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(input.path(), "c001.json", r#"{"status":"Green"}"#);
    write(input.path(), "c001.txt", "Status: Red");

    let result = run(&[
        "batch",
        "--input",
        input.path().to_str().unwrap(),
        "--output",
        output.path().to_str().unwrap(),
    ]);
    assert!(result.status.success());
    assert!(String::from_utf8_lossy(&result.stdout).contains("Normalized 2 file(s)"));

    let from_json: Value =
        serde_json::from_str(&fs::read_to_string(output.path().join("c001.json.json")).unwrap())
            .unwrap();
    let from_text: Value =
        serde_json::from_str(&fs::read_to_string(output.path().join("c001.txt.json")).unwrap())
            .unwrap();
    assert_eq!(from_json["status"], "Green");
    assert_eq!(from_text["status"], "Red");
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 2);
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn analyze_calls_webhook() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/analyze-client"))
        .and(body_json(json!({ "clientId": "C002" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Good",
            "confidenceScore": 81,
            "nextBestAction": "Keep the current plan",
            "nutrition_insights": "Protein on target"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/webhook/analyze-client", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        run(&[
            "analyze",
            "--client-id",
            "C002",
            "--webhook-url",
            &url,
            "--format",
            "json",
        ])
    })
    .await
    .unwrap();

    let json = stdout_json(&output);
    assert_eq!(json["status"], "Good");
    assert_eq!(json["confidenceScore"], 81);
    assert_eq!(json["nutrition"], "Protein on target");
}

#[tokio::test(flavor = "multi_thread")]
async fn analyze_reports_service_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let url = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        run(&["analyze", "--client-id", "C001", "--webhook-url", &url])
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error: Failed to analyze client 'C001': analysis service returned 500"),
        "{stderr}"
    );
}

#[test]
fn analyze_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "coach.yml",
        "version: \"1.0\"\nwebhook:\n  url: http://localhost:5678/webhook\n  timeout_secs: 0\n",
    );
    let output = run(&["analyze", "--client-id", "C001", "--config", &config]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("timeout_secs"));
}
