//! Binary-level contract tests: stdin in, one JSON document out, exit
//! status coupled to the `success` field.

use std::io::Write;
use std::process::{Command, Stdio};

fn run_adapter(input: &str) -> (serde_json::Value, bool, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_foresight"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn adapter");

    child
        .stdin
        .as_mut()
        .expect("stdin not captured")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");

    let output = child.wait_with_output().expect("adapter did not exit");
    let stdout = String::from_utf8(output.stdout).expect("stdout not UTF-8");
    let document = serde_json::from_str(stdout.trim()).expect("stdout is not one JSON document");
    (document, output.status.success(), stdout)
}

#[test]
fn test_empty_data_short_circuits() {
    let (doc, ok, _) = run_adapter(r#"{"data": [], "config": {}}"#);
    assert!(!ok, "exit status must be non-zero");
    assert_eq!(
        doc,
        serde_json::json!({"success": false, "error": "No data provided"})
    );
}

#[test]
fn test_missing_data_field_short_circuits() {
    let (doc, ok, _) = run_adapter(r#"{"config": {"periods": 5}}"#);
    assert!(!ok);
    assert_eq!(doc["error"], "No data provided");
}

#[test]
fn test_malformed_document_reports_unexpected_error() {
    let (doc, ok, _) = run_adapter("{not json");
    assert!(!ok);
    assert_eq!(doc["success"], false);
    assert!(doc["error"]
        .as_str()
        .unwrap()
        .starts_with("Unexpected error"));
}

#[test]
fn test_malformed_timestamp_reports_failure() {
    let (doc, ok, _) = run_adapter(
        r#"{"data": [{"ds": "not-a-date", "y": 1.0}], "config": {}}"#,
    );
    assert!(!ok);
    assert_eq!(doc["success"], false);
    assert!(!doc["error"].as_str().unwrap().is_empty());
    assert!(doc.get("forecast").is_none());
}

#[test]
fn test_successful_forecast_exits_zero() {
    // 40 consecutive days starting 2024-01-01 (history ends 2024-02-09).
    let data: Vec<serde_json::Value> = (0..40)
        .map(|i| {
            let (month, day) = if i < 31 { (1, i + 1) } else { (2, i - 30) };
            serde_json::json!({
                "ds": format!("2024-{month:02}-{day:02}"),
                "y": 100.0 + i as f64
            })
        })
        .collect();

    let request = serde_json::json!({
        "data": data,
        "config": {"periods": 3, "yearly_seasonality": false}
    });

    let (doc, ok, stdout) = run_adapter(&request.to_string());
    assert!(ok, "expected exit 0, got failure: {stdout}");
    assert_eq!(doc["success"], true);
    assert_eq!(doc["forecast"].as_array().unwrap().len(), 3);
    assert_eq!(doc["forecast"][0]["ds"], "2024-02-10T00:00:00");
}
