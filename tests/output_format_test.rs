//! Tests for the JSON output contract.

use pyreview::report::{render_json, JsonReport};
use pyreview::{AnalysisReport, Analyzer};

fn smelly_report() -> AnalysisReport {
    let source = std::fs::read_to_string(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/smelly.py"),
    )
    .expect("should read fixture");
    Analyzer::default()
        .without_linter()
        .analyze_report(&source)
        .expect("fixture should parse")
}

#[test]
fn test_json_field_names() {
    let json: serde_json::Value =
        serde_json::from_str(&render_json(&smelly_report(), false).unwrap()).unwrap();
    let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 2);
    assert!(json.get("suggestion").is_some());
    assert!(json.get("rating").is_some());
}

#[test]
fn test_json_all_keeps_order() {
    let report = smelly_report();
    let json = render_json(&report, true).unwrap();
    let parsed: JsonReport = serde_json::from_str(&json).unwrap();

    let listed = parsed.suggestions.expect("suggestions present with --all");
    let expected: Vec<String> = report
        .suggestions
        .iter()
        .map(|a| a.as_str().to_string())
        .collect();
    assert_eq!(listed, expected);
    assert_eq!(parsed.result, report.result);
}

#[test]
fn test_json_no_suggestion_sentinels() {
    let report = Analyzer::default()
        .without_linter()
        .analyze_report("x = 1\n")
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&render_json(&report, true).unwrap()).unwrap();
    assert_eq!(json["suggestion"], "No suggestion found.");
    assert_eq!(json["rating"], "No rating found.");
    assert_eq!(json["suggestions"], serde_json::json!([]));
}
