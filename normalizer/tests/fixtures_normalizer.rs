use std::fs;
use std::path::PathBuf;

use coach_analysis_core::{AnalysisField, NormalizedAnalysis, Severity, classify_status};
use coach_analysis_normalizer::strategies::StrategyKind;
use coach_analysis_normalizer::{NormalizeOptions, normalize, normalize_with_report};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

#[test]
fn test_no_response_is_no_analysis() {
    assert_eq!(normalize(None), None);
}

#[test]
fn test_snake_case_webhook_fixture_maps_every_field() {
    let raw = fixture("webhook-snake-case.json");
    let analysis = normalize(Some(&raw)).expect("fixture should normalize");

    assert_eq!(analysis.status, "Needs Attention");
    assert_eq!(analysis.confidence_score, 78);
    assert_eq!(
        analysis.next_best_action,
        "Schedule a recovery week and re-test squat 1RM."
    );
    assert_eq!(
        analysis.reasoning,
        "Training volume rose 30% over two weeks while sleep dropped below 6.5h."
    );
    assert_eq!(
        analysis.workout,
        "Lower-body sessions are stacking without rest days."
    );
    assert_eq!(
        analysis.nutrition,
        "Protein intake is on target; carbohydrates are low on training days."
    );
    assert_eq!(analysis.movement, "Daily steps average 9,200.");
    assert_eq!(
        analysis.sleep,
        "Sleep averaged 6.2h with late bedtimes on weekends."
    );
    assert_eq!(analysis.severity(), Severity::Warning);
}

#[test]
fn test_first_listed_key_wins() {
    let analysis = normalize(Some(r#"{"confidence": 10, "confidenceScore": 20}"#)).unwrap();
    assert_eq!(analysis.confidence_score, 10);

    let analysis = normalize(Some(
        r#"{"reasoning": "second", "summary": "first", "workout": "b", "workout_insights": "a"}"#,
    ))
    .unwrap();
    assert_eq!(analysis.reasoning, "first");
    assert_eq!(analysis.workout, "a");
}

#[test]
fn test_not_json_falls_back_to_text() {
    let analysis = normalize(Some("not json at all")).unwrap();
    let mut expected = NormalizedAnalysis::with_status("Analyzed");
    expected.reasoning = "not json at all".to_string();
    assert_eq!(analysis, expected);
}

#[test]
fn test_empty_object_takes_defaults() {
    let analysis = normalize(Some("{}")).unwrap();
    assert_eq!(analysis, NormalizedAnalysis::structured_default());
    assert_eq!(analysis.status, "On Track");
    assert_eq!(analysis.confidence_score, 0);
}

#[test]
fn test_status_classification_examples() {
    assert_eq!(classify_status("Needs Attention"), Severity::Warning);
    assert_eq!(classify_status("All Green"), Severity::Positive);
    assert_eq!(classify_status("Critical issue"), Severity::Critical);
    assert_eq!(classify_status("Stable"), Severity::Neutral);
}

#[test]
fn test_normalize_is_idempotent() {
    for name in ["webhook-snake-case.json", "labeled-report.txt", "prose.txt"] {
        let raw = fixture(name);
        assert_eq!(normalize(Some(&raw)), normalize(Some(&raw)), "{name}");
    }
}

#[test]
fn test_labeled_report_fixture_uses_section_strategy() {
    let raw = fixture("labeled-report.txt");
    let run = normalize_with_report(Some(&raw), &NormalizeOptions::default()).unwrap();

    assert_eq!(run.report.strategy, StrategyKind::Section);
    assert_eq!(run.report.fields_found.len(), AnalysisField::ALL.len());
    assert!(run.report.warnings.is_empty());

    let analysis = run.analysis;
    assert_eq!(analysis.status, "Green");
    assert_eq!(analysis.confidence_score, 91);
    assert_eq!(
        analysis.reasoning,
        "Attendance was perfect this week.\nHeart rate recovery improved compared to last month."
    );
    assert_eq!(analysis.sleep, "7.8h average, consistent schedule.");
    assert_eq!(analysis.default_tab(), AnalysisField::Workout);
}

#[test]
fn test_prose_fixture_kept_verbatim() {
    let raw = fixture("prose.txt");
    let run = normalize_with_report(Some(&raw), &NormalizeOptions::default()).unwrap();
    assert_eq!(run.report.strategy, StrategyKind::PlainText);
    assert_eq!(run.analysis.reasoning, raw);
    assert_eq!(run.analysis.confidence_display(), "N/A");
}

#[test]
fn test_stringified_webhook_payload_round_trip() {
    // The dashboard re-serializes the webhook body before normalizing it.
    let raw = fixture("webhook-snake-case.json");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let restringified = serde_json::to_string(&value).unwrap();
    assert_eq!(normalize(Some(&restringified)), normalize(Some(&raw)));
}

#[test]
fn test_json_string_body_takes_structured_defaults() {
    let raw = serde_json::to_string(&fixture("labeled-report.txt")).unwrap();
    let run = normalize_with_report(Some(&raw), &NormalizeOptions::default()).unwrap();
    assert_eq!(run.report.strategy, StrategyKind::Json);
    assert_eq!(run.analysis, NormalizedAnalysis::structured_default());

    let analysis = normalize(Some("\"Great week overall\"")).unwrap();
    assert_eq!(analysis.status, "On Track");
    assert_eq!(analysis.reasoning, "");

    let analysis = normalize(Some("\"Status: Red\"")).unwrap();
    assert_eq!(analysis.status, "On Track");
}

#[test]
fn test_json_null_is_plain_text() {
    let analysis = normalize(Some("null")).unwrap();
    assert_eq!(analysis.status, "Analyzed");
    assert_eq!(analysis.reasoning, "null");
}
