//! Structured JSON strategy.

use coach_analysis_core::{AnalysisField, FieldValue, NormalizedAnalysis};
use serde_json::{Map, Value};

use super::{Extraction, ExtractionStrategy, StrategyKind};

/// Keys read for each field, first present key wins.
pub const KEY_ALIASES: [(AnalysisField, &[&str]); 8] = [
    (AnalysisField::Status, &["status"]),
    (AnalysisField::ConfidenceScore, &["confidence", "confidenceScore"]),
    (
        AnalysisField::NextBestAction,
        &["next_best_action", "nextBestAction"],
    ),
    (AnalysisField::Reasoning, &["summary", "reasoning"]),
    (AnalysisField::Workout, &["workout_insights", "workout"]),
    (AnalysisField::Nutrition, &["nutrition_insights", "nutrition"]),
    (AnalysisField::Movement, &["movement_insights", "movement"]),
    (AnalysisField::Sleep, &["sleep_insights", "sleep"]),
];

pub struct JsonStrategy;

impl ExtractionStrategy for JsonStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Json
    }

    fn extract(&self, raw: &str) -> Option<Extraction> {
        match serde_json::from_str::<Value>(raw).ok()? {
            Value::Object(map) => Some(from_object(&map)),
            // A bare `null` has no keys to read; the text strategies keep it.
            Value::Null => None,
            // Any other value parsed, but carries none of the keys.
            _ => Some(Extraction {
                analysis: NormalizedAnalysis::structured_default(),
                fields_found: Vec::new(),
            }),
        }
    }
}

fn from_object(map: &Map<String, Value>) -> Extraction {
    let mut analysis = NormalizedAnalysis::structured_default();
    let mut fields_found = Vec::new();

    for (field, keys) in KEY_ALIASES {
        let Some(value) = first_present(map, keys) else {
            continue;
        };
        analysis.set_field(field, field_value(field, value));
        fields_found.push(field);
    }

    Extraction {
        analysis,
        fields_found,
    }
}

fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_present(value))
}

/// Loose truthiness: null, `false`, `0` and `""` count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field_value(field: AnalysisField, value: &Value) -> FieldValue {
    match (field, value) {
        (AnalysisField::ConfidenceScore, Value::Number(n)) => {
            // Saturating float cast truncates fractional scores.
            FieldValue::Number(n.as_i64().unwrap_or_else(|| n.as_f64().map_or(0, |f| f as i64)))
        }
        _ => FieldValue::Text(value_text(value)),
    }
}

/// Renders a JSON value as display text.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join("\n"),
        Value::Object(_) => value.to_string(),
    }
}
