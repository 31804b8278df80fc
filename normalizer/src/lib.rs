//! Normalization of loosely structured analysis responses.
//!
//! The analysis webhook answers with whatever shape its workflow happens to
//! produce: a JSON object with snake_case or camelCase keys, labeled text
//! (`Status: ...`, `Workout: ...`) or plain prose. This crate turns any of
//! them into a [`NormalizedAnalysis`] by trying three strategies in order:
//!
//! 1. [`JsonStrategy`](strategies::JsonStrategy) — reads alternate key pairs
//!    (`confidence`/`confidenceScore`, `summary`/`reasoning`, ...), first
//!    present key wins.
//! 2. [`SectionStrategy`](strategies::SectionStrategy) — splits labeled text
//!    into sections.
//! 3. [`PlainTextStrategy`](strategies::PlainTextStrategy) — keeps the body
//!    verbatim as the reasoning.
//!
//! Normalization never fails: any non-empty input yields a record.
//!
//! # Main entry points
//!
//! - [`normalize`] — pass-through normalization with default options.
//! - [`normalize_with`] — normalization with a [`ConfidencePolicy`].
//! - [`normalize_with_report`] — same, plus a [`NormalizeReport`].
//!
//! # Example
//!
//! ```
//! use coach_analysis_normalizer::normalize;
//!
//! let raw = r#"{"status": "Green", "confidence": 91, "summary": "Great week"}"#;
//! let analysis = normalize(Some(raw)).unwrap();
//! assert_eq!(analysis.status, "Green");
//! assert_eq!(analysis.confidence_score, 91);
//! assert_eq!(analysis.reasoning, "Great week");
//!
//! let fallback = normalize(Some("not json at all")).unwrap();
//! assert_eq!(fallback.status, "Analyzed");
//! assert_eq!(fallback.reasoning, "not json at all");
//!
//! assert!(normalize(None).is_none());
//! ```

pub mod output;
pub mod report;
pub mod sections;
pub mod strategies;

use coach_analysis_core::{MAX_CONFIDENCE, NormalizedAnalysis, validate_analysis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use report::{NormalizeReport, NormalizeRun};
use strategies::PIPELINE;

/// Treatment of confidence scores outside `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidencePolicy {
    /// Keep the score exactly as parsed.
    #[default]
    Passthrough,
    /// Clamp the score into `0..=100`.
    Clamp,
}

impl ConfidencePolicy {
    pub fn apply(self, score: i64) -> i64 {
        match self {
            Self::Passthrough => score,
            Self::Clamp => score.clamp(0, MAX_CONFIDENCE),
        }
    }
}

/// Options controlling normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    #[serde(default)]
    pub confidence_policy: ConfidencePolicy,
}

/// Normalizes a raw response with default options.
///
/// Returns `None` when there is no response (`None` or an empty body).
pub fn normalize(raw: Option<&str>) -> Option<NormalizedAnalysis> {
    normalize_with(raw, &NormalizeOptions::default())
}

/// Normalizes a raw response with the given options.
///
/// # Examples
///
/// ```
/// use coach_analysis_normalizer::{ConfidencePolicy, NormalizeOptions, normalize_with};
///
/// let options = NormalizeOptions { confidence_policy: ConfidencePolicy::Clamp };
/// let analysis = normalize_with(Some(r#"{"confidence": 180}"#), &options).unwrap();
/// assert_eq!(analysis.confidence_score, 100);
/// ```
pub fn normalize_with(raw: Option<&str>, options: &NormalizeOptions) -> Option<NormalizedAnalysis> {
    normalize_with_report(raw, options).map(|run| run.analysis)
}

/// Normalizes a raw response and reports which strategy handled it.
///
/// # Examples
///
/// ```
/// use coach_analysis_normalizer::{NormalizeOptions, normalize_with_report};
/// use coach_analysis_normalizer::strategies::StrategyKind;
///
/// let raw = "Status: Yellow\nReasoning: Sleep dipped this week.";
/// let run = normalize_with_report(Some(raw), &NormalizeOptions::default()).unwrap();
/// assert_eq!(run.report.strategy, StrategyKind::Section);
/// assert_eq!(run.report.strategies_tried, vec![StrategyKind::Json, StrategyKind::Section]);
/// assert_eq!(run.analysis.status, "Yellow");
/// ```
pub fn normalize_with_report(raw: Option<&str>, options: &NormalizeOptions) -> Option<NormalizeRun> {
    let raw = raw.filter(|body| !body.is_empty())?;
    let mut strategies_tried = Vec::new();

    for strategy in PIPELINE {
        strategies_tried.push(strategy.kind());
        let Some(extraction) = strategy.extract(raw) else {
            debug!(strategy = %strategy.kind(), "strategy declined response");
            continue;
        };

        let mut analysis = extraction.analysis;
        let raw_confidence = analysis.confidence_score;
        analysis.confidence_score = options.confidence_policy.apply(raw_confidence);

        let warnings = validate_analysis(&analysis)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();

        debug!(
            strategy = %strategy.kind(),
            fields = extraction.fields_found.len(),
            warnings = warnings.len(),
            "normalized analysis response"
        );

        let report = NormalizeReport {
            strategy: strategy.kind(),
            strategies_tried,
            fields_found: extraction.fields_found,
            severity: analysis.severity(),
            raw_confidence,
            confidence_clamped: raw_confidence != analysis.confidence_score,
            input_len: raw.len(),
            warnings,
        };
        return Some(NormalizeRun { analysis, report });
    }

    None
}
