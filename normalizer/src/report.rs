//! Structured reporting for one normalization run.

use coach_analysis_core::{AnalysisField, NormalizedAnalysis, Severity};
use serde::{Deserialize, Serialize};

use crate::strategies::StrategyKind;

/// Diagnostics describing how a raw response was normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    /// Strategy that produced the record.
    pub strategy: StrategyKind,
    /// Strategies consulted, in order, including the winner.
    pub strategies_tried: Vec<StrategyKind>,
    /// Fields the winning strategy found in the input.
    pub fields_found: Vec<AnalysisField>,
    pub severity: Severity,
    /// Confidence before the confidence policy was applied.
    pub raw_confidence: i64,
    pub confidence_clamped: bool,
    /// Byte length of the raw response.
    pub input_len: usize,
    /// Validation findings rendered as messages.
    pub warnings: Vec<String>,
}

/// A normalized record together with its report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeRun {
    pub analysis: NormalizedAnalysis,
    pub report: NormalizeReport,
}
