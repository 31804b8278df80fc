//! Raw text fallback strategy.

use coach_analysis_core::{AnalysisField, NormalizedAnalysis};

use super::{Extraction, ExtractionStrategy, StrategyKind};

/// Keeps the whole body as the reasoning of an `"Analyzed"` record.
pub struct PlainTextStrategy;

impl ExtractionStrategy for PlainTextStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PlainText
    }

    fn extract(&self, raw: &str) -> Option<Extraction> {
        Some(Extraction {
            analysis: NormalizedAnalysis::from_plain_text(raw),
            fields_found: vec![AnalysisField::Reasoning],
        })
    }
}
