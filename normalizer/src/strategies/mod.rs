//! Pluggable extraction strategies for analysis responses.

pub mod json;
pub mod plain;
pub mod section;

use std::fmt;

use coach_analysis_core::{AnalysisField, NormalizedAnalysis};
use serde::{Deserialize, Serialize};

pub use json::JsonStrategy;
pub use plain::PlainTextStrategy;
pub use section::SectionStrategy;

/// Identifies which strategy produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Json,
    Section,
    PlainText,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Section => write!(f, "section"),
            Self::PlainText => write!(f, "plain_text"),
        }
    }
}

/// A record produced by one strategy, with the fields it actually found in
/// the input.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub analysis: NormalizedAnalysis,
    pub fields_found: Vec<AnalysisField>,
}

/// Strategy for turning a raw response body into a [`NormalizedAnalysis`].
///
/// A strategy either produces a record or declines with `None`, leaving the
/// input to the next strategy in [`PIPELINE`].
pub trait ExtractionStrategy {
    fn kind(&self) -> StrategyKind;
    fn extract(&self, raw: &str) -> Option<Extraction>;
}

/// Strategies in the order they are tried. The last one always succeeds.
pub const PIPELINE: [&dyn ExtractionStrategy; 3] =
    [&JsonStrategy, &SectionStrategy, &PlainTextStrategy];
