//! Analysis and roster validation.
//!
//! Analysis validation never rejects a record: the normalizer accepts
//! whatever the analysis service returns, so the findings here surface as
//! report warnings. Roster validation is strict and gates roster loading.
//!
//! # Examples
//!
//! ```
//! use coach_analysis_core::*;
//!
//! let mut analysis = NormalizedAnalysis::structured_default();
//! analysis.reasoning = "Consistent training week.".into();
//! analysis.confidence_score = 80;
//! assert!(validate_analysis(&analysis).is_empty());
//!
//! analysis.confidence_score = 140;
//! assert_eq!(
//!     validate_analysis(&analysis),
//!     vec![ValidationError::ConfidenceOutOfRange(140)]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{AnalysisField, NormalizedAnalysis, Roster};

/// Highest meaningful confidence score.
pub const MAX_CONFIDENCE: i64 = 100;

/// Analysis and roster validation findings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Status label is empty or whitespace-only.
    #[error("analysis status is empty")]
    EmptyStatus,
    /// Confidence score lies outside `0..=100`.
    #[error("confidence score {0} is outside 0..=100")]
    ConfidenceOutOfRange(i64),
    /// No summary, next action or category insight is present.
    #[error("analysis carries no summary, action or category insight")]
    EmptyAnalysis,
    /// Client identifier is empty or whitespace-only.
    #[error("client id cannot be empty")]
    EmptyClientId,
    /// Two clients share an identifier.
    #[error("duplicate client id: {0}")]
    DuplicateClientId(String),
    /// Client progress exceeds 100 percent.
    #[error("client {id} has progress {progress}% above 100%")]
    ProgressOutOfRange { id: String, progress: u32 },
}

/// Reports questionable content in a normalized analysis.
pub fn validate_analysis(analysis: &NormalizedAnalysis) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if analysis.status.trim().is_empty() {
        errors.push(ValidationError::EmptyStatus);
    }

    if !(0..=MAX_CONFIDENCE).contains(&analysis.confidence_score) {
        errors.push(ValidationError::ConfidenceOutOfRange(
            analysis.confidence_score,
        ));
    }

    let has_content = [
        AnalysisField::NextBestAction,
        AnalysisField::Reasoning,
        AnalysisField::Workout,
        AnalysisField::Nutrition,
        AnalysisField::Movement,
        AnalysisField::Sleep,
    ]
    .iter()
    .any(|field| !analysis.text(*field).trim().is_empty());
    if !has_content {
        errors.push(ValidationError::EmptyAnalysis);
    }

    errors
}

/// Validates client identifiers and progress values.
///
/// # Examples
///
/// ```
/// use coach_analysis_core::*;
///
/// assert!(validate_roster(&Roster::demo()).is_empty());
///
/// let mut roster = Roster::demo();
/// roster.clients[0].progress = 120;
/// assert!(matches!(
///     validate_roster(&roster)[0],
///     ValidationError::ProgressOutOfRange { progress: 120, .. }
/// ));
/// ```
pub fn validate_roster(roster: &Roster) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for client in &roster.clients {
        if client.id.trim().is_empty() {
            errors.push(ValidationError::EmptyClientId);
        } else if !seen.insert(client.id.as_str()) {
            errors.push(ValidationError::DuplicateClientId(client.id.clone()));
        }

        if client.progress > 100 {
            errors.push(ValidationError::ProgressOutOfRange {
                id: client.id.clone(),
                progress: client.progress,
            });
        }
    }

    errors
}
