//! Approved analyses.
//!
//! Approving a session's working copy produces an [`ApprovedAnalysis`]: the
//! record, the client it belongs to and the moment it was approved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::NormalizedAnalysis;

/// A committed analysis, ready to hand to a persistence or notification
/// service.
///
/// # Examples
///
/// ```
/// use coach_analysis_core::*;
///
/// let approved = ApprovedAnalysis::new(
///     Some("C001".into()),
///     NormalizedAnalysis::from_plain_text("Solid week."),
/// );
/// assert_eq!(approved.client_id.as_deref(), Some("C001"));
/// assert_eq!(approved.analysis.reasoning, "Solid week.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedAnalysis {
    /// Client the analysis was requested for, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub analysis: NormalizedAnalysis,
    pub approved_at: DateTime<Utc>,
}

impl ApprovedAnalysis {
    /// Creates an approval stamped with the current time.
    pub fn new(client_id: Option<String>, analysis: NormalizedAnalysis) -> Self {
        Self::at(client_id, analysis, Utc::now())
    }

    pub fn at(
        client_id: Option<String>,
        analysis: NormalizedAnalysis,
        approved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            client_id,
            analysis,
            approved_at,
        }
    }
}
