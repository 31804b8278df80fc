//! Core analysis and roster types for the coaching dashboard.
//!
//! This crate defines the data model shared by the normalizer, the editing
//! session and the command-line tool:
//!
//! - [`NormalizedAnalysis`] — canonical record distilled from an external
//!   analysis response (status, confidence, next action, summary and four
//!   category insights).
//! - [`AnalysisField`] / [`FieldValue`] — addressable fields and the values
//!   an editor writes into them.
//! - [`Severity`] / [`classify_status`] — ordered substring rules mapping a
//!   status label onto a display severity.
//! - [`ApprovedAnalysis`] — the committed record produced on approval.
//! - [`Roster`] / [`Client`] — coached clients and their overview statistics.
//!
//! Validation ([`validate_analysis`], [`validate_roster`]) reports suspicious
//! analysis content and rejects inconsistent rosters.
//!
//! # Example
//!
//! ```
//! use coach_analysis_core::*;
//!
//! let mut analysis = NormalizedAnalysis::structured_default();
//! analysis.set_field(AnalysisField::Reasoning, "Strength is trending up.".into());
//! analysis.set_field(AnalysisField::ConfidenceScore, FieldValue::Number(78));
//!
//! assert_eq!(analysis.severity(), Severity::Positive);
//! assert_eq!(analysis.confidence_display(), "78%");
//! assert!(validate_analysis(&analysis).is_empty());
//! ```

mod approval;
mod roster;
mod status;
mod types;
mod validate;

pub use approval::ApprovedAnalysis;
pub use roster::{Client, Roster, RosterError, RosterOverview};
pub use status::{STATUS_RULES, Severity, StatusRule, classify_status};
pub use types::*;
pub use validate::{MAX_CONFIDENCE, ValidationError, validate_analysis, validate_roster};
