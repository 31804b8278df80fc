//! Analysis type definitions.
//!
//! This module defines the canonical record produced from an external
//! analysis response, the addressable fields of that record, and the values
//! an editor may write into them. The record serializes with camelCase keys
//! so it can be handed back to the dashboard unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::{Severity, classify_status};

/// Status used when a structured (JSON) response carries no status.
pub const STRUCTURED_DEFAULT_STATUS: &str = "On Track";

/// Status used when a response could only be read as free text.
pub const TEXT_DEFAULT_STATUS: &str = "Analyzed";

/// Canonical, fully-defaulted analysis record used for display and editing.
///
/// # Examples
///
/// ```
/// use coach_analysis_core::{NormalizedAnalysis, Severity};
///
/// let analysis = NormalizedAnalysis::from_plain_text("Client is progressing well.");
/// assert_eq!(analysis.status, "Analyzed");
/// assert_eq!(analysis.reasoning, "Client is progressing well.");
/// assert_eq!(analysis.confidence_display(), "N/A");
/// assert_eq!(analysis.severity(), Severity::Neutral);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAnalysis {
    /// Coarse traffic-light style label (e.g. "On Track", "Needs Attention").
    pub status: String,
    /// Confidence reported by the analysis service. Not range-checked.
    pub confidence_score: i64,
    /// Single recommended next step.
    pub next_best_action: String,
    /// Free-text summary.
    pub reasoning: String,
    pub workout: String,
    pub nutrition: String,
    pub movement: String,
    pub sleep: String,
}

impl NormalizedAnalysis {
    /// Creates an empty record with the given status.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            confidence_score: 0,
            next_best_action: String::new(),
            reasoning: String::new(),
            workout: String::new(),
            nutrition: String::new(),
            movement: String::new(),
            sleep: String::new(),
        }
    }

    /// The record a structured response with no recognized keys maps to.
    pub fn structured_default() -> Self {
        Self::with_status(STRUCTURED_DEFAULT_STATUS)
    }

    /// Wraps unstructured text verbatim as the reasoning of an `"Analyzed"` record.
    pub fn from_plain_text(raw: &str) -> Self {
        let mut analysis = Self::with_status(TEXT_DEFAULT_STATUS);
        analysis.reasoning = raw.to_string();
        analysis
    }

    /// Returns the severity of the current status label.
    pub fn severity(&self) -> Severity {
        classify_status(&self.status)
    }

    /// Formats the confidence score for display.
    ///
    /// Scores of zero or below render as `"N/A"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use coach_analysis_core::NormalizedAnalysis;
    ///
    /// let mut analysis = NormalizedAnalysis::structured_default();
    /// assert_eq!(analysis.confidence_display(), "N/A");
    /// analysis.confidence_score = 87;
    /// assert_eq!(analysis.confidence_display(), "87%");
    /// ```
    pub fn confidence_display(&self) -> String {
        if self.confidence_score > 0 {
            format!("{}%", self.confidence_score)
        } else {
            "N/A".to_string()
        }
    }

    /// Returns `true` when at least one category insight is non-empty.
    pub fn has_category_insights(&self) -> bool {
        AnalysisField::CATEGORIES
            .iter()
            .any(|field| !self.text(*field).is_empty())
    }

    /// The field a viewer should open first: the first category when any
    /// category insight exists, otherwise the reasoning summary.
    pub fn default_tab(&self) -> AnalysisField {
        if self.has_category_insights() {
            AnalysisField::Workout
        } else {
            AnalysisField::Reasoning
        }
    }

    /// Borrows a text field. Returns an empty string for
    /// [`AnalysisField::ConfidenceScore`]; use [`field`](Self::field) to read it.
    pub fn text(&self, field: AnalysisField) -> &str {
        match field {
            AnalysisField::Status => &self.status,
            AnalysisField::ConfidenceScore => "",
            AnalysisField::NextBestAction => &self.next_best_action,
            AnalysisField::Reasoning => &self.reasoning,
            AnalysisField::Workout => &self.workout,
            AnalysisField::Nutrition => &self.nutrition,
            AnalysisField::Movement => &self.movement,
            AnalysisField::Sleep => &self.sleep,
        }
    }

    /// Reads any field as a [`FieldValue`].
    pub fn field(&self, field: AnalysisField) -> FieldValue {
        match field {
            AnalysisField::ConfidenceScore => FieldValue::Number(self.confidence_score),
            other => FieldValue::Text(self.text(other).to_string()),
        }
    }

    /// Text shown for a field in read-only mode, substituting the
    /// placeholder when the field is empty.
    pub fn display_text(&self, field: AnalysisField) -> String {
        if field == AnalysisField::ConfidenceScore {
            return self.confidence_display();
        }
        let text = self.text(field);
        match field.empty_placeholder() {
            Some(placeholder) if text.is_empty() => placeholder.to_string(),
            _ => text.to_string(),
        }
    }

    /// Replaces one field.
    ///
    /// Text written to [`AnalysisField::ConfidenceScore`] is parsed with
    /// [`parse_int_prefix`]; numbers written to text fields are stored in
    /// decimal.
    ///
    /// # Examples
    ///
    /// ```
    /// use coach_analysis_core::{AnalysisField, FieldValue, NormalizedAnalysis};
    ///
    /// let mut analysis = NormalizedAnalysis::structured_default();
    /// analysis.set_field(AnalysisField::ConfidenceScore, FieldValue::from("72 percent"));
    /// analysis.set_field(AnalysisField::Sleep, FieldValue::from("Aim for 8h"));
    /// assert_eq!(analysis.confidence_score, 72);
    /// assert_eq!(analysis.sleep, "Aim for 8h");
    /// ```
    pub fn set_field(&mut self, field: AnalysisField, value: FieldValue) {
        if field == AnalysisField::ConfidenceScore {
            self.confidence_score = value.as_integer();
            return;
        }
        let text = value.into_text();
        match field {
            AnalysisField::Status => self.status = text,
            AnalysisField::NextBestAction => self.next_best_action = text,
            AnalysisField::Reasoning => self.reasoning = text,
            AnalysisField::Workout => self.workout = text,
            AnalysisField::Nutrition => self.nutrition = text,
            AnalysisField::Movement => self.movement = text,
            AnalysisField::Sleep => self.sleep = text,
            AnalysisField::ConfidenceScore => {}
        }
    }
}

/// One addressable field of a [`NormalizedAnalysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisField {
    Status,
    ConfidenceScore,
    NextBestAction,
    Reasoning,
    Workout,
    Nutrition,
    Movement,
    Sleep,
}

impl AnalysisField {
    /// Every field in display order.
    pub const ALL: [AnalysisField; 8] = [
        AnalysisField::Status,
        AnalysisField::ConfidenceScore,
        AnalysisField::NextBestAction,
        AnalysisField::Reasoning,
        AnalysisField::Workout,
        AnalysisField::Nutrition,
        AnalysisField::Movement,
        AnalysisField::Sleep,
    ];

    /// The four category insights.
    pub const CATEGORIES: [AnalysisField; 4] = [
        AnalysisField::Workout,
        AnalysisField::Nutrition,
        AnalysisField::Movement,
        AnalysisField::Sleep,
    ];

    /// camelCase wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::ConfidenceScore => "confidenceScore",
            Self::NextBestAction => "nextBestAction",
            Self::Reasoning => "reasoning",
            Self::Workout => "workout",
            Self::Nutrition => "nutrition",
            Self::Movement => "movement",
            Self::Sleep => "sleep",
        }
    }

    /// Human-readable label, also used as the section heading in
    /// labeled-text responses.
    pub fn label(self) -> &'static str {
        match self {
            Self::Status => "Status",
            Self::ConfidenceScore => "Confidence Score",
            Self::NextBestAction => "Next Best Action",
            Self::Reasoning => "Reasoning",
            Self::Workout => "Workout",
            Self::Nutrition => "Nutrition",
            Self::Movement => "Movement",
            Self::Sleep => "Sleep",
        }
    }

    pub fn is_category(self) -> bool {
        Self::CATEGORIES.contains(&self)
    }

    /// Text shown in place of an empty field, if the field has one.
    pub fn empty_placeholder(self) -> Option<&'static str> {
        match self {
            Self::Reasoning => Some("No detailed analysis available."),
            Self::Workout | Self::Nutrition | Self::Movement | Self::Sleep => {
                Some("No data available for this category.")
            }
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a field name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown analysis field: {0}")]
pub struct UnknownFieldError(pub String);

impl FromStr for AnalysisField {
    type Err = UnknownFieldError;

    /// Accepts camelCase, snake_case, kebab-case and the spaced label, in
    /// any letter case.
    ///
    /// # Examples
    ///
    /// ```
    /// use coach_analysis_core::AnalysisField;
    ///
    /// assert_eq!("nextBestAction".parse::<AnalysisField>(), Ok(AnalysisField::NextBestAction));
    /// assert_eq!("next_best_action".parse::<AnalysisField>(), Ok(AnalysisField::NextBestAction));
    /// assert_eq!("Confidence Score".parse::<AnalysisField>(), Ok(AnalysisField::ConfidenceScore));
    /// assert!("mood".parse::<AnalysisField>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "status" => Ok(Self::Status),
            "confidencescore" | "confidence" => Ok(Self::ConfidenceScore),
            "nextbestaction" => Ok(Self::NextBestAction),
            "reasoning" | "summary" => Ok(Self::Reasoning),
            "workout" => Ok(Self::Workout),
            "nutrition" => Ok(Self::Nutrition),
            "movement" => Ok(Self::Movement),
            "sleep" => Ok(Self::Sleep),
            _ => Err(UnknownFieldError(s.to_string())),
        }
    }
}

/// A value written into an [`AnalysisField`] by an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl FieldValue {
    /// Integer view of the value; text is read with [`parse_int_prefix`].
    pub fn as_integer(&self) -> i64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => parse_int_prefix(s),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Reads the leading integer of a string the way loosely-typed dashboards do.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit. Strings without leading digits yield `0`, and values
/// beyond the `i64` range saturate.
///
/// # Examples
///
/// ```
/// use coach_analysis_core::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix("85"), 85);
/// assert_eq!(parse_int_prefix("  92% confident"), 92);
/// assert_eq!(parse_int_prefix("-4"), -4);
/// assert_eq!(parse_int_prefix("high"), 0);
/// ```
pub fn parse_int_prefix(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digit_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digit_len == 0 {
        return 0;
    }
    let magnitude = rest[..digit_len].parse::<i64>().unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}
