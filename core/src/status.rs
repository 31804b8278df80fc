//! Status severity classification.
//!
//! Maps a free-form status label onto a small set of severities used to pick
//! a display style. The match rules live in [`STATUS_RULES`] so the
//! precedence order can be inspected and tested on its own.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display severity of an analysis status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Positive,
    Warning,
    Critical,
    Neutral,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification rule: a severity and the lowercase substrings that
/// select it.
#[derive(Debug, Clone, Copy)]
pub struct StatusRule {
    pub severity: Severity,
    pub needles: &'static [&'static str],
}

/// Classification rules in precedence order. The first rule with a matching
/// substring wins; statuses matching no rule are [`Severity::Neutral`].
pub const STATUS_RULES: &[StatusRule] = &[
    StatusRule {
        severity: Severity::Positive,
        needles: &["green", "on track", "good", "excellent"],
    },
    StatusRule {
        severity: Severity::Warning,
        needles: &["yellow", "warning", "attention", "needs"],
    },
    StatusRule {
        severity: Severity::Critical,
        needles: &["red", "critical", "urgent"],
    },
];

/// Classifies a status label by case-insensitive substring match.
///
/// # Examples
///
/// ```
/// use coach_analysis_core::{Severity, classify_status};
///
/// assert_eq!(classify_status("All Green"), Severity::Positive);
/// assert_eq!(classify_status("Needs Attention"), Severity::Warning);
/// assert_eq!(classify_status("Critical issue"), Severity::Critical);
/// assert_eq!(classify_status("Stable"), Severity::Neutral);
/// ```
pub fn classify_status(status: &str) -> Severity {
    let lower = status.to_lowercase();
    STATUS_RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|needle| lower.contains(needle)))
        .map_or(Severity::Neutral, |rule| rule.severity)
}
