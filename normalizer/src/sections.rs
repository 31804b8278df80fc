//! Labeled-section extraction for `Label: content` analysis text.
//!
//! A section starts at one of the recognized labels (case-insensitive,
//! followed by a colon, whitespace or end of line) and runs until the next
//! line that starts with a recognized label, or to the end of the text. A
//! label at the start of a line is preferred over one in the middle of a
//! line.

use std::sync::LazyLock;

use coach_analysis_core::{AnalysisField, parse_int_prefix};
use regex::Regex;

// A label only counts as a header when followed by `:`, blank space or EOL.
const HEADER_TAIL: &str = r"(?:[ \t]*:|[ \t]|\r?$)";

fn label_pattern(field: AnalysisField) -> &'static str {
    match field {
        AnalysisField::Status => "status",
        AnalysisField::ConfidenceScore => r"confidence\s*score",
        AnalysisField::NextBestAction => r"next\s*best\s*action",
        AnalysisField::Reasoning => "reasoning",
        AnalysisField::Workout => "workout",
        AnalysisField::Nutrition => "nutrition",
        AnalysisField::Movement => "movement",
        AnalysisField::Sleep => "sleep",
    }
}

struct SectionHeader {
    field: AnalysisField,
    line_start: Regex,
    inline: Regex,
}

static SECTION_HEADERS: LazyLock<Vec<SectionHeader>> = LazyLock::new(|| {
    AnalysisField::ALL
        .iter()
        .map(|field| {
            let label = label_pattern(*field);
            SectionHeader {
                field: *field,
                line_start: Regex::new(&format!(r"(?im)^[ \t]*{label}{HEADER_TAIL}"))
                    .expect("static regex must compile"),
                inline: Regex::new(&format!(r"(?im)\b{label}{HEADER_TAIL}"))
                    .expect("static regex must compile"),
            }
        })
        .collect()
});

static ANY_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let labels = AnalysisField::ALL
        .iter()
        .map(|field| label_pattern(*field))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?im)^[ \t]*(?:{labels}){HEADER_TAIL}"))
        .expect("static regex must compile")
});

static CONFIDENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)confidence\s*score[:\s]*(\d+)").expect("static regex must compile")
});

fn find_header(text: &str, field: AnalysisField) -> Option<regex::Match<'_>> {
    let header = SECTION_HEADERS.iter().find(|header| header.field == field)?;
    header
        .line_start
        .find(text)
        .or_else(|| header.inline.find(text))
}

/// Returns the trimmed content of the first `field` section in `text`, or an
/// empty string when the label does not appear.
///
/// # Examples
///
/// ```
/// use coach_analysis_core::AnalysisField;
/// use coach_analysis_normalizer::sections::extract_section;
///
/// let text = "Status: Needs Attention\nWorkout: Add a rest day\nafter leg sessions\nSleep: 7h";
/// assert_eq!(extract_section(text, AnalysisField::Status), "Needs Attention");
/// assert_eq!(
///     extract_section(text, AnalysisField::Workout),
///     "Add a rest day\nafter leg sessions"
/// );
/// assert_eq!(extract_section(text, AnalysisField::Nutrition), "");
/// ```
pub fn extract_section(text: &str, field: AnalysisField) -> String {
    let Some(header) = find_header(text, field) else {
        return String::new();
    };
    let start = header.end();
    let end = ANY_HEADER_RE
        .find_at(text, start)
        .map_or(text.len(), |next| next.start());
    text[start..end].trim().to_string()
}

/// Returns `true` when the label for `field` appears in `text`.
pub fn has_section(text: &str, field: AnalysisField) -> bool {
    find_header(text, field).is_some()
}

/// Returns `true` when `text` contains at least one recognized label.
pub fn has_labeled_sections(text: &str) -> bool {
    SECTION_HEADERS
        .iter()
        .any(|header| header.inline.is_match(text))
}

/// Fields whose label appears in `text`, in display order.
pub fn present_sections(text: &str) -> Vec<AnalysisField> {
    AnalysisField::ALL
        .into_iter()
        .filter(|field| has_section(text, *field))
        .collect()
}

/// Pulls the digits following `Confidence Score` anywhere in `text`.
/// Returns 0 when there is no such match.
///
/// # Examples
///
/// ```
/// use coach_analysis_normalizer::sections::extract_confidence_score;
///
/// assert_eq!(extract_confidence_score("Confidence Score: 87"), 87);
/// assert_eq!(extract_confidence_score("confidencescore 5"), 5);
/// assert_eq!(extract_confidence_score("Confidence: high"), 0);
/// ```
pub fn extract_confidence_score(text: &str) -> i64 {
    CONFIDENCE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(0, |digits| parse_int_prefix(digits.as_str()))
}
