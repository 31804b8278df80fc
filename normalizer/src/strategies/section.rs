//! Labeled-section text strategy.

use coach_analysis_core::{AnalysisField, NormalizedAnalysis, TEXT_DEFAULT_STATUS};

use super::{Extraction, ExtractionStrategy, StrategyKind};
use crate::sections::{
    extract_confidence_score, extract_section, has_labeled_sections, has_section,
    present_sections,
};

pub struct SectionStrategy;

impl ExtractionStrategy for SectionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Section
    }

    fn extract(&self, text: &str) -> Option<Extraction> {
        if !has_labeled_sections(text) {
            return None;
        }

        let mut analysis = NormalizedAnalysis::with_status(TEXT_DEFAULT_STATUS);
        for field in AnalysisField::ALL {
            if field == AnalysisField::ConfidenceScore {
                analysis.confidence_score = extract_confidence_score(text);
                continue;
            }
            let content = extract_section(text, field);
            if !content.is_empty() {
                analysis.set_field(field, content.into());
            }
        }

        // Without an explicit summary the whole body stays readable.
        if !has_section(text, AnalysisField::Reasoning) {
            analysis.reasoning = text.to_string();
        }

        Some(Extraction {
            analysis,
            fields_found: present_sections(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declines_unlabeled_text() {
        assert!(SectionStrategy.extract("Great week overall.").is_none());
    }

    #[test]
    fn test_labeled_report() {
        let raw = "Status: Needs Attention\nConfidence Score: 64\nReasoning: Two missed sessions.\nSleep: Under 6h";
        let out = SectionStrategy.extract(raw).unwrap();
        let a = out.analysis;
        assert_eq!(a.status, "Needs Attention");
        assert_eq!(a.confidence_score, 64);
        assert_eq!(a.reasoning, "Two missed sessions.");
        assert_eq!(a.sleep, "Under 6h");
        assert_eq!(a.workout, "");
        assert_eq!(
            out.fields_found,
            vec![
                AnalysisField::Status,
                AnalysisField::ConfidenceScore,
                AnalysisField::Reasoning,
                AnalysisField::Sleep
            ]
        );
    }

    #[test]
    fn test_missing_status_and_reasoning_fall_back() {
        let raw = "Workout: Add intervals\nNutrition: Hydrate";
        let a = SectionStrategy.extract(raw).unwrap().analysis;
        assert_eq!(a.status, "Analyzed");
        assert_eq!(a.confidence_score, 0);
        assert_eq!(a.reasoning, raw);
        assert_eq!(a.workout, "Add intervals");
    }

    #[test]
    fn test_mid_line_status_label() {
        let raw = "Weekly recap. Status: Needs Attention\nSleep: 6h";
        let a = SectionStrategy.extract(raw).unwrap().analysis;
        assert_eq!(a.status, "Needs Attention");
        assert_eq!(a.sleep, "6h");
        assert_eq!(a.reasoning, raw);
    }
}
