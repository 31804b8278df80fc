//! Output formatting for analyses, reports and rosters.

use coach_analysis_core::{AnalysisField, ApprovedAnalysis, NormalizedAnalysis, Roster};
use serde::Serialize;

use crate::report::{NormalizeReport, NormalizeRun};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Option<Result<String, String>> {
    match format {
        OutputFormat::Json => Some(
            serde_json::to_string_pretty(value)
                .map_err(|e| format!("JSON serialization failed: {e}")),
        ),
        OutputFormat::Yaml => Some(
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}")),
        ),
        OutputFormat::Markdown | OutputFormat::Table => None,
    }
}

/// Formats a normalized analysis in the requested output format.
pub fn format_analysis(analysis: &NormalizedAnalysis, format: OutputFormat) -> Result<String, String> {
    if let Some(serialized) = serialize(analysis, format) {
        return serialized;
    }
    Ok(match format {
        OutputFormat::Markdown => analysis_to_markdown(analysis),
        _ => analysis_to_table(analysis),
    })
}

/// Formats an analysis together with its normalization report.
pub fn format_run(run: &NormalizeRun, format: OutputFormat) -> Result<String, String> {
    if let Some(serialized) = serialize(run, format) {
        return serialized;
    }
    Ok(match format {
        OutputFormat::Markdown => format!(
            "{}\n{}",
            analysis_to_markdown(&run.analysis),
            report_to_markdown(&run.report)
        ),
        _ => format!(
            "{}\n{}",
            analysis_to_table(&run.analysis),
            report_to_table(&run.report)
        ),
    })
}

/// Formats an approved analysis.
pub fn format_approved(approved: &ApprovedAnalysis, format: OutputFormat) -> Result<String, String> {
    if let Some(serialized) = serialize(approved, format) {
        return serialized;
    }
    let client = approved.client_id.as_deref().unwrap_or("-");
    let approved_at = approved.approved_at.to_rfc3339();
    Ok(match format {
        OutputFormat::Markdown => format!(
            "{}\n**Client:** {client}  \n**Approved:** {approved_at}\n",
            analysis_to_markdown(&approved.analysis)
        ),
        _ => format!(
            "Client: {client}  Approved: {approved_at}\n{}",
            analysis_to_table(&approved.analysis)
        ),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RosterView<'a> {
    overview: coach_analysis_core::RosterOverview,
    clients: &'a [coach_analysis_core::Client],
}

/// Formats a roster with its overview statistics.
pub fn format_roster(roster: &Roster, format: OutputFormat) -> Result<String, String> {
    let view = RosterView {
        overview: roster.overview(),
        clients: &roster.clients,
    };
    if let Some(serialized) = serialize(&view, format) {
        return serialized;
    }
    Ok(match format {
        OutputFormat::Markdown => roster_to_markdown(roster),
        _ => roster_to_table(roster),
    })
}

fn analysis_to_markdown(analysis: &NormalizedAnalysis) -> String {
    let mut out = String::new();

    out.push_str("# Performance Analysis\n\n");
    out.push_str(&format!(
        "- **Status:** {} ({})\n",
        analysis.status,
        analysis.severity()
    ));
    out.push_str(&format!(
        "- **Confidence:** {}\n\n",
        analysis.confidence_display()
    ));

    if !analysis.next_best_action.is_empty() {
        out.push_str("## Next Best Action\n\n");
        out.push_str(&format!("{}\n\n", analysis.next_best_action));
    }

    out.push_str("## Analysis Summary\n\n");
    out.push_str(&format!(
        "{}\n\n",
        analysis.display_text(AnalysisField::Reasoning)
    ));

    for field in AnalysisField::CATEGORIES {
        out.push_str(&format!("## {} Insights\n\n", field.label()));
        out.push_str(&format!("{}\n\n", analysis.display_text(field)));
    }

    out
}

fn analysis_to_table(analysis: &NormalizedAnalysis) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Status: {} [{}]  Confidence: {}\n",
        analysis.status,
        analysis.severity(),
        analysis.confidence_display()
    ));

    let rows = [
        AnalysisField::NextBestAction,
        AnalysisField::Reasoning,
        AnalysisField::Workout,
        AnalysisField::Nutrition,
        AnalysisField::Movement,
        AnalysisField::Sleep,
    ];
    let width = rows
        .iter()
        .map(|field| field.label().len())
        .max()
        .unwrap_or(8);

    for field in rows {
        let text = analysis.text(field);
        if text.is_empty() {
            continue;
        }
        let mut lines = text.lines();
        let first = lines.next().unwrap_or("");
        out.push_str(&format!("  {:<width$}  {first}\n", field.label()));
        for line in lines {
            out.push_str(&format!("  {:<width$}  {line}\n", ""));
        }
    }

    out
}

fn report_to_markdown(report: &NormalizeReport) -> String {
    let mut out = String::new();

    out.push_str("## Normalization Report\n\n");
    out.push_str(&format!("- **Strategy:** {}\n", report.strategy));
    out.push_str(&format!(
        "- **Fields Found:** {}\n",
        join_fields(&report.fields_found)
    ));
    out.push_str(&format!("- **Raw Confidence:** {}\n", report.raw_confidence));
    if report.confidence_clamped {
        out.push_str("- **Confidence Clamped:** yes\n");
    }

    if !report.warnings.is_empty() {
        out.push_str("\n### Warnings\n\n");
        for w in &report.warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }

    out
}

fn report_to_table(report: &NormalizeReport) -> String {
    let mut out = format!(
        "Strategy: {}  Fields: {}  Input: {} bytes\n",
        report.strategy,
        join_fields(&report.fields_found),
        report.input_len
    );
    for w in &report.warnings {
        out.push_str(&format!("  warning: {w}\n"));
    }
    out
}

fn join_fields(fields: &[AnalysisField]) -> String {
    if fields.is_empty() {
        return "none".to_string();
    }
    fields
        .iter()
        .map(|field| field.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn roster_to_markdown(roster: &Roster) -> String {
    let overview = roster.overview();
    let mut out = String::new();

    out.push_str("# Clients\n\n");
    out.push_str(&format!("- **Total Clients:** {}\n", overview.total_clients));
    out.push_str(&format!("- **Avg. Progress:** {}%\n", overview.average_progress));
    out.push_str(&format!("- **Avg. Heart Rate:** {} bpm\n", overview.average_heart_rate));
    out.push_str(&format!("- **Workouts:** {}\n\n", overview.total_workouts));

    if !roster.is_empty() {
        out.push_str("| ID | Name | Age | Goal | Progress | Avg HR | Workouts | Last Session |\n");
        out.push_str("|----|------|-----|------|----------|--------|----------|--------------|\n");
        for c in &roster.clients {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {}% | {} bpm | {} | {} |\n",
                c.id,
                c.name,
                c.age,
                c.goal,
                c.progress,
                c.heart_rate,
                c.workouts_completed,
                c.last_session
            ));
        }
    }

    out
}

fn roster_to_table(roster: &Roster) -> String {
    let overview = roster.overview();
    let mut out = format!(
        "Clients: {}  Avg progress: {}%  Avg HR: {} bpm  Workouts: {}\n",
        overview.total_clients,
        overview.average_progress,
        overview.average_heart_rate,
        overview.total_workouts
    );

    let name_width = roster
        .clients
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(4);
    for c in &roster.clients {
        out.push_str(&format!(
            "  {}  {:<width$}  {:>3}%  {:>3} bpm  {:>3} workouts  {}\n",
            c.id,
            c.name,
            c.progress,
            c.heart_rate,
            c.workouts_completed,
            c.goal,
            width = name_width
        ));
    }

    out
}
