//! Markdown and JSON report generation.
//!
//! This module renders analysis reports for the terminal or a file. The
//! HTTP API returns reports as JSON directly and does not go through here.

use crate::models::{
    AnalysisReport, AnalysisReportExtended, Dimension, Pillar, ReportMetadata, ScoreBand,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Generate a complete Markdown report for a coordinator analysis.
pub fn generate_markdown_report(report: &AnalysisReport, metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    output.push_str("# EssayLens Report\n\n");
    output.push_str(&generate_metadata_section(metadata));
    output.push_str(&generate_score_section(report.overall_score));

    for dimension in Dimension::ALL {
        output.push_str(&format!("## {} Feedback\n\n", dimension));
        output.push_str(report.feedback(dimension).trim());
        output.push_str("\n\n");
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a complete Markdown report for a pillar analysis.
pub fn generate_pillar_markdown_report(
    report: &AnalysisReportExtended,
    metadata: &ReportMetadata,
) -> String {
    let mut output = String::new();

    output.push_str("# EssayLens Report\n\n");
    output.push_str(&generate_metadata_section(metadata));
    output.push_str(&generate_score_section(report.overall_score));

    // Pillar table
    output.push_str("## Pillars\n\n");
    output.push_str("| Pillar | Score |\n");
    output.push_str("|:---|:---:|\n");
    for pillar in &report.pillars {
        output.push_str(&format!("| {} | {} |\n", pillar.name, pillar.score));
    }
    output.push('\n');

    for pillar in &report.pillars {
        output.push_str(&generate_pillar_block(pillar));
    }

    output.push_str(&generate_list_section("Strengths", &report.strengths));
    output.push_str(&generate_list_section(
        "Areas for Improvement",
        &report.areas_for_improvement,
    ));

    if !report.detailed_feedback.trim().is_empty() {
        output.push_str("## Detailed Feedback\n\n");
        output.push_str(report.detailed_feedback.trim());
        output.push_str("\n\n");
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    if let Some(ref session_id) = metadata.session_id {
        section.push_str(&format!("- **Session:** `{}`\n", session_id));
    }
    section.push_str(&format!("- **Requester:** {}\n", metadata.requester_id));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Profile:** {}\n", metadata.profile));
    match metadata.model_used {
        Some(ref model) => section.push_str(&format!("- **Model Used:** `{}`\n", model)),
        None => section.push_str("- **Model Used:** none (text statistics only)\n"),
    }
    section.push_str(&format!("- **Word Count:** {}\n", metadata.word_count));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_score_section(score: u8) -> String {
    format!(
        "## Overall Score\n\n**{}/100** ({})\n\n",
        score,
        ScoreBand::from_score(score)
    )
}

/// Generate the block for a single pillar.
fn generate_pillar_block(pillar: &Pillar) -> String {
    let mut block = String::new();

    block.push_str(&format!("### {} ({}/100)\n\n", pillar.name, pillar.score));

    if !pillar.feedback.is_empty() {
        block.push_str(&pillar.feedback);
        block.push_str("\n\n");
    }

    for suggestion in &pillar.suggestions {
        block.push_str(&format!("> 💡 **Suggestion:** {}\n\n", suggestion));
    }

    block
}

fn generate_list_section(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut section = format!("## {}\n\n", title);
    for item in items {
        section.push_str(&format!("- {}\n", item));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by EssayLens*\n".to_string()
}

#[derive(Serialize)]
struct JsonReport<'a, T: Serialize> {
    metadata: &'a ReportMetadata,
    report: &'a T,
}

/// Generate a JSON report wrapping either report shape with its metadata.
pub fn generate_json_report<T: Serialize>(report: &T, metadata: &ReportMetadata) -> Result<String> {
    serde_json::to_string_pretty(&JsonReport { metadata, report }).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(())
}
