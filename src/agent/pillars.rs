//! Engine-backed pillar scoring.
//!
//! Asks the engine for an [`AnalysisReportExtended`] directly. Output that
//! cannot be salvaged falls back to the heuristic profile; engine failures
//! are returned to the caller.

use crate::agent::prompts::PILLAR_PROMPT;
use crate::analysis::heuristic::{heuristic_fallback, heuristic_pillar, mean_score, TextStats};
use crate::analysis::normalizer::{clamp_score, decode_object, numeric_field, text_field};
use crate::engine::AnalysisEngine;
use crate::error::EngineError;
use crate::models::{AnalysisReportExtended, Pillar, PillarKind};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Scores essays on the four pillars through the engine.
pub struct PillarAnalyzer {
    engine: Arc<dyn AnalysisEngine>,
    timeout: Duration,
}

impl PillarAnalyzer {
    pub fn new(engine: Arc<dyn AnalysisEngine>, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    pub async fn analyze(&self, essay_text: &str) -> Result<AnalysisReportExtended, EngineError> {
        let message = format!("Essay to analyze:\n\n{}", essay_text);
        let raw = tokio::time::timeout(self.timeout, self.engine.invoke(PILLAR_PROMPT, &message))
            .await
            .map_err(|_| EngineError::Timeout(self.timeout.as_secs()))??;

        match normalize_pillars(&raw, essay_text) {
            Some(report) => Ok(report),
            None => {
                warn!("Pillar response could not be parsed; using heuristic scores");
                Ok(heuristic_fallback(essay_text, &raw))
            }
        }
    }
}

/// Decodes the engine's pillar report, filling gaps from the heuristic
/// profile. `None` when the output has no recognizable pillar at all.
pub fn normalize_pillars(raw: &str, essay_text: &str) -> Option<AnalysisReportExtended> {
    let map = decode_object(raw).ok()?;
    let entries: Vec<&Map<String, Value>> = map
        .get("pillars")?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .collect();

    let stats = TextStats::measure(essay_text);
    let heuristic_scores = stats.pillar_scores();
    let mut matched = 0;

    let pillars: Vec<Pillar> = PillarKind::ALL
        .into_iter()
        .zip(heuristic_scores)
        .map(|(kind, fallback_score)| {
            let entry = entries.iter().find(|entry| {
                entry
                    .get("name")
                    .and_then(Value::as_str)
                    .and_then(PillarKind::from_name)
                    == Some(kind)
            });

            match entry {
                Some(entry) => {
                    matched += 1;
                    parse_pillar(kind, entry, fallback_score)
                }
                None => {
                    debug!("Pillar '{}' missing from response", kind.name());
                    heuristic_pillar(kind, fallback_score)
                }
            }
        })
        .collect();

    if matched == 0 {
        return None;
    }

    let overall_score = match numeric_field(&map, "overallScore") {
        Some(score) => clamp_score(score),
        None => {
            let scores: Vec<f64> = pillars.iter().map(|p| f64::from(p.score)).collect();
            mean_score(&scores)
        }
    };

    Some(AnalysisReportExtended {
        overall_score,
        pillars,
        strengths: string_list(&map, "strengths"),
        areas_for_improvement: string_list(&map, "areasForImprovement"),
        detailed_feedback: text_field(&map, "detailedFeedback")
            .unwrap_or_else(|| "No detailed feedback available".to_string()),
    })
}

fn parse_pillar(kind: PillarKind, entry: &Map<String, Value>, fallback_score: f64) -> Pillar {
    let defaults = heuristic_pillar(kind, fallback_score);

    let suggestions = string_list(entry, "suggestions");

    Pillar {
        name: kind.name().to_string(),
        score: numeric_field(entry, "score")
            .map(clamp_score)
            .unwrap_or(defaults.score),
        feedback: text_field(entry, "feedback").unwrap_or(defaults.feedback),
        suggestions: if suggestions.is_empty() {
            defaults.suggestions
        } else {
            suggestions
        },
    }
}

/// Non-blank strings of an array field, in order. Other element types are
/// skipped.
fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
