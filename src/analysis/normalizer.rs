//! Response normalization.
//!
//! Turns the engine's free-text output into a fully-populated
//! [`AnalysisReport`]. Normalization never fails: malformed output degrades
//! to [`AnalysisReport::fallback`], missing fields are replaced with
//! placeholders, and scores are truncated and clamped into `0..=100`.

use crate::models::{AnalysisReport, Dimension, RawAnalysisOutput, DEFAULT_SCORE, MAX_SCORE};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Outcome of normalizing one engine response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The output decoded as a JSON object. `repaired` names every field that
    /// had to be substituted or clamped.
    Parsed {
        report: AnalysisReport,
        repaired: Vec<&'static str>,
    },
    /// The output could not be decoded; the fixed fallback report was used.
    Fallback {
        report: AnalysisReport,
        reason: String,
    },
}

impl Normalized {
    pub fn report(&self) -> &AnalysisReport {
        match self {
            Normalized::Parsed { report, .. } | Normalized::Fallback { report, .. } => report,
        }
    }

    pub fn into_report(self) -> AnalysisReport {
        match self {
            Normalized::Parsed { report, .. } | Normalized::Fallback { report, .. } => report,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Normalized::Fallback { .. })
    }
}

/// Removes surrounding whitespace and an optional code fence.
///
/// An opening fence may carry an info string (```` ```json ````); a closing
/// fence is only removed from the very end.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        text = &rest[tag_len..];
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Decodes fenced or bare text into a JSON object.
///
/// Arrays and scalars are rejected the same way as malformed JSON.
pub(crate) fn decode_object(raw: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(strip_fences(raw)) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {}", json_kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Truncates toward zero and clamps into `0..=100`.
pub fn clamp_score(value: f64) -> u8 {
    if !value.is_finite() {
        return DEFAULT_SCORE;
    }
    value.trunc().clamp(0.0, f64::from(MAX_SCORE)) as u8
}

/// Reads a numeric score field. `None` when absent or not a JSON number.
pub(crate) fn numeric_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

/// Reads a non-blank string field, returning it unmodified.
pub(crate) fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Normalizes raw engine text into a report.
pub fn normalize(raw: &str) -> Normalized {
    let map = match decode_object(raw) {
        Ok(map) => map,
        Err(reason) => {
            return Normalized::Fallback {
                report: AnalysisReport::fallback(),
                reason,
            }
        }
    };

    let mut repaired = Vec::new();
    let mut feedback = |dimension: Dimension| match text_field(&map, dimension.field_name()) {
        Some(text) => text,
        None => {
            repaired.push(dimension.field_name());
            dimension.unavailable_placeholder()
        }
    };

    let grammar_feedback = feedback(Dimension::Grammar);
    let structure_feedback = feedback(Dimension::Structure);
    let content_feedback = feedback(Dimension::Content);
    let spelling_feedback = feedback(Dimension::Spelling);

    let overall_score = match numeric_field(&map, "overallScore") {
        Some(score) => {
            let clamped = clamp_score(score);
            if f64::from(clamped) != score.trunc() {
                repaired.push("overallScore");
            }
            clamped
        }
        None => {
            repaired.push("overallScore");
            DEFAULT_SCORE
        }
    };

    Normalized::Parsed {
        report: AnalysisReport {
            grammar_feedback,
            structure_feedback,
            content_feedback,
            spelling_feedback,
            overall_score,
            session_id: None,
        },
        repaired,
    }
}

/// Consumes the coordinator's output and returns the validated report,
/// logging repairs and fallbacks.
pub fn normalize_output(raw: RawAnalysisOutput) -> AnalysisReport {
    match normalize(raw.as_str()) {
        Normalized::Parsed { report, repaired } => {
            if !repaired.is_empty() {
                debug!("Repaired fields in engine output: {}", repaired.join(", "));
            }
            report
        }
        Normalized::Fallback { report, reason } => {
            warn!("Failed to parse analysis response: {}", reason);
            report
        }
    }
}
