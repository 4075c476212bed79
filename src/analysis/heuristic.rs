//! Heuristic scoring from text statistics.
//!
//! Two engine-free profiles live here. The heuristic profile produces an
//! [`AnalysisReportExtended`]; only structure and content are measured,
//! language and grammar carry fixed scores. The simple profile produces a
//! plain [`AnalysisReport`] scored from length, paragraphing and sentence
//! count.

use crate::models::{AnalysisReport, AnalysisReportExtended, Pillar, PillarKind, MAX_SCORE};

const LANGUAGE_SCORE: f64 = 70.0;
const GRAMMAR_SCORE: f64 = 75.0;

/// Starting score of the simple profile before bonuses.
const SIMPLE_BASE_SCORE: u8 = 50;

/// Characters of raw engine output quoted in a fallback report.
const RAW_EXCERPT_CHARS: usize = 200;

/// Measurable statistics of an essay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub word_count: usize,
    /// Every `.`, `!` and `?` counts, including repeats like `?!`.
    pub sentence_count: usize,
    pub paragraph_count: usize,
}

impl TextStats {
    pub fn measure(text: &str) -> Self {
        Self {
            word_count: text.split_whitespace().count(),
            sentence_count: text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count(),
            paragraph_count: count_paragraphs(text),
        }
    }

    pub fn structure_score(&self) -> f64 {
        (self.sentence_count as f64 * 10.0).clamp(40.0, 80.0)
    }

    pub fn content_score(&self) -> f64 {
        (self.word_count as f64 * 0.2).clamp(50.0, 85.0)
    }

    /// Per-pillar scores in [`PillarKind::ALL`] order.
    pub fn pillar_scores(&self) -> [f64; 4] {
        [
            self.structure_score(),
            self.content_score(),
            LANGUAGE_SCORE,
            GRAMMAR_SCORE,
        ]
    }

    /// Score of the simple profile: the base plus bonuses for length,
    /// paragraphing and sentence count, capped at 100.
    pub fn simple_score(&self) -> u8 {
        let length_bonus = match self.word_count {
            250.. => 15,
            150..=249 => 10,
            100..=149 => 5,
            _ => 0,
        };
        let paragraph_bonus = match self.paragraph_count {
            3.. => 10,
            2 => 5,
            _ => 0,
        };
        let sentence_bonus = if self.sentence_count >= 5 { 10 } else { 0 };

        (SIMPLE_BASE_SCORE + length_bonus + paragraph_bonus + sentence_bonus).min(MAX_SCORE)
    }

    /// Mean of the pillar scores as reported, i.e. after each is rounded.
    pub fn overall_score(&self) -> u8 {
        mean_score(&self.pillar_scores().map(f64::round))
    }
}

/// Paragraphs are runs of non-blank lines separated by blank lines.
fn count_paragraphs(text: &str) -> usize {
    let mut count = 0;
    let mut in_paragraph = false;

    for line in text.lines() {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            in_paragraph = true;
            count += 1;
        }
    }

    count
}

/// Rounded (half away from zero) mean, clamped into `0..=100`.
pub fn mean_score(scores: &[f64]) -> u8 {
    if scores.is_empty() {
        return 0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    mean.round().clamp(0.0, 100.0) as u8
}

fn pillar_feedback(kind: PillarKind) -> (&'static str, [&'static str; 2]) {
    match kind {
        PillarKind::Structure => (
            "Essay structure analysis based on sentence count and organization.",
            [
                "Consider adding clearer topic sentences",
                "Improve paragraph transitions",
            ],
        ),
        PillarKind::Content => (
            "Content evaluation based on depth and word count.",
            ["Expand on key ideas", "Provide more specific examples"],
        ),
        PillarKind::Language => (
            "Language use appears appropriate for the topic.",
            ["Vary sentence structure", "Use more precise vocabulary"],
        ),
        PillarKind::Grammar => (
            "Grammar appears generally correct.",
            ["Review punctuation usage", "Check for clarity"],
        ),
    }
}

/// Builds the heuristic pillar for `kind` at `score`.
pub fn heuristic_pillar(kind: PillarKind, score: f64) -> Pillar {
    let (feedback, suggestions) = pillar_feedback(kind);
    Pillar {
        name: kind.name().to_string(),
        score: score.round().clamp(0.0, 100.0) as u8,
        feedback: feedback.to_string(),
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
    }
}

/// Scores `text` from its statistics alone.
pub fn analyze_heuristic(text: &str) -> AnalysisReportExtended {
    build_report(text, None)
}

/// Heuristic report used when the engine answered but its pillar output was
/// unusable; quotes the start of the raw response.
pub fn heuristic_fallback(text: &str, raw_response: &str) -> AnalysisReportExtended {
    build_report(text, Some(raw_response))
}

fn build_report(text: &str, raw_response: Option<&str>) -> AnalysisReportExtended {
    let stats = TextStats::measure(text);

    let pillars = PillarKind::ALL
        .into_iter()
        .zip(stats.pillar_scores())
        .map(|(kind, score)| heuristic_pillar(kind, score))
        .collect();

    let mut detailed_feedback = format!(
        "Analysis completed with basic metrics. Word count: {}, Sentence count: {}, Paragraph count: {}.",
        stats.word_count, stats.sentence_count, stats.paragraph_count
    );
    if let Some(raw) = raw_response {
        let excerpt: String = raw.chars().take(RAW_EXCERPT_CHARS).collect();
        detailed_feedback.push_str(&format!(" Raw engine response: {}...", excerpt));
    }

    AnalysisReportExtended {
        overall_score: stats.overall_score(),
        pillars,
        strengths: vec![
            "Clear topic focus".to_string(),
            "Appropriate length".to_string(),
        ],
        areas_for_improvement: vec![
            "Structure enhancement".to_string(),
            "Detail development".to_string(),
        ],
        detailed_feedback,
    }
}

/// Scores `text` into the base report shape from its statistics alone.
///
/// Feedback is generic writing advice that quotes the measured counts.
pub fn analyze_simple(text: &str) -> AnalysisReport {
    let stats = TextStats::measure(text);

    AnalysisReport {
        grammar_feedback: format!(
            "Your essay has {} sentences. Consider varying sentence length and structure for better flow. Check for proper punctuation and grammar throughout.",
            stats.sentence_count
        ),
        structure_feedback: format!(
            "Your essay has {} paragraphs and {} words. Ensure you have a clear introduction, body paragraphs with supporting details, and a strong conclusion.",
            stats.paragraph_count, stats.word_count
        ),
        content_feedback: "Your essay demonstrates engagement with the topic. Consider adding more specific examples and evidence to support your arguments. Develop your ideas more thoroughly.".to_string(),
        spelling_feedback: "Please review your essay for any spelling errors or typos. Consider using a spell-checker to catch any mistakes.".to_string(),
        overall_score: stats.simple_score(),
        session_id: None,
    }
}
