//! Data models for the essay analyzer.
//!
//! This module contains the core data structures used throughout the
//! application: the essay input, the per-request session envelope, and the
//! two report shapes returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Requester id used when the caller does not identify itself.
pub const ANONYMOUS_REQUESTER: &str = "anonymous";

/// Score substituted whenever no usable score is available.
pub const DEFAULT_SCORE: u8 = 50;

/// Upper bound of every score in a report.
pub const MAX_SCORE: u8 = 100;

/// An essay submitted for analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssayInput {
    /// The essay body.
    pub text: String,
    /// Opaque identifier of the caller.
    #[serde(default = "default_requester", alias = "user_id")]
    pub requester_id: String,
}

fn default_requester() -> String {
    ANONYMOUS_REQUESTER.to_string()
}

impl EssayInput {
    /// Creates an input attributed to the anonymous requester.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            requester_id: default_requester(),
        }
    }

    /// Attributes the input to `requester_id`, keeping the anonymous sentinel
    /// when the id is blank.
    pub fn with_requester(mut self, requester_id: Option<String>) -> Self {
        if let Some(id) = requester_id.filter(|id| !id.trim().is_empty()) {
            self.requester_id = id;
        }
        self
    }

    /// Number of characters in the essay body.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Correlation envelope for a single analysis invocation.
///
/// Lives only for the duration of one request; nothing is persisted.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    pub session_id: Uuid,
    pub requester_id: String,
    pub started_at: DateTime<Utc>,
}

impl AnalysisSession {
    /// Opens a new session for `input`.
    pub fn open(input: &EssayInput) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            requester_id: input.requester_id.clone(),
            started_at: Utc::now(),
        }
    }
}

/// Raw text produced by the reasoning engine for one analysis.
///
/// May or may not be well-formed JSON and may be wrapped in code fences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnalysisOutput(String);

impl RawAnalysisOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// One of the four feedback dimensions of an [`AnalysisReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Grammar,
    Structure,
    Content,
    Spelling,
}

impl Dimension {
    /// All dimensions in report order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Grammar,
        Dimension::Structure,
        Dimension::Content,
        Dimension::Spelling,
    ];

    /// JSON key carrying this dimension's feedback.
    pub fn field_name(&self) -> &'static str {
        match self {
            Dimension::Grammar => "grammarFeedback",
            Dimension::Structure => "structureFeedback",
            Dimension::Content => "contentFeedback",
            Dimension::Spelling => "spellingFeedback",
        }
    }

    /// Lower-case label used in placeholder text.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Grammar => "grammar",
            Dimension::Structure => "structure",
            Dimension::Content => "content",
            Dimension::Spelling => "spelling",
        }
    }

    /// Placeholder used when the engine omitted this dimension.
    pub fn unavailable_placeholder(&self) -> String {
        format!("No {} feedback available", self.label())
    }

    /// Placeholder used when the engine output could not be parsed at all.
    pub fn unparsed_placeholder(&self) -> String {
        format!(
            "Unable to parse detailed {} feedback from analysis.",
            self.label()
        )
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Grammar => write!(f, "Grammar"),
            Dimension::Structure => write!(f, "Structure"),
            Dimension::Content => write!(f, "Content"),
            Dimension::Spelling => write!(f, "Spelling"),
        }
    }
}

/// The validated analysis report returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub grammar_feedback: String,
    pub structure_feedback: String,
    pub content_feedback: String,
    pub spelling_feedback: String,
    /// Overall score in `0..=100`.
    pub overall_score: u8,
    /// Set by the request envelope, never by the normalizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AnalysisReport {
    /// The fixed report used when engine output cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            grammar_feedback: Dimension::Grammar.unparsed_placeholder(),
            structure_feedback: Dimension::Structure.unparsed_placeholder(),
            content_feedback: Dimension::Content.unparsed_placeholder(),
            spelling_feedback: Dimension::Spelling.unparsed_placeholder(),
            overall_score: DEFAULT_SCORE,
            session_id: None,
        }
    }

    /// Feedback text for one dimension.
    pub fn feedback(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Grammar => &self.grammar_feedback,
            Dimension::Structure => &self.structure_feedback,
            Dimension::Content => &self.content_feedback,
            Dimension::Spelling => &self.spelling_feedback,
        }
    }

    /// Attaches the session id of the request that produced this report.
    pub fn with_session(mut self, session: &AnalysisSession) -> Self {
        self.session_id = Some(session.session_id.to_string());
        self
    }

    /// Qualitative band for the overall score.
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.overall_score)
    }
}

/// Qualitative scoring bands used in the coordinator rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoreBand {
    SubstantialProblems,
    BelowAverage,
    Adequate,
    Good,
    Strong,
    Exceptional,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => ScoreBand::Exceptional,
            80..=89 => ScoreBand::Strong,
            70..=79 => ScoreBand::Good,
            60..=69 => ScoreBand::Adequate,
            50..=59 => ScoreBand::BelowAverage,
            _ => ScoreBand::SubstantialProblems,
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBand::Exceptional => write!(f, "Exceptional"),
            ScoreBand::Strong => write!(f, "Strong"),
            ScoreBand::Good => write!(f, "Good"),
            ScoreBand::Adequate => write!(f, "Adequate"),
            ScoreBand::BelowAverage => write!(f, "Below average"),
            ScoreBand::SubstantialProblems => write!(f, "Substantial problems"),
        }
    }
}

/// The four named pillars of the extended report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PillarKind {
    Structure,
    Content,
    Language,
    Grammar,
}

impl PillarKind {
    /// All pillars in report order.
    pub const ALL: [PillarKind; 4] = [
        PillarKind::Structure,
        PillarKind::Content,
        PillarKind::Language,
        PillarKind::Grammar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PillarKind::Structure => "Structure & Organization",
            PillarKind::Content => "Content & Ideas",
            PillarKind::Language => "Language & Style",
            PillarKind::Grammar => "Grammar & Mechanics",
        }
    }

    /// Resolves a pillar from its display name, ignoring case and surrounding
    /// whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// One scored pillar of an [`AnalysisReportExtended`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pillar {
    pub name: String,
    pub score: u8,
    pub feedback: String,
    pub suggestions: Vec<String>,
}

/// The richer report produced by the pillar and heuristic profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReportExtended {
    pub overall_score: u8,
    pub pillars: Vec<Pillar>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub detailed_feedback: String,
}

impl AnalysisReportExtended {
    /// Looks up a pillar by kind.
    pub fn pillar(&self, kind: PillarKind) -> Option<&Pillar> {
        self.pillars.iter().find(|p| p.name == kind.name())
    }
}

/// Metadata about a CLI analysis run, rendered above the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Session id, when the profile opens a session.
    pub session_id: Option<String>,
    pub requester_id: String,
    pub analysis_date: DateTime<Utc>,
    /// Model name, or `None` for the heuristic profile.
    pub model_used: Option<String>,
    pub profile: String,
    pub word_count: usize,
    pub duration_seconds: f64,
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
