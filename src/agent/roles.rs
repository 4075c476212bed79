//! The three analyzer roles consulted by the coordinator.

use crate::agent::prompts::{CONTENT_ROLE_PROMPT, GRAMMAR_ROLE_PROMPT, STRUCTURE_ROLE_PROMPT};
use crate::engine::AnalysisEngine;
use crate::error::EngineError;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The fixed set of analyzer roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    Grammar,
    Structure,
    Content,
}

impl RoleKind {
    pub const ALL: [RoleKind; 3] = [RoleKind::Grammar, RoleKind::Structure, RoleKind::Content];

    pub fn instructions(&self) -> &'static str {
        match self {
            RoleKind::Grammar => GRAMMAR_ROLE_PROMPT,
            RoleKind::Structure => STRUCTURE_ROLE_PROMPT,
            RoleKind::Content => CONTENT_ROLE_PROMPT,
        }
    }

    /// Heading under which the coordinator receives this role's notes.
    pub fn heading(&self) -> &'static str {
        match self {
            RoleKind::Grammar => "Grammar & Language Mechanics",
            RoleKind::Structure => "Structure & Organization",
            RoleKind::Content => "Content & Argumentation",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleKind::Grammar => write!(f, "grammar"),
            RoleKind::Structure => write!(f, "structure"),
            RoleKind::Content => write!(f, "content"),
        }
    }
}

/// Notes produced by one role for one essay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleNotes {
    pub kind: RoleKind,
    pub notes: String,
}

/// A stateless analyzer: one role bound to the shared engine.
#[derive(Clone)]
pub struct AnalyzerRole {
    kind: RoleKind,
    engine: Arc<dyn AnalysisEngine>,
}

impl AnalyzerRole {
    pub fn new(kind: RoleKind, engine: Arc<dyn AnalysisEngine>) -> Self {
        Self { kind, engine }
    }

    pub fn kind(&self) -> RoleKind {
        self.kind
    }

    /// Asks the engine for this role's feedback on `essay_text`.
    pub async fn evaluate(&self, essay_text: &str) -> Result<RoleNotes, EngineError> {
        debug!("Running {} analyzer", self.kind);
        let notes = self
            .engine
            .invoke(self.kind.instructions(), essay_text)
            .await?;
        debug!("{} analyzer returned {} chars", self.kind, notes.len());

        Ok(RoleNotes {
            kind: self.kind,
            notes,
        })
    }
}
