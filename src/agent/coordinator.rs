//! The coordinator: consults the analyzer roles, then asks the engine for
//! one consolidated JSON assessment.

use crate::agent::prompts::COORDINATOR_PROMPT;
use crate::agent::roles::{AnalyzerRole, RoleKind, RoleNotes};
use crate::engine::AnalysisEngine;
use crate::error::EngineError;
use crate::models::RawAnalysisOutput;
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Evaluate the roles concurrently instead of one after another.
    pub parallel_roles: bool,
    /// Upper bound on one full analysis (all roles plus synthesis).
    pub timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            parallel_roles: true,
            timeout: Duration::from_secs(300),
        }
    }
}

impl From<&crate::config::ModelConfig> for CoordinatorConfig {
    fn from(config: &crate::config::ModelConfig) -> Self {
        Self {
            parallel_roles: config.parallel_roles,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// Orchestrates the grammar, structure and content roles.
///
/// Role failures are not retried; the first error aborts the analysis.
pub struct Coordinator {
    engine: Arc<dyn AnalysisEngine>,
    roles: Vec<AnalyzerRole>,
    config: CoordinatorConfig,
}

impl Coordinator {
    pub fn new(engine: Arc<dyn AnalysisEngine>, config: CoordinatorConfig) -> Self {
        let roles = RoleKind::ALL
            .into_iter()
            .map(|kind| AnalyzerRole::new(kind, Arc::clone(&engine)))
            .collect();

        Self {
            engine,
            roles,
            config,
        }
    }

    pub fn roles(&self) -> &[AnalyzerRole] {
        &self.roles
    }

    pub fn model_name(&self) -> &str {
        self.engine.model_name()
    }

    /// Runs the full analysis, bounded by the configured timeout.
    pub async fn run(&self, essay_text: &str) -> Result<RawAnalysisOutput, EngineError> {
        let timeout = self.config.timeout;
        tokio::time::timeout(timeout, self.run_unbounded(essay_text))
            .await
            .map_err(|_| EngineError::Timeout(timeout.as_secs()))?
    }

    async fn run_unbounded(&self, essay_text: &str) -> Result<RawAnalysisOutput, EngineError> {
        let notes = self.gather_notes(essay_text).await?;
        info!("Collected notes from {} analyzer roles", notes.len());

        let message = synthesis_message(essay_text, &notes);
        let raw = self.engine.invoke(COORDINATOR_PROMPT, &message).await?;
        debug!("Coordinator returned {} chars", raw.len());

        Ok(RawAnalysisOutput::new(raw))
    }

    async fn gather_notes(&self, essay_text: &str) -> Result<Vec<RoleNotes>, EngineError> {
        if self.config.parallel_roles {
            try_join_all(self.roles.iter().map(|role| role.evaluate(essay_text))).await
        } else {
            let mut notes = Vec::with_capacity(self.roles.len());
            for role in &self.roles {
                notes.push(role.evaluate(essay_text).await?);
            }
            Ok(notes)
        }
    }
}

/// Builds the coordinator's user message: the essay followed by each role's
/// notes under its own heading.
fn synthesis_message(essay_text: &str, notes: &[RoleNotes]) -> String {
    let mut message = String::new();
    message.push_str("Please analyze this essay:\n\n");
    message.push_str(essay_text);
    message.push_str("\n\n=== SPECIALIST NOTES ===\n\n");

    for note in notes {
        message.push_str(&format!("### {}\n{}\n\n", note.kind.heading(), note.notes.trim()));
    }

    message.push_str("=== END OF NOTES ===\n\n");
    message.push_str("Now respond with the JSON assessment only.");
    message
}
