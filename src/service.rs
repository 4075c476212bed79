//! The request envelope around one analysis.
//!
//! [`EssayService`] is built once at startup and shared by every request:
//! it validates input, opens a session, runs the coordinator, normalizes
//! the result and stamps the session id onto the report.

use crate::agent::{Coordinator, CoordinatorConfig, PillarAnalyzer};
use crate::analysis::normalizer::normalize_output;
use crate::config::Config;
use crate::engine::{AnalysisEngine, EngineConfig, OllamaEngine};
use crate::error::{AnalysisError, AnalysisResult, EngineError};
use crate::models::{AnalysisReport, AnalysisReportExtended, AnalysisSession, EssayInput};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Rejects essays that are blank or longer than `max_chars` characters.
pub fn validate_text(text: &str, max_chars: usize) -> AnalysisResult<()> {
    if text.trim().is_empty() {
        return Err(AnalysisError::Validation(
            "Essay text cannot be empty".to_string(),
        ));
    }

    let chars = text.chars().count();
    if chars > max_chars {
        return Err(AnalysisError::Validation(format!(
            "Essay text is too long ({} characters, maximum {})",
            chars, max_chars
        )));
    }

    Ok(())
}

/// Long-lived analysis service.
pub struct EssayService {
    coordinator: Coordinator,
    pillars: PillarAnalyzer,
    max_essay_chars: usize,
}

impl EssayService {
    pub fn new(
        engine: Arc<dyn AnalysisEngine>,
        coordinator_config: CoordinatorConfig,
        max_essay_chars: usize,
    ) -> Self {
        let pillars = PillarAnalyzer::new(Arc::clone(&engine), coordinator_config.timeout);
        Self {
            coordinator: Coordinator::new(engine, coordinator_config),
            pillars,
            max_essay_chars,
        }
    }

    /// Builds the Ollama-backed service, optionally verifying that the
    /// configured model is installed.
    pub async fn from_config(config: &Config) -> Result<Self, EngineError> {
        let engine = OllamaEngine::new(EngineConfig::from(&config.model))?;

        if config.model.verify_on_startup {
            engine.check_available().await?;
            info!("Model {} is available", config.model.name);
        }

        Ok(Self::new(
            Arc::new(engine),
            CoordinatorConfig::from(&config.model),
            config.limits.max_essay_chars,
        ))
    }

    pub fn model_name(&self) -> &str {
        self.coordinator.model_name()
    }

    pub fn max_essay_chars(&self) -> usize {
        self.max_essay_chars
    }

    /// Analyzes one essay.
    ///
    /// Validation happens before any engine call. Unparseable engine output
    /// still yields a report; only engine failures are errors.
    pub async fn analyze(&self, input: EssayInput) -> AnalysisResult<AnalysisReport> {
        validate_text(&input.text, self.max_essay_chars)?;

        let session = AnalysisSession::open(&input);
        info!(
            session_id = %session.session_id,
            requester_id = %session.requester_id,
            "Created analysis session"
        );

        let raw = self.coordinator.run(&input.text).await?;
        let report = normalize_output(raw).with_session(&session);

        let elapsed = chrono::Utc::now() - session.started_at;
        info!(
            session_id = %session.session_id,
            overall_score = report.overall_score,
            elapsed_ms = elapsed.num_milliseconds(),
            "Analysis completed"
        );

        Ok(report)
    }

    /// Scores one essay on the four pillars through the engine.
    pub async fn analyze_pillars(&self, text: &str) -> AnalysisResult<AnalysisReportExtended> {
        validate_text(text, self.max_essay_chars)?;
        debug!("Running pillar analysis on {} chars", text.len());
        Ok(self.pillars.analyze(text).await?)
    }
}

impl std::fmt::Debug for EssayService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EssayService")
            .field("model", &self.model_name())
            .field("max_essay_chars", &self.max_essay_chars)
            .finish()
    }
}

/// Convenience for tests and embedders: a service with default settings and
/// the given timeout.
pub fn service_with_engine(engine: Arc<dyn AnalysisEngine>, timeout: Duration) -> EssayService {
    EssayService::new(
        engine,
        CoordinatorConfig {
            timeout,
            ..CoordinatorConfig::default()
        },
        crate::config::LimitsConfig::default().max_essay_chars,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::test_support::ScriptedEngine;
    use tokio_test::{assert_err, assert_ok};
    use uuid::Uuid;

    const REPLY: &str = r#"```json
{"grammarFeedback":"Fix comma splices.","structureFeedback":"Good flow.","contentFeedback":"Needs evidence.","spellingFeedback":"No typos.","overallScore":81}
```"#;

    fn service(engine: Arc<ScriptedEngine>) -> EssayService {
        service_with_engine(engine, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_blank_text_rejected_before_engine() {
        let engine = Arc::new(ScriptedEngine::replying(REPLY));
        let service = service(engine.clone());

        for text in ["", "   ", "\n\t "] {
            let err = service.analyze(EssayInput::new(text)).await.unwrap_err();
            assert!(matches!(err, AnalysisError::Validation(_)));

            let err = service.analyze_pillars(text).await.unwrap_err();
            assert!(matches!(err, AnalysisError::Validation(_)));
        }
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_overlong_text_rejected_before_engine() {
        let engine = Arc::new(ScriptedEngine::replying(REPLY));
        let service = EssayService::new(engine.clone(), CoordinatorConfig::default(), 10);

        let err = service
            .analyze(EssayInput::new("This essay is far too long."))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("too long"));
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_normalizes_and_stamps_session() {
        let engine = Arc::new(ScriptedEngine::replying(REPLY));
        let service = service(engine.clone());

        let report = assert_ok!(service.analyze(EssayInput::new("A real essay.")).await);
        assert_eq!(report.grammar_feedback, "Fix comma splices.");
        assert_eq!(report.overall_score, 81);

        let session_id = report.session_id.expect("session id attached");
        assert!(Uuid::parse_str(&session_id).is_ok());
        assert_eq!(engine.call_count(), 4);
    }

    #[tokio::test]
    async fn test_sessions_are_unique() {
        let engine = Arc::new(ScriptedEngine::replying(REPLY));
        let service = service(engine);

        let a = service.analyze(EssayInput::new("Essay one.")).await.unwrap();
        let b = service.analyze(EssayInput::new("Essay two.")).await.unwrap();
        assert_ne!(a.session_id, b.session_id);
    }

    #[tokio::test]
    async fn test_unparseable_output_is_not_an_error() {
        let engine = Arc::new(ScriptedEngine::replying("I think this essay is great!"));
        let service = service(engine);

        let report = assert_ok!(service.analyze(EssayInput::new("Essay.")).await);
        assert_eq!(report.overall_score, 50);
        assert_eq!(
            report.content_feedback,
            "Unable to parse detailed content feedback from analysis."
        );
        assert!(report.session_id.is_some());
    }

    #[tokio::test]
    async fn test_engine_failure_surfaces() {
        let engine = Arc::new(ScriptedEngine::failing());
        let service = service(engine);

        let err = assert_err!(service.analyze(EssayInput::new("Essay.")).await);
        assert!(matches!(err, AnalysisError::Engine(EngineError::Api { .. })));
        assert!(err.to_string().starts_with("Analysis failed:"));
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("ok", 2).is_ok());
        assert!(validate_text("abc", 2).is_err());
        // Limits count characters, not bytes.
        assert!(validate_text("éé", 2).is_ok());
    }
}
