//! Error types for essay analysis.

use thiserror::Error;

/// Failure of a single call to the reasoning engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to Ollama at {0}. Is Ollama running?")]
    Connect(String),

    #[error("Ollama API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to send request: {0}")]
    Transport(String),

    #[error("invalid engine response: {0}")]
    InvalidResponse(String),

    #[error("model '{model}' is not installed (available: {available})")]
    ModelUnavailable { model: String, available: String },
}

/// Errors surfaced by the analysis service.
///
/// Unparseable engine output is not an error; it resolves to a fallback
/// report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The essay text was rejected before any engine call.
    #[error("{0}")]
    Validation(String),

    /// The analysis service has not finished starting up.
    #[error("essay analyzer is not initialized")]
    NotInitialized,

    /// The reasoning engine call itself failed.
    #[error("Analysis failed: {0}")]
    Engine(#[from] EngineError),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
