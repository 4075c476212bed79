//! The reasoning-engine capability consumed by the analyzers.
//!
//! Everything above this module only knows the [`AnalysisEngine`] trait:
//! given an instruction set and a piece of text, return text.

pub mod ollama;

use crate::error::EngineError;
use async_trait::async_trait;

pub use ollama::{EngineConfig, OllamaEngine};

/// A stateless "given instructions and text, return text" capability.
///
/// Implementations must be safe to call from many requests at once.
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    async fn invoke(&self, instructions: &str, essay_text: &str) -> Result<String, EngineError>;

    /// Human-readable name of the model behind this engine.
    fn model_name(&self) -> &str;
}
