//! Ollama chat API client.
//!
//! Sends one non-streaming `/api/chat` request per invocation: the
//! instructions go in the system message, the text in the user message.

use crate::engine::AnalysisEngine;
use crate::error::EngineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the Ollama engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub ollama_url: String,
    pub model_name: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model_name: "llama3.2:latest".to_string(),
            temperature: 0.3,
            timeout_seconds: 300,
        }
    }
}

impl From<&crate::config::ModelConfig> for EngineConfig {
    fn from(config: &crate::config::ModelConfig) -> Self {
        Self {
            ollama_url: config.ollama_url.clone(),
            model_name: config.name.clone(),
            temperature: config.temperature,
            timeout_seconds: config.timeout_seconds,
        }
    }
}

/// Message in the chat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat API response.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

/// Ollama `/api/tags` response.
#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

/// [`AnalysisEngine`] backed by a local or remote Ollama server.
///
/// The inner `reqwest::Client` pools connections and is shared by every
/// request that goes through this engine.
pub struct OllamaEngine {
    config: EngineConfig,
    http_client: reqwest::Client,
}

impl OllamaEngine {
    /// Builds the engine and its HTTP client.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        info!(
            "Initializing Ollama engine with model {} at {}",
            config.model_name, config.ollama_url
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| EngineError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Checks that the server is reachable and the configured model is installed.
    pub async fn check_available(&self) -> Result<(), EngineError> {
        let url = format!("{}/api/tags", self.config.ollama_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Api { status, body });
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        let names: Vec<&str> = tags.models.iter().map(|m| m.name.as_str()).collect();
        if !model_listed(&names, &self.config.model_name) {
            return Err(EngineError::ModelUnavailable {
                model: self.config.model_name.clone(),
                available: names.join(", "),
            });
        }

        debug!("Model {} is available", self.config.model_name);
        Ok(())
    }

    fn classify(&self, e: reqwest::Error) -> EngineError {
        if e.is_timeout() {
            EngineError::Timeout(self.config.timeout_seconds)
        } else if e.is_connect() {
            EngineError::Connect(self.config.ollama_url.clone())
        } else {
            EngineError::Transport(e.to_string())
        }
    }
}

/// Ollama lists `name:tag`; a configured name without a tag means `:latest`.
fn model_listed(names: &[&str], wanted: &str) -> bool {
    let wanted_full = if wanted.contains(':') {
        wanted.to_string()
    } else {
        format!("{}:latest", wanted)
    };
    names.iter().any(|n| *n == wanted || *n == wanted_full)
}

#[async_trait]
impl AnalysisEngine for OllamaEngine {
    async fn invoke(&self, instructions: &str, essay_text: &str) -> Result<String, EngineError> {
        let url = format!("{}/api/chat", self.config.ollama_url.trim_end_matches('/'));

        let request = OllamaChatRequest {
            model: &self.config.model_name,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: instructions.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: essay_text.to_string(),
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        debug!(
            "Sending chat request ({} chars of instructions, {} chars of text)",
            instructions.len(),
            essay_text.len()
        );

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Api { status, body });
        }

        let chat_response: OllamaChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::Timeout(self.config.timeout_seconds)
            } else {
                EngineError::InvalidResponse(format!("failed to parse Ollama response: {}", e))
            }
        })?;

        Ok(chat_response.message.content)
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}
