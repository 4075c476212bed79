//! In-memory engine double for unit tests.

use crate::agent::prompts::{COORDINATOR_PROMPT, PILLAR_PROMPT};
use crate::agent::roles::RoleKind;
use crate::engine::AnalysisEngine;
use crate::error::EngineError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Responder = Box<dyn Fn(&str, &str) -> Result<String, EngineError> + Send + Sync>;

/// Engine that answers from a closure and records every call.
pub(crate) struct ScriptedEngine {
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, String)>>,
    respond: Responder,
    delay: Option<Duration>,
}

impl ScriptedEngine {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&str, &str) -> Result<String, EngineError> + Send + Sync + 'static,
    {
        Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
            delay: None,
        }
    }

    /// Roles answer `notes from <role>`; coordinator and pillar prompts get
    /// `reply`.
    pub fn replying(reply: &str) -> Self {
        let reply = reply.to_string();
        Self::new(move |instructions, _| {
            if instructions == COORDINATOR_PROMPT || instructions == PILLAR_PROMPT {
                return Ok(reply.clone());
            }
            let role = RoleKind::ALL
                .into_iter()
                .find(|kind| kind.instructions() == instructions)
                .map(|kind| kind.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            Ok(format!("notes from {}", role))
        })
    }

    pub fn failing() -> Self {
        Self::new(|_, _| Err(EngineError::Api {
            status: 500,
            body: "model crashed".to_string(),
        }))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisEngine for ScriptedEngine {
    async fn invoke(&self, instructions: &str, essay_text: &str) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((instructions.to_string(), essay_text.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        (self.respond)(instructions, essay_text)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
