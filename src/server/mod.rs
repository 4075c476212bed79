//! HTTP API.
//!
//! Routes:
//! - `POST /analyze` - coordinator report
//! - `POST /analyze/pillars` - engine-scored pillar report
//! - `POST /analyze/heuristic` - statistics-only pillar report
//! - `POST /analyze/simple` - statistics-only base report
//! - `GET /health`, `GET /`

pub mod error;
pub mod handlers;

use crate::error::AnalysisError;
use crate::service::EssayService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers.
///
/// The service slot is filled once, after startup initialization succeeds;
/// until then analysis routes answer 503.
#[derive(Clone)]
pub struct AppState {
    service: Arc<OnceCell<EssayService>>,
    max_essay_chars: usize,
}

impl AppState {
    /// State with no analyzer installed yet.
    pub fn uninitialized(max_essay_chars: usize) -> Self {
        Self {
            service: Arc::new(OnceCell::new()),
            max_essay_chars,
        }
    }

    /// State with the analyzer already installed.
    pub fn ready(service: EssayService) -> Self {
        let max_essay_chars = service.max_essay_chars();
        Self {
            service: Arc::new(OnceCell::new_with(Some(service))),
            max_essay_chars,
        }
    }

    /// Installs the analyzer. Fails if one is already installed.
    pub fn install(&self, service: EssayService) -> anyhow::Result<()> {
        self.service
            .set(service)
            .map_err(|_| anyhow::anyhow!("essay analyzer is already initialized"))
    }

    pub fn service(&self) -> Result<&EssayService, AnalysisError> {
        self.service.get().ok_or(AnalysisError::NotInitialized)
    }

    pub fn is_ready(&self) -> bool {
        self.service.initialized()
    }

    pub fn max_essay_chars(&self) -> usize {
        self.max_essay_chars
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/analyze", post(handlers::analyze))
        .route("/analyze/pillars", post(handlers::analyze_pillars))
        .route("/analyze/heuristic", post(handlers::analyze_heuristic_text))
        .route("/analyze/simple", post(handlers::analyze_simple_text))
        .with_state(state)
}
