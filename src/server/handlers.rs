//! HTTP handlers.

use crate::analysis::{analyze_heuristic, analyze_simple};
use crate::error::AnalysisError;
use crate::models::{AnalysisReport, AnalysisReportExtended, EssayInput, HealthResponse};
use crate::server::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::service::validate_text;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

/// Body of `POST /analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Body of the pillar, heuristic and simple endpoints.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// POST /analyze
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisReport>> {
    let service = state.service()?;
    let Json(request) = payload?;
    let input = EssayInput::new(request.text).with_requester(request.user_id);

    let report = service.analyze(input).await.map_err(log_failure)?;
    Ok(Json(report))
}

/// POST /analyze/pillars
pub async fn analyze_pillars(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisReportExtended>> {
    let service = state.service()?;
    let Json(request) = payload?;
    let report = service
        .analyze_pillars(&request.text)
        .await
        .map_err(log_failure)?;
    Ok(Json(report))
}

/// POST /analyze/heuristic
///
/// Needs no engine, so it works before the analyzer is initialized.
pub async fn analyze_heuristic_text(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisReportExtended>> {
    let Json(request) = payload?;
    validate_text(&request.text, state.max_essay_chars())?;
    Ok(Json(analyze_heuristic(&request.text)))
}

/// POST /analyze/simple
///
/// Length-based base report; like the heuristic route it needs no engine.
pub async fn analyze_simple_text(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisReport>> {
    let Json(request) = payload?;
    validate_text(&request.text, state.max_essay_chars())?;
    Ok(Json(analyze_simple(&request.text)))
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "EssayLens essay analysis API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
    }))
}

fn log_failure(err: AnalysisError) -> ApiError {
    if let AnalysisError::Engine(ref cause) = err {
        error!("Error during essay analysis: {}", cause);
    }
    ApiError::from(err)
}
