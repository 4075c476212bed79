//! HTTP error mapping.

use crate::error::AnalysisError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid essay input (400)
    #[error("{0}")]
    Validation(String),

    /// Analyzer not ready yet (503)
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Engine invocation failed (500)
    #[error("{0}")]
    AnalysisFailed(String),
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Validation(msg) => ApiError::Validation(msg),
            AnalysisError::NotInitialized => ApiError::ServiceUnavailable(err.to_string()),
            AnalysisError::Engine(_) => ApiError::AnalysisFailed(err.to_string()),
        }
    }
}

/// Missing, mistyped or malformed request bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", msg)
            }
            ApiError::AnalysisFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "ANALYSIS_FAILED", msg)
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AnalysisError::Validation("empty".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (AnalysisError::NotInitialized, StatusCode::SERVICE_UNAVAILABLE),
            (
                AnalysisError::Engine(EngineError::Timeout(1)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn test_engine_failure_message_keeps_cause() {
        let err = ApiError::from(AnalysisError::Engine(EngineError::Connect(
            "http://localhost:11434".to_string(),
        )));
        let message = err.to_string();
        assert!(message.starts_with("Analysis failed:"));
        assert!(message.contains("http://localhost:11434"));
    }
}
