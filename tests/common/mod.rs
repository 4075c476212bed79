//! Shared helpers for HTTP integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use essaylens::engine::AnalysisEngine;
use essaylens::service::service_with_engine;
use essaylens::{build_router, AppState, EngineError};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Engine that returns the same reply for every call.
pub struct FakeEngine {
    reply: Result<String, u16>,
    calls: AtomicUsize,
}

impl FakeEngine {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Every call fails with an HTTP error of `status`.
    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisEngine for FakeEngine {
    async fn invoke(&self, _instructions: &str, _essay_text: &str) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Ok(ref reply) => Ok(reply.clone()),
            Err(status) => Err(EngineError::Api {
                status,
                body: "engine exploded".to_string(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

/// Router with the analyzer installed and backed by `engine`.
pub fn ready_app(engine: Arc<FakeEngine>) -> axum::Router {
    let service = service_with_engine(engine, Duration::from_secs(5));
    build_router(AppState::ready(service))
}

/// Router whose analyzer has not finished initializing.
pub fn starting_app() -> axum::Router {
    build_router(AppState::uninitialized(50_000))
}

/// Sends one request and returns the status and decoded JSON body.
pub async fn send(
    app: &axum::Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    dispatch(app, request).await
}

/// Sends a `POST` with a raw body and an optional content type.
pub async fn send_raw(
    app: &axum::Router,
    path: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(Method::POST).uri(path);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    dispatch(app, request).await
}

async fn dispatch(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
