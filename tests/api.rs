//! Integration tests for the EssayLens HTTP API
//!
//! Drives the router in-process with a fake engine:
//! - Health and root endpoints
//! - Coordinator analysis, including malformed engine output
//! - Pillar, heuristic and simple profiles
//! - Error mapping (400 / 503 / 500), including unreadable bodies
//! - Concurrent requests sharing one analyzer

mod common;

use axum::http::{Method, StatusCode};
use common::{ready_app, send, send_raw, starting_app, FakeEngine};
use futures::future::join_all;
use serde_json::json;
use std::collections::HashSet;

const WELL_FORMED: &str = r#"{"grammarFeedback":"Mostly clean.","structureFeedback":"Clear thesis.","contentFeedback":"Good examples.","spellingFeedback":"Two typos.","overallScore":82}"#;

const ESSAY: &str = "Schools should start later. Teenagers need more sleep. \
                     Studies show better grades with later start times.";

#[tokio::test]
async fn test_health_answers_before_initialization() {
    let app = starting_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "essaylens");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_root_lists_health_path() {
    let app = starting_app();

    let (status, body) = send(&app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["health"], "/health");
}

#[tokio::test]
async fn test_analyze_before_initialization_is_unavailable() {
    let app = starting_app();

    let (status, body) = send(&app, Method::POST, "/analyze", Some(json!({ "text": ESSAY }))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_analyze_returns_report_with_session() {
    let engine = FakeEngine::replying(WELL_FORMED);
    let app = ready_app(engine.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        "/analyze",
        Some(json!({ "text": ESSAY, "user_id": "student-7" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grammarFeedback"], "Mostly clean.");
    assert_eq!(body["spellingFeedback"], "Two typos.");
    assert_eq!(body["overallScore"], 82);
    assert!(body["sessionId"].as_str().is_some_and(|id| !id.is_empty()));
    // Three roles plus the synthesis call.
    assert_eq!(engine.calls(), 4);
}

#[tokio::test]
async fn test_analyze_accepts_fenced_output() {
    let fenced = format!("```json\n{}\n```", WELL_FORMED);
    let app = ready_app(FakeEngine::replying(&fenced));

    let (status, body) = send(&app, Method::POST, "/analyze", Some(json!({ "text": ESSAY }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["structureFeedback"], "Clear thesis.");
    assert_eq!(body["overallScore"], 82);
}

#[tokio::test]
async fn test_analyze_unparseable_output_uses_fallback_report() {
    let app = ready_app(FakeEngine::replying("not json at all"));

    let (status, body) = send(&app, Method::POST, "/analyze", Some(json!({ "text": ESSAY }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallScore"], 50);
    assert_eq!(
        body["grammarFeedback"],
        "Unable to parse detailed grammar feedback from analysis."
    );
}

#[tokio::test]
async fn test_blank_text_rejected_without_engine_calls() {
    let engine = FakeEngine::replying(WELL_FORMED);
    let app = ready_app(engine.clone());

    for text in ["", "   "] {
        let (status, body) =
            send(&app, Method::POST, "/analyze", Some(json!({ "text": text }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Essay text cannot be empty");
    }
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_engine_failure_maps_to_500() {
    let app = ready_app(FakeEngine::failing(500));

    let (status, body) = send(&app, Method::POST, "/analyze", Some(json!({ "text": ESSAY }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "ANALYSIS_FAILED");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Analysis failed:"));
}

#[tokio::test]
async fn test_heuristic_endpoint_works_without_engine() {
    let app = starting_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/analyze/heuristic",
        Some(json!({ "text": ESSAY })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let pillars = body["pillars"].as_array().unwrap();
    assert_eq!(pillars.len(), 4);
    assert_eq!(pillars[2]["name"], "Language & Style");
    assert_eq!(pillars[2]["score"], 70);
    assert_eq!(pillars[3]["score"], 75);
    assert!(body["detailedFeedback"]
        .as_str()
        .unwrap()
        .contains("Sentence count: 3"));
}

#[tokio::test]
async fn test_heuristic_endpoint_validates_text() {
    let app = starting_app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/analyze/heuristic",
        Some(json!({ "text": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pillars_endpoint_scores_through_engine() {
    let reply = json!({
        "overallScore": 77,
        "pillars": [
            { "name": "Structure & Organization", "score": 80, "feedback": "Logical order.", "suggestions": ["Tighten the conclusion"] },
            { "name": "Content & Ideas", "score": 72, "feedback": "Solid claims.", "suggestions": [] },
            { "name": "Language & Style", "score": 78, "feedback": "Varied.", "suggestions": [] },
            { "name": "Grammar & Mechanics", "score": 79, "feedback": "Few slips.", "suggestions": [] }
        ],
        "strengths": ["Clear thesis"],
        "areasForImprovement": ["More evidence"],
        "detailedFeedback": "A persuasive short essay."
    })
    .to_string();
    let engine = FakeEngine::replying(&reply);
    let app = ready_app(engine.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        "/analyze/pillars",
        Some(json!({ "text": ESSAY })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallScore"], 77);
    assert_eq!(body["pillars"][0]["feedback"], "Logical order.");
    assert_eq!(body["strengths"][0], "Clear thesis");
    assert_eq!(engine.calls(), 1);
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let engine = FakeEngine::replying(WELL_FORMED);
    let app = ready_app(engine.clone());

    let cases = [
        (Some("application/json"), r#"{"text": "unterminated"#),
        (Some("application/json"), r#"{"user_id": "no text field"}"#),
        (Some("application/json"), r#"{"text": 42}"#),
        (None, r#"{"text": "no content type"}"#),
    ];

    for (content_type, body) in cases {
        let (status, json) = send_raw(&app, "/analyze", content_type, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body"));
    }
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_on_engine_free_routes() {
    let app = starting_app();

    for path in ["/analyze/heuristic", "/analyze/simple"] {
        let (status, json) = send_raw(&app, path, Some("application/json"), "not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_simple_endpoint_scores_from_counts() {
    let app = starting_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/analyze/simple",
        Some(json!({ "text": ESSAY })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 16 words, 3 sentences, 1 paragraph: no bonuses.
    assert_eq!(body["overallScore"], 50);
    assert!(body["grammarFeedback"]
        .as_str()
        .unwrap()
        .starts_with("Your essay has 3 sentences."));
    assert!(body.get("sessionId").is_none());

    let (status, _) = send(
        &app,
        Method::POST,
        "/analyze/simple",
        Some(json!({ "text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_analyzer() {
    let engine = FakeEngine::replying(WELL_FORMED);
    let app = ready_app(engine.clone());

    let requests = (0..8).map(|i| {
        let app = app.clone();
        async move {
            send(
                &app,
                Method::POST,
                "/analyze",
                Some(json!({ "text": ESSAY, "user_id": format!("student-{}", i) })),
            )
            .await
        }
    });
    let responses = join_all(requests).await;

    let mut session_ids = HashSet::new();
    for (status, body) in responses {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overallScore"], 82);
        session_ids.insert(body["sessionId"].as_str().unwrap().to_string());
    }
    assert_eq!(session_ids.len(), 8);
    assert_eq!(engine.calls(), 8 * 4);
}
