// Integration tests for the HTTP control API
//
// Requests go straight through the router with `oneshot`, so no socket is
// bound. The session behind it uses the shared in-memory collaborators.

mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{fixed_session, generated_session, MockCaptureDevice, MockService};
use mock_interview::{create_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Result<(StatusCode, Vec<u8>)> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body)?).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, bytes.to_vec()))
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
    let (status, bytes) = send(app, method, uri, body).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

fn fixed_app(questions: usize, coding: bool) -> (Router, AppState, Arc<MockService>, Arc<MockCaptureDevice>) {
    let scores = vec![80.0; questions];
    let h = fixed_session(questions, &scores, coding);
    let state = AppState::new(h.session);
    (create_router(state.clone()), state, h.service, h.device)
}

async fn answer(app: &Router) -> Result<()> {
    let (status, _) = send(app, "POST", "/session/recording/start", None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(app, "POST", "/session/recording/stop", None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let (app, ..) = fixed_app(1, false);

    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK".to_vec());

    Ok(())
}

#[tokio::test]
async fn test_snapshot_before_setup() -> Result<()> {
    let (app, ..) = fixed_app(3, true);

    let (status, snapshot) = send_json(&app, "GET", "/session", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["stage"], "setup");
    assert_eq!(snapshot["requires_setup"], false);
    assert_eq!(snapshot["coding_stage"], true);
    assert_eq!(snapshot["progress"], Value::Null);
    assert_eq!(snapshot["recording"]["state"], "idle");
    assert_eq!(snapshot["recording"]["elapsed"], "0:00");

    Ok(())
}

#[tokio::test]
async fn test_full_flow_without_coding() -> Result<()> {
    let (app, ..) = fixed_app(2, false);

    let (status, snapshot) = send_json(&app, "POST", "/session/setup", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["stage"], "questioning");
    assert_eq!(snapshot["progress"], json!({ "current": 1, "total": 2, "percent": 50 }));
    assert_eq!(snapshot["current_question"]["id"], "q1");
    assert_eq!(snapshot["current_question"]["type"], "behavioral");

    answer(&app).await?;
    let (status, snapshot) = send_json(&app, "POST", "/session/next", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["is_last_question"], true);

    answer(&app).await?;
    let (status, snapshot) = send_json(&app, "POST", "/session/submit", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["stage"], "results");

    let (status, results) = send_json(&app, "GET", "/session/results", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results["average_score"], 80.0);
    assert_eq!(results["band"], "strong");
    assert_eq!(results["item_count"], 2);
    assert_eq!(results["coding"], Value::Null);

    let (status, snapshot) = send_json(&app, "POST", "/session/restart", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["stage"], "setup");
    assert_eq!(snapshot["answered_count"], 0);

    Ok(())
}

#[tokio::test]
async fn test_next_without_answer_returns_toast() -> Result<()> {
    let (app, ..) = fixed_app(2, false);
    send(&app, "POST", "/session/setup", None).await?;

    let (status, error) = send_json(&app, "POST", "/session/next", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "missing_response");
    assert_eq!(error["title"], "No recording found");
    assert_eq!(error["description"], "Please record your answer before proceeding.");

    Ok(())
}

#[tokio::test]
async fn test_wrong_stage_is_conflict() -> Result<()> {
    let (app, ..) = fixed_app(2, false);

    let (status, error) = send_json(&app, "POST", "/session/submit", None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"], "invalid_stage");

    let (status, _) = send(&app, "GET", "/session/results", None).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn test_response_audio_playback() -> Result<()> {
    let (app, ..) = fixed_app(2, false);
    send(&app, "POST", "/session/setup", None).await?;

    let (status, _) = send(&app, "GET", "/session/responses/q1/audio", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    answer(&app).await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session/responses/q1/audio")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(bytes.to_vec(), b"capture-1".to_vec());

    Ok(())
}

#[tokio::test]
async fn test_generated_setup_over_http() -> Result<()> {
    let h = generated_session(2, &[90.0, 70.0], true);
    let service = h.service.clone();
    let app = create_router(AppState::new(h.session));

    let (status, error) = send_json(
        &app,
        "POST",
        "/session/setup",
        Some(json!({
            "job_description": "Platform engineer",
            "cv": { "file_name": "cv.docx", "content_type": "application/msword", "data": STANDARD.encode(b"doc") }
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["title"], "Invalid file type");

    let (status, snapshot) = send_json(
        &app,
        "POST",
        "/session/setup",
        Some(json!({
            "job_description": "Platform engineer",
            "cv": {
                "file_name": "cv.pdf",
                "content_type": "application/pdf",
                "data": format!("data:application/pdf;base64,{}", STANDARD.encode(b"%PDF-1.4"))
            }
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["stage"], "questioning");
    assert_eq!(service.generate_calls.load(std::sync::atomic::Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn test_coding_stage_over_http() -> Result<()> {
    let (app, _state, service, _device) = fixed_app(1, true);
    send(&app, "POST", "/session/setup", None).await?;
    answer(&app).await?;

    let (status, snapshot) = send_json(&app, "POST", "/session/submit", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["stage"], "coding");

    MockService::set(&service.fail_fetch, true);
    let (status, error) = send_json(&app, "GET", "/session/coding/prompt", None).await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error["error"], "fetch_failed");

    MockService::set(&service.fail_fetch, false);
    let (status, prompt) = send_json(&app, "POST", "/session/coding/prompt/refetch", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prompt["prompt"], service.prompt.as_str());

    let (status, error) = send_json(
        &app,
        "POST",
        "/session/coding/submit",
        Some(json!({ "code": "   " })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "empty_code");

    let (status, snapshot) = send_json(
        &app,
        "POST",
        "/session/coding/submit",
        Some(json!({ "code": "fn main() {}" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["results"]["average_score"], 75.0);
    assert_eq!(snapshot["results"]["coding"]["score"], 70.0);

    Ok(())
}

#[tokio::test]
async fn test_coding_stage_toggle_only_in_setup() -> Result<()> {
    let (app, ..) = fixed_app(1, true);

    let (status, snapshot) = send_json(
        &app,
        "POST",
        "/session/coding-stage",
        Some(json!({ "enabled": false })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["coding_stage"], false);

    send(&app, "POST", "/session/setup", None).await?;
    let (status, _) = send(
        &app,
        "POST",
        "/session/coding-stage",
        Some(json!({ "enabled": true })),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn test_device_failure_is_service_unavailable() -> Result<()> {
    let (app, _state, _service, device) = fixed_app(1, false);
    send(&app, "POST", "/session/setup", None).await?;

    MockService::set(&device.fail_acquire, true);
    let (status, error) = send_json(&app, "POST", "/session/recording/start", None).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error["error"], "device_unavailable");

    Ok(())
}

#[tokio::test]
async fn test_concurrent_call_is_busy() -> Result<()> {
    let (app, state, ..) = fixed_app(1, false);

    let _guard = state.session.lock().await;
    let (status, error) = send_json(&app, "POST", "/session/setup", None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"], "busy");

    Ok(())
}

#[tokio::test]
async fn test_snapshot_waits_for_in_flight_call() -> Result<()> {
    let (app, state, ..) = fixed_app(1, false);

    let guard = state.session.lock().await;
    let pending = tokio::spawn({
        let app = app.clone();
        async move { send_json(&app, "GET", "/session", None).await }
    });

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!pending.is_finished(), "Read should wait instead of failing");

    drop(guard);
    let (status, snapshot) = pending.await??;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["stage"], "setup");

    Ok(())
}
