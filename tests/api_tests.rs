// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP adapter tests: events posted by the front end reach the controller
//! and rendering commands come back through the view queue.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use mapty_tracker::db::KeyValueStore;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_raw(app, method, uri, body.map(|b| b.to_string())).await
}

async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (app, _state, _storage) = common::create_test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_click_submit_and_list() {
    let (app, _state, storage) = common::create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/map/click",
        Some(json!({"lat": 40.7, "lng": -74.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "awaiting_submission");
    assert_eq!(body["location"]["lat"], 40.7);

    let (status, body) = send(
        &app,
        "POST",
        "/api/form/submit",
        Some(json!({"kind": "running", "distance": "5", "duration": "25", "metric": "180"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["metrics"]["kind"], "run");
    assert_eq!(body["metrics"]["pace_min_per_km"], 5.0);

    let (status, body) = send(&app, "GET", "/api/workouts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    assert!(storage.get("workouts").unwrap().is_some());

    let (_, commands) = send(&app, "GET", "/api/view/commands", None).await;
    let types: Vec<&str> = commands
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["type"].as_str())
        .collect();
    assert_eq!(
        types,
        vec![
            "show_form",
            "focus_distance_field",
            "render_list_entry",
            "clear_form",
            "hide_form"
        ]
    );

    // Drained commands are not returned twice
    let (_, commands) = send(&app, "GET", "/api/view/commands", None).await;
    assert_eq!(commands, json!([]));
}

#[tokio::test]
async fn test_invalid_submission_is_unprocessable() {
    let (app, state, _storage) = common::create_test_app();
    send(
        &app,
        "POST",
        "/api/map/click",
        Some(json!({"lat": 40.7, "lng": -74.0})),
    )
    .await;
    state.view_queue.drain();

    let (status, body) = send(
        &app,
        "POST",
        "/api/form/submit",
        Some(json!({"kind": "run", "distance": "-1", "duration": "25", "metric": "180"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"], "Distance must be a positive number");

    let (_, commands) = send(&app, "GET", "/api/view/commands", None).await;
    assert_eq!(commands[0]["type"], "alert");

    let (_, workouts) = send(&app, "GET", "/api/workouts", None).await;
    assert_eq!(workouts, json!([]));
}

#[tokio::test]
async fn test_submit_without_click_conflicts() {
    let (app, _state, _storage) = common::create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/form/submit",
        Some(json!({"kind": "ride", "distance": "10", "duration": "30", "metric": "-5"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_transition");
}

#[tokio::test]
async fn test_second_click_conflicts() {
    let (app, _state, _storage) = common::create_test_app();
    let click = json!({"lat": 10.0, "lng": 20.0});

    let (status, _) = send(&app, "POST", "/api/map/click", Some(click.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/api/map/click", Some(click)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_out_of_range_click_is_rejected() {
    let (app, state, _storage) = common::create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/map/click",
        Some(json!({"lat": 95.0, "lng": 0.0})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("Latitude must be between -90 and 90"));
    assert_eq!(
        state.controller.lock().await.state(),
        mapty_tracker::services::ControllerState::Idle
    );
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, state, _storage) = common::create_test_app();

    let (status, body) =
        send_raw(&app, "POST", "/api/map/click", Some("{oops".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(body["details"].is_string());
    assert_eq!(
        state.controller.lock().await.state(),
        mapty_tracker::services::ControllerState::Idle
    );
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let (app, _state, _storage) = common::create_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/form/submit")
        .body(Body::from(r#"{"kind":"run"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_unknown_kind_alerts_and_keeps_form_open() {
    let (app, state, _storage) = common::create_test_app();
    send(
        &app,
        "POST",
        "/api/map/click",
        Some(json!({"lat": 40.7, "lng": -74.0})),
    )
    .await;
    state.view_queue.drain();

    let (status, body) = send(
        &app,
        "POST",
        "/api/form/submit",
        Some(json!({"kind": "swim", "distance": "1", "duration": "30", "metric": "0"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"], "Unknown workout type: swim");

    let (_, commands) = send(&app, "GET", "/api/view/commands", None).await;
    assert_eq!(
        commands,
        json!([{"type": "alert", "message": "Unknown workout type: swim"}])
    );
    assert!(matches!(
        state.controller.lock().await.state(),
        mapty_tracker::services::ControllerState::AwaitingSubmission { .. }
    ));
}

#[tokio::test]
async fn test_unknown_kind_without_click_conflicts() {
    let (app, state, _storage) = common::create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/form/submit",
        Some(json!({"kind": "swim", "distance": "1", "duration": "30", "metric": "0"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_transition");
    assert!(state.view_queue.is_empty());
}

#[tokio::test]
async fn test_responses_carry_security_headers() {
    let (app, _state, _storage) = common::create_test_app();
    let request = Request::builder()
        .uri("/api/workouts")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["cache-control"], "no-store");
}

#[tokio::test]
async fn test_list_click_navigates_to_workout() {
    let (app, state, _storage) = common::create_test_app();
    send(&app, "POST", "/api/map/ready", None).await;
    send(
        &app,
        "POST",
        "/api/map/click",
        Some(json!({"lat": -33.9, "lng": 151.2})),
    )
    .await;
    let (_, record) = send(
        &app,
        "POST",
        "/api/form/submit",
        Some(json!({"kind": "cycling", "distance": "10", "duration": "30", "metric": "-5"})),
    )
    .await;
    state.view_queue.drain();

    let (status, body) = send(
        &app,
        "POST",
        "/api/list/click",
        Some(json!({"id": record["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["navigated"], true);

    let (_, commands) = send(&app, "GET", "/api/view/commands", None).await;
    assert_eq!(commands[0]["type"], "set_view");
    assert_eq!(commands[0]["location"]["lng"], 151.2);

    let (_, body) = send(&app, "POST", "/api/list/click", Some(json!({}))).await;
    assert_eq!(body["navigated"], false);
}

#[tokio::test]
async fn test_geolocation_unavailable_alerts() {
    let (app, _state, _storage) = common::create_test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/geolocation",
        Some(json!({"status": "unavailable", "reason": "timeout"})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, commands) = send(&app, "GET", "/api/view/commands", None).await;
    assert_eq!(commands[0]["type"], "alert");
    assert_eq!(commands[0]["message"], "Could not get your location");
    assert_eq!(commands[1]["type"], "set_view");
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let (app, _state, storage) = common::create_test_app();
    send(
        &app,
        "POST",
        "/api/map/click",
        Some(json!({"lat": 1.0, "lng": 1.0})),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/form/submit",
        Some(json!({"kind": "run", "distance": "1", "duration": "6", "metric": "170"})),
    )
    .await;

    let (status, _) = send(&app, "POST", "/api/reset", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, workouts) = send(&app, "GET", "/api/workouts", None).await;
    assert_eq!(workouts, json!([]));
    assert_eq!(storage.get("workouts").unwrap(), None);
}
