// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-side API: stored workouts, pending view commands, and reset.

use crate::error::Result;
use crate::models::WorkoutRecord;
use crate::view::ViewCommand;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts))
        .route("/api/view/commands", get(drain_view_commands))
        .route("/api/reset", post(reset))
}

/// All workouts, oldest first.
async fn list_workouts(State(state): State<Arc<AppState>>) -> Json<Vec<WorkoutRecord>> {
    let controller = state.controller.lock().await;
    Json(controller.store().all().to_vec())
}

/// Hand every queued rendering command to the front end.
async fn drain_view_commands(State(state): State<Arc<AppState>>) -> Json<Vec<ViewCommand>> {
    Json(state.view_queue.drain())
}

/// Delete every workout and return to an empty app.
async fn reset(State(state): State<Arc<AppState>>) -> Result<StatusCode> {
    let mut controller = state.controller.lock().await;
    controller.reset()?;
    tracing::info!("User reset workouts");
    Ok(StatusCode::NO_CONTENT)
}
