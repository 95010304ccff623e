// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event routes: the front end reports map, form and list interactions here.
//!
//! Each handler forwards one event to the controller. Resulting rendering
//! work is queued and fetched from `/api/view/commands`.

use crate::error::{AppJson, Result};
use crate::models::{Location, RawFormFields, WorkoutKind, WorkoutRecord};
use crate::services::{ControllerState, GeolocationUnavailable};
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/geolocation", post(report_geolocation))
        .route("/api/map/ready", post(map_ready))
        .route("/api/map/click", post(map_click))
        .route("/api/form/type", post(form_type_changed))
        .route("/api/form/submit", post(form_submit))
        .route("/api/form/cancel", post(form_cancel))
        .route("/api/list/click", post(list_click))
}

/// Outcome of the browser's geolocation request.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeolocationReport {
    Acquired { location: Location },
    Unavailable { reason: String },
}

async fn report_geolocation(
    State(state): State<Arc<AppState>>,
    AppJson(report): AppJson<GeolocationReport>,
) -> StatusCode {
    let position = match report {
        GeolocationReport::Acquired { location } => Ok(location),
        GeolocationReport::Unavailable { reason } => Err(GeolocationUnavailable { reason }),
    };
    state.controller.lock().await.on_geolocation(position);
    StatusCode::NO_CONTENT
}

async fn map_ready(State(state): State<Arc<AppState>>) -> StatusCode {
    state.controller.lock().await.on_map_ready();
    StatusCode::NO_CONTENT
}

async fn map_click(
    State(state): State<Arc<AppState>>,
    AppJson(location): AppJson<Location>,
) -> Result<Json<ControllerState>> {
    let mut controller = state.controller.lock().await;
    controller.on_location_picked(location)?;
    Ok(Json(controller.state()))
}

#[derive(Debug, Deserialize)]
pub struct TypeChange {
    pub kind: WorkoutKind,
}

async fn form_type_changed(
    State(state): State<Arc<AppState>>,
    AppJson(change): AppJson<TypeChange>,
) -> Result<StatusCode> {
    state
        .controller
        .lock()
        .await
        .on_activity_type_changed(change.kind)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn form_submit(
    State(state): State<Arc<AppState>>,
    AppJson(fields): AppJson<RawFormFields>,
) -> Result<(StatusCode, Json<WorkoutRecord>)> {
    let record = state.controller.lock().await.on_submit_form(&fields)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn form_cancel(State(state): State<Arc<AppState>>) -> Result<Json<ControllerState>> {
    let mut controller = state.controller.lock().await;
    controller.on_cancel()?;
    Ok(Json(controller.state()))
}

/// A click in the workout list; `id` is absent when no row was hit.
#[derive(Debug, Deserialize)]
pub struct ListClick {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListClickResponse {
    pub navigated: bool,
}

async fn list_click(
    State(state): State<Arc<AppState>>,
    AppJson(click): AppJson<ListClick>,
) -> Json<ListClickResponse> {
    let navigated = state
        .controller
        .lock()
        .await
        .on_workout_list_item_activated(click.id.as_deref());
    Json(ListClickResponse { navigated })
}

