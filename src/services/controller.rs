// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interaction controller: the state machine between map clicks, the
//! workout form and the rendered views.
//!
//! Handles the core workflow:
//! 1. A map click opens the form and remembers the clicked location
//! 2. A valid submission creates a workout at that location
//! 3. The workout is appended to the store and persisted
//! 4. The map and list views are asked to render it
//! 5. The form is cleared and hidden
//!
//! Every event handler runs to completion before the next event is accepted.

use std::time::Duration;

use serde::Serialize;

use crate::config::Config;
use crate::db::PersistenceError;
use crate::models::{
    FormSubmission, Location, RawFormFields, ValidationError, WorkoutKind, WorkoutRecord,
};
use crate::services::WorkoutStore;
use crate::view::{FormSurface, MapSurface, PanAnimation, ViewNotifier};

/// Pan animation used when jumping to a workout from the list.
const LIST_PAN: PanAnimation = PanAnimation {
    duration: Duration::from_secs(1),
};

/// Everything the controller works with, built once at startup.
pub struct AppContext {
    pub config: Config,
    pub store: WorkoutStore,
    pub map: Box<dyn MapSurface>,
    pub form: Box<dyn FormSurface>,
    pub views: Box<dyn ViewNotifier>,
}

/// Where the controller is in the pick-then-submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ControllerState {
    /// No form open.
    Idle,
    /// A location was picked and the form is waiting for input.
    AwaitingSubmission { location: Location },
}

/// The user's position could not be determined.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Could not get your location")]
pub struct GeolocationUnavailable {
    pub reason: String,
}

/// Errors from controller events.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("No workout form is open")]
    NotAwaitingSubmission,

    #[error("A workout form is already open")]
    SubmissionPending,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Coordinates map, form and views around the workout store.
pub struct InteractionController {
    ctx: AppContext,
    state: ControllerState,
    map_ready: bool,
}

impl InteractionController {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: ControllerState::Idle,
            map_ready: false,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.ctx.store
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    /// Restore saved workouts and render them in the list.
    ///
    /// Missing or corrupt data leaves the store empty; it is logged but never
    /// reported to the user. Markers wait for the map to become ready.
    pub fn start(&mut self) -> usize {
        match self.ctx.store.rehydrate() {
            Ok(count) => {
                tracing::info!(count, "Restored saved workouts");
            }
            Err(PersistenceError::Absent) => {
                tracing::debug!("No saved workouts");
                return 0;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable saved workouts");
                return 0;
            }
        }

        for record in self.ctx.store.all() {
            self.ctx.views.render_list_entry(record);
            if self.map_ready {
                self.ctx.views.render_marker(record);
            }
        }
        self.ctx.store.len()
    }

    /// Center the map on the user's position, or on the configured fallback
    /// when the position is unavailable. The app stays usable either way.
    pub fn on_geolocation(&mut self, position: Result<Location, GeolocationUnavailable>) {
        let zoom = self.ctx.config.map_zoom;
        match position {
            Ok(location) => {
                tracing::info!(lat = location.lat(), lng = location.lng(), "Position acquired");
                self.ctx.map.set_view(location, zoom, None);
            }
            Err(e) => {
                tracing::warn!(reason = %e.reason, "Geolocation unavailable");
                self.ctx.form.alert(&e.to_string());
                self.ctx
                    .map
                    .set_view(self.ctx.config.fallback_location, zoom, None);
            }
        }
    }

    /// The map finished loading: render markers deferred until now.
    pub fn on_map_ready(&mut self) {
        if self.map_ready {
            tracing::debug!("Map already ready");
            return;
        }
        self.map_ready = true;

        for record in self.ctx.store.all() {
            self.ctx.views.render_marker(record);
        }
        tracing::info!(markers = self.ctx.store.len(), "Map ready");
    }

    /// A point on the map was clicked. Opens the form for that location.
    ///
    /// A click while a form is already open is rejected and leaves the
    /// pending location in place.
    pub fn on_location_picked(&mut self, location: Location) -> Result<(), ControllerError> {
        if let ControllerState::AwaitingSubmission { location: pending } = self.state {
            tracing::warn!(
                pending_lat = pending.lat(),
                pending_lng = pending.lng(),
                "Ignoring map click while form is open"
            );
            return Err(ControllerError::SubmissionPending);
        }

        self.state = ControllerState::AwaitingSubmission { location };
        self.ctx.form.show();
        self.ctx.form.focus_distance_field();
        tracing::debug!(lat = location.lat(), lng = location.lng(), "Form opened");
        Ok(())
    }

    /// The workout type select changed.
    pub fn on_activity_type_changed(&mut self, kind: WorkoutKind) -> Result<(), ControllerError> {
        self.require_pending()?;
        self.ctx.form.present_metric_field(kind);
        Ok(())
    }

    /// The form was submitted as raw field text.
    ///
    /// The form must be open before the fields are looked at. Text that does
    /// not parse raises the same alert as an invalid workout.
    pub fn on_submit_form(
        &mut self,
        fields: &RawFormFields,
    ) -> Result<WorkoutRecord, ControllerError> {
        self.require_pending()?;
        match FormSubmission::parse(fields) {
            Ok(submission) => self.on_submit(submission),
            Err(e) => Err(self.reject_input(&fields.kind, e)),
        }
    }

    /// The form was submitted.
    ///
    /// On success the new record is stored, persisted and rendered and the
    /// form closes. Invalid input raises an alert and keeps the form open.
    pub fn on_submit(
        &mut self,
        submission: FormSubmission,
    ) -> Result<WorkoutRecord, ControllerError> {
        let location = self.require_pending()?;

        let record = match submission.into_record(location) {
            Ok(record) => record,
            Err(e) => return Err(self.reject_input(submission.kind, e)),
        };

        self.ctx.store.append(record.clone());
        if let Err(e) = self.ctx.store.persist() {
            // Local persistence is best-effort; the workout stays in memory.
            tracing::error!(error = %e, id = %record.id(), "Failed to persist workouts");
        }

        if self.map_ready {
            self.ctx.views.render_marker(&record);
        }
        self.ctx.views.render_list_entry(&record);

        self.ctx.form.clear();
        self.ctx.form.hide(self.ctx.config.form_restore_delay);
        self.state = ControllerState::Idle;

        tracing::info!(
            id = %record.id(),
            kind = %record.kind(),
            label = record.label(),
            "Workout logged"
        );
        Ok(record)
    }

    /// The form was dismissed without submitting.
    pub fn on_cancel(&mut self) -> Result<(), ControllerError> {
        self.require_pending()?;
        self.ctx.form.hide(self.ctx.config.form_restore_delay);
        self.state = ControllerState::Idle;
        tracing::debug!("Form cancelled");
        Ok(())
    }

    /// A click in the workout list. `id` is `None` when the click did not
    /// land on a workout row.
    ///
    /// Returns whether the map was moved.
    pub fn on_workout_list_item_activated(&mut self, id: Option<&str>) -> bool {
        let Some(id) = id else {
            return false;
        };
        let Some(record) = self.ctx.store.find(id) else {
            tracing::debug!(id, "List click on unknown workout");
            return false;
        };
        if !self.map_ready {
            tracing::debug!(id, "List click before map is ready");
            return false;
        }

        self.ctx
            .map
            .set_view(record.location(), self.ctx.config.map_zoom, Some(LIST_PAN));
        true
    }

    /// Drop every workout, in memory and in storage, and start over.
    pub fn reset(&mut self) -> Result<(), PersistenceError> {
        if self.state != ControllerState::Idle {
            self.ctx.form.hide(self.ctx.config.form_restore_delay);
            self.state = ControllerState::Idle;
        }
        self.ctx.views.clear_rendered();
        self.ctx.store.reset()
    }

    fn reject_input(
        &mut self,
        kind: impl std::fmt::Display,
        e: ValidationError,
    ) -> ControllerError {
        tracing::info!(kind = %kind, error = %e, "Rejected workout input");
        self.ctx.form.alert(&e.to_string());
        e.into()
    }

    fn require_pending(&self) -> Result<Location, ControllerError> {
        match self.state {
            ControllerState::AwaitingSubmission { location } => Ok(location),
            ControllerState::Idle => Err(ControllerError::NotAwaitingSubmission),
        }
    }
}
