// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collaborator interfaces used by the interaction controller, and a queue
//! that implements them for an out-of-process front end.
//!
//! The controller never draws anything itself. It asks the map to move or
//! add a marker, asks the form to show or hide, and asks the views to render
//! a workout. `ViewQueue` records those requests as `ViewCommand`s which the
//! browser front end drains and applies.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;

use crate::models::{ListEntry, Location, MarkerPopup, WorkoutKind, WorkoutRecord};

/// Renders workouts for the user. Implementations must not mutate the record.
pub trait ViewNotifier: Send {
    /// Place a marker for the workout on the map.
    fn render_marker(&mut self, record: &WorkoutRecord);

    /// Add the workout to the list.
    fn render_list_entry(&mut self, record: &WorkoutRecord);

    /// Remove every rendered marker and list entry.
    fn clear_rendered(&mut self);
}

/// Optional animation for a map view change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanAnimation {
    pub duration: Duration,
}

/// The map widget.
pub trait MapSurface: Send {
    fn set_view(&mut self, location: Location, zoom: u8, pan: Option<PanAnimation>);

    fn add_marker(&mut self, location: Location, popup: MarkerPopup);
}

/// The workout entry form.
pub trait FormSurface: Send {
    fn show(&mut self);

    /// Hide the form; its layout is restored after `restore_layout_after`.
    fn hide(&mut self, restore_layout_after: Duration);

    /// Empty every input field.
    fn clear(&mut self);

    fn focus_distance_field(&mut self);

    /// Show the cadence field for runs or the elevation field for rides.
    fn present_metric_field(&mut self, kind: WorkoutKind);

    /// Show a blocking message to the user.
    fn alert(&mut self, message: &str);
}

/// A rendering request for the front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewCommand {
    SetView {
        location: Location,
        zoom: u8,
        animate: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        pan_duration_ms: Option<u64>,
    },
    AddMarker {
        location: Location,
        popup: MarkerPopup,
    },
    RenderListEntry {
        entry: ListEntry,
    },
    ClearRendered,
    ShowForm,
    HideForm {
        restore_layout_after_ms: u64,
    },
    ClearForm,
    FocusDistanceField,
    PresentMetricField {
        kind: WorkoutKind,
    },
    Alert {
        message: String,
    },
}

impl ViewCommand {
    fn is_rendering(&self) -> bool {
        matches!(
            self,
            ViewCommand::AddMarker { .. }
                | ViewCommand::RenderListEntry { .. }
                | ViewCommand::ClearRendered
        )
    }
}

/// Most commands held for a front end that is not draining the queue.
pub const MAX_PENDING_COMMANDS: usize = 1024;

/// Shared queue of view commands. Clones push to and drain the same queue.
#[derive(Debug, Clone, Default)]
pub struct ViewQueue {
    commands: Arc<Mutex<VecDeque<ViewCommand>>>,
}

impl ViewQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ViewCommand>> {
        // A panic mid-push cannot leave a half-written command behind.
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a command. A `ClearRendered` supersedes rendering still
    /// waiting in the queue. Past `MAX_PENDING_COMMANDS` the oldest command
    /// is dropped.
    pub fn push(&self, command: ViewCommand) {
        let mut commands = self.lock();
        if matches!(command, ViewCommand::ClearRendered) {
            commands.retain(|c| !c.is_rendering());
        }
        if commands.len() >= MAX_PENDING_COMMANDS {
            commands.pop_front();
            tracing::warn!(
                limit = MAX_PENDING_COMMANDS,
                "View queue full, dropping oldest command"
            );
        }
        commands.push_back(command);
    }

    /// Take every pending command, oldest first.
    pub fn drain(&self) -> Vec<ViewCommand> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl ViewNotifier for ViewQueue {
    fn render_marker(&mut self, record: &WorkoutRecord) {
        self.add_marker(record.location(), MarkerPopup::for_workout(record));
    }

    fn render_list_entry(&mut self, record: &WorkoutRecord) {
        self.push(ViewCommand::RenderListEntry {
            entry: ListEntry::for_workout(record),
        });
    }

    fn clear_rendered(&mut self) {
        self.push(ViewCommand::ClearRendered);
    }
}

impl MapSurface for ViewQueue {
    fn set_view(&mut self, location: Location, zoom: u8, pan: Option<PanAnimation>) {
        self.push(ViewCommand::SetView {
            location,
            zoom,
            animate: pan.is_some(),
            pan_duration_ms: pan.map(|p| p.duration.as_millis() as u64),
        });
    }

    fn add_marker(&mut self, location: Location, popup: MarkerPopup) {
        self.push(ViewCommand::AddMarker { location, popup });
    }
}

impl FormSurface for ViewQueue {
    fn show(&mut self) {
        self.push(ViewCommand::ShowForm);
    }

    fn hide(&mut self, restore_layout_after: Duration) {
        self.push(ViewCommand::HideForm {
            restore_layout_after_ms: restore_layout_after.as_millis() as u64,
        });
    }

    fn clear(&mut self) {
        self.push(ViewCommand::ClearForm);
    }

    fn focus_distance_field(&mut self) {
        self.push(ViewCommand::FocusDistanceField);
    }

    fn present_metric_field(&mut self, kind: WorkoutKind) {
        self.push(ViewCommand::PresentMetricField { kind });
    }

    fn alert(&mut self, message: &str) {
        self.push(ViewCommand::Alert {
            message: message.to_string(),
        });
    }
}
