// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod display;
pub mod form;
pub mod workout;

pub use display::{ListDetail, ListEntry, MarkerPopup};
pub use form::{FormSubmission, RawFormFields};
pub use workout::{
    Location, ValidationError, WorkoutId, WorkoutKind, WorkoutMetrics, WorkoutRecord,
};
