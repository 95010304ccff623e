//! Workout form submissions.

use serde::Deserialize;

use crate::models::workout::{Location, ValidationError, WorkoutKind, WorkoutRecord};

/// Values read from the workout form when the user submits it.
///
/// `metric` is the cadence for runs and the elevation gain for rides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormSubmission {
    pub kind: WorkoutKind,
    pub distance_km: f64,
    pub duration_min: f64,
    pub metric: f64,
}

/// The form's raw field text, as typed by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFormFields {
    pub kind: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub metric: String,
}

impl FormSubmission {
    pub fn new(kind: WorkoutKind, distance_km: f64, duration_min: f64, metric: f64) -> Self {
        Self {
            kind,
            distance_km,
            duration_min,
            metric,
        }
    }

    /// Parse raw field text. Unparseable numbers become NaN so that they are
    /// reported by record validation; only an unknown kind fails here.
    pub fn parse(fields: &RawFormFields) -> Result<Self, ValidationError> {
        Ok(Self {
            kind: fields.kind.parse()?,
            distance_km: parse_number(&fields.distance),
            duration_min: parse_number(&fields.duration),
            metric: parse_number(&fields.metric),
        })
    }

    /// Build the record for this submission at `location`.
    pub fn into_record(self, location: Location) -> Result<WorkoutRecord, ValidationError> {
        match self.kind {
            WorkoutKind::Run => WorkoutRecord::create_run(
                location,
                self.distance_km,
                self.duration_min,
                self.metric,
            ),
            WorkoutKind::Ride => WorkoutRecord::create_ride(
                location,
                self.distance_km,
                self.duration_min,
                self.metric,
            ),
        }
    }
}

fn parse_number(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NAN)
}
