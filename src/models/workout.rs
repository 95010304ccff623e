// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout records logged from a point on the map.
//!
//! A record is validated once, at construction, and is immutable afterwards.
//! Derived metrics (pace for runs, speed for rides) and the display label are
//! computed at construction and stored alongside the inputs, so a persisted
//! record carries everything needed to rebuild it without recomputation.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Relative tolerance when checking stored derived metrics against their inputs.
const DERIVED_TOLERANCE: f64 = 1e-9;

/// Errors raised when user input cannot form a valid workout.
///
/// The display text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a number")]
    NotFinite { field: &'static str },

    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },

    #[error("Latitude must be between -90 and 90 (got {0})")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be between -180 and 180 (got {0})")]
    LongitudeOutOfRange(f64),

    #[error("Unknown workout type: {0}")]
    UnknownKind(String),

    #[error("Stored {field} does not match distance and duration")]
    InconsistentMetric { field: &'static str },
}

/// A point on the map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LocationRepr")]
pub struct Location {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct LocationRepr {
    lat: f64,
    lng: f64,
}

impl TryFrom<LocationRepr> for Location {
    type Error = ValidationError;

    fn try_from(repr: LocationRepr) -> Result<Self, Self::Error> {
        Location::new(repr.lat, repr.lng)
    }
}

impl Location {
    /// 0°N 0°E.
    pub const ORIGIN: Location = Location { lat: 0.0, lng: 0.0 };

    /// Build a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        let lat = require_finite("Latitude", lat)?;
        let lng = require_finite("Longitude", lng)?;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(ValidationError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Which activity a workout records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    #[serde(alias = "running")]
    Run,
    #[serde(alias = "cycling")]
    Ride,
}

impl WorkoutKind {
    /// Emoji shown next to the workout on the map and in the list.
    pub fn icon(self) -> &'static str {
        match self {
            WorkoutKind::Run => "🏃‍♂️",
            WorkoutKind::Ride => "🚴‍♀️",
        }
    }

    /// Style name used by the front end ("running" / "cycling").
    pub fn style_name(self) -> &'static str {
        match self {
            WorkoutKind::Run => "running",
            WorkoutKind::Ride => "cycling",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutKind::Run => f.write_str("Run"),
            WorkoutKind::Ride => f.write_str("Ride"),
        }
    }
}

impl FromStr for WorkoutKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "run" | "running" => Ok(WorkoutKind::Run),
            "ride" | "cycling" => Ok(WorkoutKind::Ride),
            _ => Err(ValidationError::UnknownKind(s.to_string())),
        }
    }
}

/// Opaque workout identifier, unique within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Allocate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Variant-specific inputs and the metric derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkoutMetrics {
    Run {
        /// Steps per minute
        cadence_spm: f64,
        /// Minutes per kilometer (derived)
        pace_min_per_km: f64,
    },
    Ride {
        /// Elevation gain in meters; negative for a net descent
        elevation_gain_m: f64,
        /// Kilometers per hour (derived)
        speed_km_per_h: f64,
    },
}

impl WorkoutMetrics {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            WorkoutMetrics::Run { .. } => WorkoutKind::Run,
            WorkoutMetrics::Ride { .. } => WorkoutKind::Ride,
        }
    }
}

/// One logged activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkoutRecordRepr")]
pub struct WorkoutRecord {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    location: Location,
    distance_km: f64,
    duration_min: f64,
    label: String,
    metrics: WorkoutMetrics,
}

impl WorkoutRecord {
    /// Log a run created now, labelled in local time.
    pub fn create_run(
        location: Location,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Result<Self, ValidationError> {
        Self::create_run_at(location, distance_km, duration_min, cadence_spm, Local::now())
    }

    /// Log a ride created now, labelled in local time.
    pub fn create_ride(
        location: Location,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self, ValidationError> {
        Self::create_ride_at(
            location,
            distance_km,
            duration_min,
            elevation_gain_m,
            Local::now(),
        )
    }

    /// Log a run with an explicit creation time. The label uses the month and
    /// day as seen in `created_at`'s own time zone.
    pub fn create_run_at<Tz>(
        location: Location,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
        created_at: DateTime<Tz>,
    ) -> Result<Self, ValidationError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let distance_km = require_positive("Distance", distance_km)?;
        let duration_min = require_positive("Duration", duration_min)?;
        let cadence_spm = require_positive("Cadence", cadence_spm)?;

        let metrics = WorkoutMetrics::Run {
            cadence_spm,
            pace_min_per_km: pace_min_per_km(distance_km, duration_min),
        };
        Ok(Self::assemble(
            location,
            distance_km,
            duration_min,
            metrics,
            created_at,
        ))
    }

    /// Log a ride with an explicit creation time.
    pub fn create_ride_at<Tz>(
        location: Location,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
        created_at: DateTime<Tz>,
    ) -> Result<Self, ValidationError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let distance_km = require_positive("Distance", distance_km)?;
        let duration_min = require_positive("Duration", duration_min)?;
        let elevation_gain_m = require_finite("Elevation gain", elevation_gain_m)?;

        let metrics = WorkoutMetrics::Ride {
            elevation_gain_m,
            speed_km_per_h: speed_km_per_h(distance_km, duration_min),
        };
        Ok(Self::assemble(
            location,
            distance_km,
            duration_min,
            metrics,
            created_at,
        ))
    }

    fn assemble<Tz>(
        location: Location,
        distance_km: f64,
        duration_min: f64,
        metrics: WorkoutMetrics,
        created_at: DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let label = describe(metrics.kind(), &created_at);
        Self {
            id: WorkoutId::generate(),
            created_at: created_at.with_timezone(&Utc),
            location,
            distance_km,
            duration_min,
            label,
            metrics,
        }
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn metrics(&self) -> &WorkoutMetrics {
        &self.metrics
    }

    pub fn kind(&self) -> WorkoutKind {
        self.metrics.kind()
    }

    /// Pace in min/km, for runs.
    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.metrics {
            WorkoutMetrics::Run {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            WorkoutMetrics::Ride { .. } => None,
        }
    }

    /// Speed in km/h, for rides.
    pub fn speed_km_per_h(&self) -> Option<f64> {
        match self.metrics {
            WorkoutMetrics::Ride { speed_km_per_h, .. } => Some(speed_km_per_h),
            WorkoutMetrics::Run { .. } => None,
        }
    }
}

/// Wire shape of a stored record, checked before it becomes a `WorkoutRecord`.
#[derive(Deserialize)]
struct WorkoutRecordRepr {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    location: Location,
    distance_km: f64,
    duration_min: f64,
    label: String,
    metrics: WorkoutMetrics,
}

impl TryFrom<WorkoutRecordRepr> for WorkoutRecord {
    type Error = ValidationError;

    fn try_from(repr: WorkoutRecordRepr) -> Result<Self, Self::Error> {
        let distance_km = require_positive("Distance", repr.distance_km)?;
        let duration_min = require_positive("Duration", repr.duration_min)?;

        match repr.metrics {
            WorkoutMetrics::Run {
                cadence_spm,
                pace_min_per_km: stored,
            } => {
                require_positive("Cadence", cadence_spm)?;
                require_consistent("pace", stored, pace_min_per_km(distance_km, duration_min))?;
            }
            WorkoutMetrics::Ride {
                elevation_gain_m,
                speed_km_per_h: stored,
            } => {
                require_finite("Elevation gain", elevation_gain_m)?;
                require_consistent("speed", stored, speed_km_per_h(distance_km, duration_min))?;
            }
        }

        Ok(Self {
            id: repr.id,
            created_at: repr.created_at,
            location: repr.location,
            distance_km,
            duration_min,
            label: repr.label,
            metrics: repr.metrics,
        })
    }
}

/// "{Kind} on {Month} {Day}", e.g. "Run on April 14".
pub fn describe<Tz>(kind: WorkoutKind, created_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("{} on {}", kind, created_at.format("%B %-d"))
}

fn pace_min_per_km(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

/// Average speed in km/h: distance over duration in hours.
fn speed_km_per_h(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

fn require_finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NotPositive { field })
    }
}

fn require_consistent(field: &'static str, stored: f64, expected: f64) -> Result<(), ValidationError> {
    if stored.is_finite() && (stored - expected).abs() <= DERIVED_TOLERANCE * expected.abs().max(1.0)
    {
        Ok(())
    } else {
        Err(ValidationError::InconsistentMetric { field })
    }
}
