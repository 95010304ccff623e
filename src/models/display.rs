// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Display models handed to the map and list views.

use serde::{Deserialize, Serialize};

use crate::models::workout::{WorkoutKind, WorkoutMetrics, WorkoutRecord};

/// Popup attached to a workout's map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPopup {
    /// Text shown in the popup (icon + label)
    pub content: String,
    /// CSS class, e.g. "running-popup"
    pub class_name: String,
    pub min_width: u32,
    pub max_width: u32,
    /// Popups stay open when another popup opens
    pub auto_close: bool,
    /// Popups stay open when the map is clicked
    pub close_on_click: bool,
}

impl MarkerPopup {
    pub fn for_workout(record: &WorkoutRecord) -> Self {
        let kind = record.kind();
        Self {
            content: format!("{} {}", kind.icon(), record.label()),
            class_name: format!("{}-popup", kind.style_name()),
            min_width: 100,
            max_width: 250,
            auto_close: false,
            close_on_click: false,
        }
    }
}

/// One row of the workout list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: String,
    pub kind: WorkoutKind,
    pub title: String,
    pub details: Vec<ListDetail>,
}

/// An icon / value / unit triple within a list row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDetail {
    pub icon: String,
    pub value: String,
    pub unit: String,
}

impl ListDetail {
    fn new(icon: &str, value: String, unit: &str) -> Self {
        Self {
            icon: icon.to_string(),
            value,
            unit: unit.to_string(),
        }
    }
}

impl ListEntry {
    pub fn for_workout(record: &WorkoutRecord) -> Self {
        let kind = record.kind();
        let mut details = vec![
            ListDetail::new(kind.icon(), record.distance_km().to_string(), "km"),
            ListDetail::new("⏱", record.duration_min().to_string(), "min"),
        ];

        match *record.metrics() {
            WorkoutMetrics::Run {
                cadence_spm,
                pace_min_per_km,
            } => {
                details.push(ListDetail::new("⚡️", format!("{:.1}", pace_min_per_km), "min/km"));
                details.push(ListDetail::new("🦶🏼", format!("{:.1}", cadence_spm), "spm"));
            }
            WorkoutMetrics::Ride {
                elevation_gain_m,
                speed_km_per_h,
            } => {
                details.push(ListDetail::new("⚡️", format!("{:.1}", speed_km_per_h), "km/h"));
                details.push(ListDetail::new("⛰", format!("{:.1}", elevation_gain_m), "m"));
            }
        }

        Self {
            id: record.id().to_string(),
            kind,
            title: record.label().to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::workout::Location;
    use chrono::{TimeZone, Utc};

    fn created() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 3, 7, 0, 0).unwrap()
    }

    #[test]
    fn test_marker_popup_for_run() {
        let location = Location::new(51.5, -0.12).unwrap();
        let run = WorkoutRecord::create_run_at(location, 5.0, 25.0, 180.0, created()).unwrap();
        let popup = MarkerPopup::for_workout(&run);

        assert_eq!(popup.content, "🏃‍♂️ Run on June 3");
        assert_eq!(popup.class_name, "running-popup");
        assert!(!popup.auto_close);
        assert!(!popup.close_on_click);
    }

    #[test]
    fn test_list_entry_for_ride() {
        let location = Location::new(51.5, -0.12).unwrap();
        let ride = WorkoutRecord::create_ride_at(location, 10.0, 30.0, -5.0, created()).unwrap();
        let entry = ListEntry::for_workout(&ride);

        assert_eq!(entry.id, ride.id().as_str());
        assert_eq!(entry.title, "Ride on June 3");
        let values: Vec<(&str, &str)> = entry
            .details
            .iter()
            .map(|d| (d.value.as_str(), d.unit.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![("10", "km"), ("30", "min"), ("20.0", "km/h"), ("-5.0", "m")]
        );
    }
}
