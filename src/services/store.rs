// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ordered workout collection and its persisted snapshot.
//!
//! Records are kept in creation order, which is also display order. The only
//! mutations are appending a record and resetting the whole store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::db::{KeyValueStore, PersistenceError};
use crate::models::WorkoutRecord;

/// Current snapshot format.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    workouts: &'a [WorkoutRecord],
}

/// Just the version, read before the records so that a future format is
/// reported as such even when its records no longer parse.
#[derive(Deserialize)]
struct SnapshotHeader {
    version: u32,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    workouts: Vec<WorkoutRecord>,
}

/// The canonical list of workouts, backed by one key in a `KeyValueStore`.
pub struct WorkoutStore {
    records: Vec<WorkoutRecord>,
    storage: Box<dyn KeyValueStore>,
    key: String,
}

impl WorkoutStore {
    /// Create an empty store persisting under `key`.
    pub fn new(storage: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            storage,
            key: key.into(),
        }
    }

    /// Append a record. Records are validated at construction, so this cannot fail.
    pub fn append(&mut self, record: WorkoutRecord) {
        tracing::debug!(id = %record.id(), kind = %record.kind(), "Appending workout");
        self.records.push(record);
    }

    /// All records, oldest first.
    pub fn all(&self) -> &[WorkoutRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    pub fn find(&self, id: &str) -> Option<&WorkoutRecord> {
        self.records.iter().find(|r| r.id().as_str() == id)
    }

    /// Encode every field of every record, including kind and derived metrics.
    pub fn serialize(&self) -> Result<String, PersistenceError> {
        encode(&self.records)
    }

    /// Replace the contents with the records encoded in `bytes`.
    ///
    /// On error the store keeps its previous contents.
    pub fn deserialize(&mut self, bytes: Option<&str>) -> Result<usize, PersistenceError> {
        let bytes = bytes.ok_or(PersistenceError::Absent)?;
        self.records = decode(bytes)?;
        Ok(self.records.len())
    }

    /// Write the current snapshot to storage.
    pub fn persist(&mut self) -> Result<(), PersistenceError> {
        let encoded = self.serialize()?;
        self.storage.set(&self.key, &encoded)?;
        tracing::debug!(key = %self.key, count = self.records.len(), "Persisted workouts");
        Ok(())
    }

    /// Load the snapshot from storage, replacing the in-memory records.
    pub fn rehydrate(&mut self) -> Result<usize, PersistenceError> {
        let stored = self.storage.get(&self.key)?;
        self.deserialize(stored.as_deref())
    }

    /// Drop every record, in memory and in storage. Safe to call repeatedly.
    pub fn reset(&mut self) -> Result<(), PersistenceError> {
        self.records.clear();
        self.storage.remove(&self.key)?;
        tracing::info!(key = %self.key, "Workout store reset");
        Ok(())
    }
}

/// Encode records into the persisted snapshot format.
pub fn encode(records: &[WorkoutRecord]) -> Result<String, PersistenceError> {
    serde_json::to_string(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        workouts: records,
    })
    .map_err(|e| PersistenceError::Malformed(e.to_string()))
}

/// Decode a persisted snapshot, checking every record and id uniqueness.
pub fn decode(bytes: &str) -> Result<Vec<WorkoutRecord>, PersistenceError> {
    let header: SnapshotHeader =
        serde_json::from_str(bytes).map_err(|e| PersistenceError::Malformed(e.to_string()))?;
    if header.version != SNAPSHOT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(header.version));
    }

    let snapshot: Snapshot =
        serde_json::from_str(bytes).map_err(|e| PersistenceError::Malformed(e.to_string()))?;

    let mut seen = HashSet::new();
    for record in &snapshot.workouts {
        if !seen.insert(record.id().as_str()) {
            return Err(PersistenceError::Malformed(format!(
                "duplicate workout id {}",
                record.id()
            )));
        }
    }

    Ok(snapshot.workouts)
}
