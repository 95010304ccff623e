// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use mapty_tracker::config::Config;
use mapty_tracker::db::{KeyValueStore, MemoryStorage};
use mapty_tracker::models::{Location, WorkoutRecord};
use mapty_tracker::routes::create_router;
use mapty_tracker::services::{AppContext, InteractionController, WorkoutStore};
use mapty_tracker::view::ViewQueue;
use mapty_tracker::AppState;
use std::sync::Arc;

/// A controller wired to in-memory storage and a view queue.
/// Returns the controller plus handles on the queue and the storage.
#[allow(dead_code)]
pub fn test_controller(storage: &MemoryStorage) -> (InteractionController, ViewQueue) {
    let config = Config::default();
    let queue = ViewQueue::new();
    let ctx = AppContext {
        store: WorkoutStore::new(Box::new(storage.clone()), config.storage_key.clone()),
        config,
        map: Box::new(queue.clone()),
        form: Box::new(queue.clone()),
        views: Box::new(queue.clone()),
    };
    (InteractionController::new(ctx), queue)
}

/// Storage pre-filled with the given serialized value under the workouts key.
#[allow(dead_code)]
pub fn storage_with(value: &str) -> MemoryStorage {
    let mut storage = MemoryStorage::new();
    storage
        .set(&Config::default().storage_key, value)
        .expect("memory storage write");
    storage
}

#[allow(dead_code)]
pub fn nyc() -> Location {
    Location::new(40.7, -74.0).unwrap()
}

/// Serialize records the way the store persists them.
#[allow(dead_code)]
pub fn snapshot_of(records: &[WorkoutRecord]) -> String {
    mapty_tracker::services::store::encode(records).expect("encode snapshot")
}

/// Create a test app backed by in-memory storage.
/// Returns the router, the shared state and the storage handle.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryStorage) {
    let storage = MemoryStorage::new();
    let state = Arc::new(AppState::new(Config::default(), Box::new(storage.clone())));
    (create_router(state.clone()), state, storage)
}
