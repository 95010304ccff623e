// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mapty-Tracker: log runs and rides by clicking a point on a map.
//!
//! This crate holds the workout model, its persisted store, and the
//! interaction controller that turns map clicks and form submissions into
//! stored and rendered workouts. The map, form and list are external; they
//! talk to the controller through the traits in [`view`] and the HTTP
//! adapter in [`routes`].

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod view;

use config::Config;
use db::KeyValueStore;
use services::{AppContext, InteractionController, WorkoutStore};
use tokio::sync::Mutex;
use view::ViewQueue;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// One controller per process; the lock serializes incoming events.
    pub controller: Mutex<InteractionController>,
    /// Commands waiting for the front end to apply them.
    pub view_queue: ViewQueue,
}

impl AppState {
    /// Wire the controller to `storage` and restore saved workouts.
    pub fn new(config: Config, storage: Box<dyn KeyValueStore>) -> Self {
        let view_queue = ViewQueue::new();
        let ctx = AppContext {
            config: config.clone(),
            store: WorkoutStore::new(storage, config.storage_key.clone()),
            map: Box::new(view_queue.clone()),
            form: Box::new(view_queue.clone()),
            views: Box::new(view_queue.clone()),
        };

        let mut controller = InteractionController::new(ctx);
        controller.start();

        Self {
            config,
            controller: Mutex::new(controller),
            view_queue,
        }
    }
}
