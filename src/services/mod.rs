// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod controller;
pub mod store;

pub use controller::{
    AppContext, ControllerError, ControllerState, GeolocationUnavailable, InteractionController,
};
pub use store::WorkoutStore;
