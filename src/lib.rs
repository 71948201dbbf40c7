// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Snap Fitness: backend API for fitness and nutrition tracking
//!
//! This crate provides user registration, health and nutrition profiles,
//! diet/workout plans, daily tracking logs and a read-only exercise
//! reference dataset.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod validation;

use config::Config;
use db::{ExerciseCatalog, HealthRecordStore, UserStore};
use services::{
    CatalogService, PlanGenerator, PlanService, ProfileService, TrackingService, UserService,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub users: UserService,
    pub profiles: ProfileService,
    pub plans: PlanService,
    pub tracking: TrackingService,
    pub catalog: CatalogService,
}

impl AppState {
    /// Wire the services to their stores.
    pub fn new(
        config: Config,
        user_store: Arc<dyn UserStore>,
        exercises: Arc<dyn ExerciseCatalog>,
        records: Arc<dyn HealthRecordStore>,
        generator: Arc<dyn PlanGenerator>,
    ) -> Self {
        Self {
            users: UserService::new(user_store.clone(), config.bcrypt_cost),
            profiles: ProfileService::new(user_store.clone()),
            plans: PlanService::new(user_store.clone(), generator),
            tracking: TrackingService::new(user_store),
            catalog: CatalogService::new(exercises, records),
            config,
        }
    }
}
