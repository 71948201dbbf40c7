// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod generator;
pub mod plan;
pub mod profile;
pub mod tracking;
pub mod users;

pub use catalog::CatalogService;
pub use generator::{PlanGenerator, StaticBaselineGenerator};
pub use plan::PlanService;
pub use profile::ProfileService;
pub use tracking::TrackingService;
pub use users::UserService;
