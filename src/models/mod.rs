// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod exercise;
pub mod health;
pub mod nutrition;
pub mod plan;
pub mod tracking;
pub mod user;

pub use exercise::{
    CatalogTag, Exercise, ExerciseFilter, HealthRecord, HealthRecordPatch, TagKind,
};
pub use health::{compute_bmi, HealthProfile};
pub use nutrition::NutritionProfile;
pub use plan::{
    DietWeek, MealCompletion, PlanPreferences, PlanSection, PlanSettings, PlanStatus, PlanType,
    PlannedWorkout, WorkoutWeek,
};
pub use tracking::{DailyLog, DailyWorkout, DatedLog, MealType, Mood, Wellness};
pub use user::{EmailReservation, PublicUser, UserDocument};
