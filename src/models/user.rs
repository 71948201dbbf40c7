// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{
    DailyLog, DietWeek, HealthProfile, NutritionProfile, PlanSettings, WorkoutWeek,
};

/// Per-user document stored at `users/{user_id}`.
///
/// Profile, plan and daily logs all live on this one document, so every
/// mutation is a read-modify-write of the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    pub email: String,
    pub username: String,
    /// bcrypt hash; never returned by the API
    pub password_hash: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanSettings>,
    #[serde(default)]
    pub diet: Vec<DietWeek>,
    #[serde(default)]
    pub workouts: Vec<WorkoutWeek>,
    #[serde(default, rename = "dailyLogs")]
    pub daily_logs: BTreeMap<String, DailyLog>,
}

impl UserDocument {
    /// Daily log for `date`, created empty on first access.
    pub fn daily_log_mut(&mut self, date: &str) -> &mut DailyLog {
        self.daily_logs.entry(date.to_string()).or_default()
    }
}

/// Email uniqueness marker stored at `user_emails/{encoded email}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailReservation {
    pub user_id: String,
}

/// User fields safe to return from the API.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub created_at: String,
    pub has_health_profile: bool,
    pub has_nutrition_profile: bool,
    pub has_plan: bool,
}

impl PublicUser {
    pub fn from_document(user_id: &str, user: &UserDocument) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            created_at: user.created_at.clone(),
            has_health_profile: user.health.is_some(),
            has_nutrition_profile: user.nutrition.is_some(),
            has_plan: user.plan.is_some() || !user.diet.is_empty() || !user.workouts.is_empty(),
        }
    }
}
