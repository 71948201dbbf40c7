// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Diet and workout plan service.

use crate::db::{mutation, UserStore};
use crate::error::{AppError, Result};
use crate::models::plan::{append_week, assign_week_ids, remove_week, replace_week};
use crate::models::{
    DietWeek, PlanPreferences, PlanSection, PlanSettings, PlanStatus, PlanType, UserDocument,
    WorkoutWeek,
};
use crate::services::generator::PlanGenerator;
use crate::time_utils::now_rfc3339;
use crate::validation::{dedupe, validation_failed};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

/// Body of `POST /users/{id}/plan`. Preferences sit at the top level.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreatePlanRequest {
    pub plan_type: Option<String>,
    #[validate(range(min = 1, max = 52, message = "must be between 1 and 52"))]
    pub duration_weeks: Option<u32>,
    pub intensity: Option<String>,
    #[serde(default)]
    pub specific_goals: Vec<String>,
    #[serde(default)]
    pub available_equipment: Vec<String>,
    #[validate(range(min = 1, max = 7, message = "must be between 1 and 7"))]
    pub workout_days_per_week: Option<u32>,
    pub notes: Option<String>,
}

impl CreatePlanRequest {
    fn preferences(self) -> PlanPreferences {
        let defaults = PlanPreferences::default();
        PlanPreferences {
            duration_weeks: self.duration_weeks.unwrap_or(defaults.duration_weeks),
            intensity: self
                .intensity
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .unwrap_or(defaults.intensity),
            specific_goals: dedupe(self.specific_goals),
            available_equipment: dedupe(self.available_equipment),
            workout_days_per_week: self
                .workout_days_per_week
                .unwrap_or(defaults.workout_days_per_week),
            notes: self.notes.unwrap_or_default(),
        }
    }
}

/// Body of `PUT /users/{id}/plan`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlanRequest {
    pub diet: Option<Vec<DietWeek>>,
    pub workouts: Option<Vec<WorkoutWeek>>,
    pub status: Option<PlanStatus>,
}

/// A user's plan as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct PlanView {
    pub plan: Option<PlanSettings>,
    pub diet: Vec<DietWeek>,
    pub workouts: Vec<WorkoutWeek>,
}

impl PlanView {
    fn from_user(user: UserDocument) -> Self {
        Self {
            plan: user.plan,
            diet: user.diet,
            workouts: user.workouts,
        }
    }
}

fn parse_week<T: DeserializeOwned>(section: PlanSection, body: Value) -> Result<T> {
    serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid {section} week: {e}")))
}

fn touch(user: &mut UserDocument, now: &str) {
    if let Some(plan) = user.plan.as_mut() {
        plan.updated_at = now.to_string();
    }
}

/// Plan operations.
pub struct PlanService {
    users: Arc<dyn UserStore>,
    generator: Arc<dyn PlanGenerator>,
}

impl PlanService {
    pub fn new(users: Arc<dyn UserStore>, generator: Arc<dyn PlanGenerator>) -> Self {
        Self { users, generator }
    }

    /// Generate and store a new plan, replacing any previous one.
    pub async fn create_plan(&self, user_id: &str, request: CreatePlanRequest) -> Result<PlanView> {
        let plan_type = match request.plan_type.as_deref().map(str::trim) {
            None | Some("") => PlanType::Combined,
            Some(raw) => raw.parse()?,
        };
        request.validate().map_err(validation_failed)?;
        let preferences = request.preferences();

        let user = self
            .users
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let mut diet = if plan_type.includes_diet() {
            self.generator.diet_plan(&user, &preferences).await?
        } else {
            Vec::new()
        };
        let mut workouts = if plan_type.includes_workouts() {
            self.generator.workout_plan(&user, &preferences).await?
        } else {
            Vec::new()
        };
        assign_week_ids(&mut diet)?;
        assign_week_ids(&mut workouts)?;

        let now = now_rfc3339();
        let settings = PlanSettings {
            plan_type,
            status: PlanStatus::Active,
            preferences,
            created_at: now.clone(),
            updated_at: now,
        };

        let user = self
            .users
            .update_user(
                user_id,
                mutation(move |user| {
                    user.diet = diet.clone();
                    user.workouts = workouts.clone();
                    user.plan = Some(settings.clone());
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(
            user_id,
            plan_type = ?plan_type,
            diet_weeks = user.diet.len(),
            workout_weeks = user.workouts.len(),
            "Plan created"
        );
        Ok(PlanView::from_user(user))
    }

    pub async fn get_plan(&self, user_id: &str) -> Result<PlanView> {
        let user = self
            .users
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        Ok(PlanView::from_user(user))
    }

    /// Replace the supplied parts of the plan; the rest is untouched.
    pub async fn update_plan(&self, user_id: &str, request: UpdatePlanRequest) -> Result<PlanView> {
        let UpdatePlanRequest {
            mut diet,
            mut workouts,
            status,
        } = request;

        if diet.is_none() && workouts.is_none() && status.is_none() {
            return Err(AppError::BadRequest("No update data provided".to_string()));
        }
        if let Some(weeks) = diet.as_mut() {
            assign_week_ids(weeks)?;
        }
        if let Some(weeks) = workouts.as_mut() {
            assign_week_ids(weeks)?;
        }

        let now = now_rfc3339();
        let user = self
            .users
            .update_user(
                user_id,
                mutation(move |user| {
                    if let Some(status) = status {
                        let plan = user
                            .plan
                            .as_mut()
                            .ok_or_else(|| AppError::NotFound("Plan not found".to_string()))?;
                        plan.status = status;
                    }
                    if let Some(weeks) = &diet {
                        user.diet = weeks.clone();
                    }
                    if let Some(weeks) = &workouts {
                        user.workouts = weeks.clone();
                    }
                    touch(user, &now);
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(user_id, "Plan updated");
        Ok(PlanView::from_user(user))
    }

    /// Clear both lists and the plan metadata.
    pub async fn delete_plan(&self, user_id: &str) -> Result<()> {
        self.users
            .update_user(
                user_id,
                mutation(|user| {
                    user.diet.clear();
                    user.workouts.clear();
                    user.plan = None;
                    Ok(())
                }),
            )
            .await?;
        tracing::info!(user_id, "Plan deleted");
        Ok(())
    }

    // ─── Week Records ────────────────────────────────────────

    /// Append a week to one list, returning its id.
    pub async fn add_week(&self, user_id: &str, section: PlanSection, body: Value) -> Result<String> {
        let now = now_rfc3339();
        let user = match section {
            PlanSection::Diet => {
                let week: DietWeek = parse_week(section, body)?;
                self.users
                    .update_user(
                        user_id,
                        mutation(move |user| {
                            append_week(&mut user.diet, week.clone())?;
                            touch(user, &now);
                            Ok(())
                        }),
                    )
                    .await?
            }
            PlanSection::Workouts => {
                let week: WorkoutWeek = parse_week(section, body)?;
                self.users
                    .update_user(
                        user_id,
                        mutation(move |user| {
                            append_week(&mut user.workouts, week.clone())?;
                            touch(user, &now);
                            Ok(())
                        }),
                    )
                    .await?
            }
        };

        // The week just appended is last in its list.
        let week_id = match section {
            PlanSection::Diet => user.diet.last().map(|w| w.id.clone()),
            PlanSection::Workouts => user.workouts.last().map(|w| w.id.clone()),
        }
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Appended week missing")))?;

        tracing::info!(user_id, section = %section, week_id = %week_id, "Plan week added");
        Ok(week_id)
    }

    /// Replace the week with `week_id`, keeping its id.
    pub async fn replace_week(
        &self,
        user_id: &str,
        section: PlanSection,
        week_id: &str,
        body: Value,
    ) -> Result<()> {
        let now = now_rfc3339();
        let id = week_id.to_string();
        match section {
            PlanSection::Diet => {
                let week: DietWeek = parse_week(section, body)?;
                self.users
                    .update_user(
                        user_id,
                        mutation(move |user| {
                            replace_week(&mut user.diet, &id, week.clone())?;
                            touch(user, &now);
                            Ok(())
                        }),
                    )
                    .await?;
            }
            PlanSection::Workouts => {
                let week: WorkoutWeek = parse_week(section, body)?;
                self.users
                    .update_user(
                        user_id,
                        mutation(move |user| {
                            replace_week(&mut user.workouts, &id, week.clone())?;
                            touch(user, &now);
                            Ok(())
                        }),
                    )
                    .await?;
            }
        }

        tracing::info!(user_id, section = %section, week_id, "Plan week replaced");
        Ok(())
    }

    pub async fn remove_week(&self, user_id: &str, section: PlanSection, week_id: &str) -> Result<()> {
        let now = now_rfc3339();
        let id = week_id.to_string();
        self.users
            .update_user(
                user_id,
                mutation(move |user| {
                    match section {
                        PlanSection::Diet => remove_week(&mut user.diet, &id)?,
                        PlanSection::Workouts => remove_week(&mut user.workouts, &id)?,
                    }
                    touch(user, &now);
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(user_id, section = %section, week_id, "Plan week removed");
        Ok(())
    }
}
