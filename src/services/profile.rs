// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health and nutrition profile service.
//!
//! Both profiles are sub-documents of the user document. Request bodies are
//! raw JSON objects because numeric fields may arrive as strings.

use crate::db::{mutation, UserStore};
use crate::error::{AppError, Result};
use crate::models::{HealthProfile, NutritionProfile};
use crate::time_utils::now_rfc3339;
use crate::validation::{
    is_present, number_from_value, object_body, optional_string, optional_string_list,
    optional_u32, require_fields,
};
use serde_json::{Map, Value};
use std::sync::Arc;

const MAX_AGE: u32 = 150;

/// Validated health fields from a request body.
#[derive(Debug, Default)]
struct HealthFields {
    weight: Option<f64>,
    height: Option<f64>,
    age: Option<u32>,
    gender: Option<String>,
    activity_level: Option<String>,
    health_conditions: Option<Vec<String>>,
    fitness_goal: Option<String>,
}

impl HealthFields {
    /// Parse the recognized fields. `bmi` is derived and silently ignored.
    fn parse(body: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            weight: positive_number(body, "weight")?,
            height: positive_number(body, "height")?,
            age: optional_u32(body, "age", 0..=MAX_AGE)?,
            gender: optional_string(body, "gender")?,
            activity_level: optional_string(body, "activity_level")?,
            health_conditions: optional_string_list(body, "health_conditions")?,
            fitness_goal: optional_string(body, "fitness_goal")?,
        })
    }

    fn is_empty(&self) -> bool {
        self.weight.is_none()
            && self.height.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.activity_level.is_none()
            && self.health_conditions.is_none()
            && self.fitness_goal.is_none()
    }

    fn apply(&self, profile: &mut HealthProfile) {
        if let Some(weight) = self.weight {
            profile.weight = weight;
        }
        if let Some(height) = self.height {
            profile.height = height;
        }
        if let Some(age) = self.age {
            profile.age = age;
        }
        if let Some(gender) = &self.gender {
            profile.gender = Some(gender.clone());
        }
        if let Some(level) = &self.activity_level {
            profile.activity_level = Some(level.clone());
        }
        if let Some(conditions) = &self.health_conditions {
            profile.health_conditions = conditions.clone();
        }
        if let Some(goal) = &self.fitness_goal {
            profile.fitness_goal = Some(goal.clone());
        }
        if self.weight.is_some() || self.height.is_some() {
            profile.refresh_bmi();
        }
    }
}

fn positive_number(body: &Map<String, Value>, field: &str) -> Result<Option<f64>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let n = number_from_value(field, value)?;
            if n <= 0.0 {
                return Err(AppError::BadRequest(format!("'{field}' must be positive")));
            }
            Ok(Some(n))
        }
    }
}

/// Validated nutrition fields from a request body.
#[derive(Debug, Default)]
struct NutritionFields {
    allergies: Option<Vec<String>>,
    diet_type: Option<String>,
    calorie_goal: Option<u32>,
    protein_goal: Option<u32>,
    carb_goal: Option<u32>,
    fat_goal: Option<u32>,
    meals_per_day: Option<u32>,
    dietary_restrictions: Option<Vec<String>>,
    cuisine_preferences: Option<Vec<String>>,
}

impl NutritionFields {
    fn parse(body: &Map<String, Value>) -> Result<Self> {
        let diet_type = optional_string(body, "diet_type")?;
        if diet_type.as_deref().is_some_and(str::is_empty) {
            return Err(AppError::BadRequest(
                "'diet_type' must not be empty".to_string(),
            ));
        }

        Ok(Self {
            allergies: optional_string_list(body, "allergies")?,
            diet_type,
            calorie_goal: optional_u32(body, "calorie_goal", 0..=u32::MAX)?,
            protein_goal: optional_u32(body, "protein_goal", 0..=u32::MAX)?,
            carb_goal: optional_u32(body, "carb_goal", 0..=u32::MAX)?,
            fat_goal: optional_u32(body, "fat_goal", 0..=u32::MAX)?,
            meals_per_day: optional_u32(body, "meals_per_day", 1..=10)?,
            dietary_restrictions: optional_string_list(body, "dietary_restrictions")?,
            cuisine_preferences: optional_string_list(body, "cuisine_preferences")?,
        })
    }

    fn is_empty(&self) -> bool {
        self.allergies.is_none()
            && self.diet_type.is_none()
            && self.calorie_goal.is_none()
            && self.protein_goal.is_none()
            && self.carb_goal.is_none()
            && self.fat_goal.is_none()
            && self.meals_per_day.is_none()
            && self.dietary_restrictions.is_none()
            && self.cuisine_preferences.is_none()
    }

    fn apply(&self, profile: &mut NutritionProfile) {
        if let Some(allergies) = &self.allergies {
            profile.allergies = allergies.clone();
        }
        if let Some(diet_type) = &self.diet_type {
            profile.diet_type = diet_type.clone();
        }
        if let Some(goal) = self.calorie_goal {
            profile.calorie_goal = goal;
        }
        if let Some(goal) = self.protein_goal {
            profile.protein_goal = Some(goal);
        }
        if let Some(goal) = self.carb_goal {
            profile.carb_goal = Some(goal);
        }
        if let Some(goal) = self.fat_goal {
            profile.fat_goal = Some(goal);
        }
        if let Some(meals) = self.meals_per_day {
            profile.meals_per_day = meals;
        }
        if let Some(restrictions) = &self.dietary_restrictions {
            profile.dietary_restrictions = restrictions.clone();
        }
        if let Some(cuisines) = &self.cuisine_preferences {
            profile.cuisine_preferences = cuisines.clone();
        }
    }
}

fn no_update_data() -> AppError {
    AppError::BadRequest("No update data provided".to_string())
}

/// Health and nutrition profile operations.
pub struct ProfileService {
    users: Arc<dyn UserStore>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    // ─── Health ──────────────────────────────────────────────

    /// Create (or replace) the health profile.
    pub async fn create_health(&self, user_id: &str, body: &Value) -> Result<HealthProfile> {
        let body = object_body(body)?;
        require_fields(&[
            ("weight", is_present(body, "weight")),
            ("height", is_present(body, "height")),
            ("age", is_present(body, "age")),
        ])?;

        let fields = HealthFields::parse(body)?;
        let (Some(weight), Some(height), Some(age)) = (fields.weight, fields.height, fields.age)
        else {
            return Err(AppError::BadRequest(
                "Invalid weight, height or age values".to_string(),
            ));
        };

        let mut profile = HealthProfile {
            weight,
            height,
            age,
            gender: None,
            activity_level: None,
            health_conditions: Vec::new(),
            fitness_goal: None,
            bmi: None,
            updated_at: now_rfc3339(),
        };
        fields.apply(&mut profile);
        profile.refresh_bmi();

        let stored = profile.clone();
        self.users
            .update_user(
                user_id,
                mutation(move |user| {
                    user.health = Some(stored.clone());
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(user_id, bmi = ?profile.bmi, "Health profile created");
        Ok(profile)
    }

    pub async fn get_health(&self, user_id: &str) -> Result<HealthProfile> {
        let user = self
            .users
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        user.health
            .ok_or_else(|| AppError::NotFound("Health profile not found".to_string()))
    }

    /// Merge the supplied fields into the existing health profile.
    pub async fn update_health(&self, user_id: &str, body: &Value) -> Result<HealthProfile> {
        let fields = HealthFields::parse(object_body(body)?)?;
        if fields.is_empty() {
            return Err(no_update_data());
        }

        let now = now_rfc3339();
        let user = self
            .users
            .update_user(
                user_id,
                mutation(move |user| {
                    let profile = user.health.as_mut().ok_or_else(|| {
                        AppError::NotFound("Health profile not found".to_string())
                    })?;
                    fields.apply(profile);
                    profile.updated_at = now.clone();
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(user_id, "Health profile updated");
        user.health
            .ok_or_else(|| AppError::NotFound("Health profile not found".to_string()))
    }

    /// Remove the health profile. Succeeds when there is none.
    pub async fn delete_health(&self, user_id: &str) -> Result<()> {
        self.users
            .update_user(
                user_id,
                mutation(|user| {
                    user.health = None;
                    Ok(())
                }),
            )
            .await?;
        tracing::info!(user_id, "Health profile deleted");
        Ok(())
    }

    // ─── Nutrition ───────────────────────────────────────────

    /// Create (or replace) the nutrition profile, filling defaults.
    pub async fn create_nutrition(&self, user_id: &str, body: &Value) -> Result<NutritionProfile> {
        let fields = NutritionFields::parse(object_body(body)?)?;

        let mut profile = NutritionProfile {
            updated_at: now_rfc3339(),
            ..Default::default()
        };
        fields.apply(&mut profile);

        let stored = profile.clone();
        self.users
            .update_user(
                user_id,
                mutation(move |user| {
                    user.nutrition = Some(stored.clone());
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(user_id, "Nutrition profile created");
        Ok(profile)
    }

    pub async fn get_nutrition(&self, user_id: &str) -> Result<NutritionProfile> {
        let user = self
            .users
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        user.nutrition
            .ok_or_else(|| AppError::NotFound("Nutrition profile not found".to_string()))
    }

    pub async fn update_nutrition(&self, user_id: &str, body: &Value) -> Result<NutritionProfile> {
        let fields = NutritionFields::parse(object_body(body)?)?;
        if fields.is_empty() {
            return Err(no_update_data());
        }

        let now = now_rfc3339();
        let user = self
            .users
            .update_user(
                user_id,
                mutation(move |user| {
                    let profile = user.nutrition.as_mut().ok_or_else(|| {
                        AppError::NotFound("Nutrition profile not found".to_string())
                    })?;
                    fields.apply(profile);
                    profile.updated_at = now.clone();
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(user_id, "Nutrition profile updated");
        user.nutrition
            .ok_or_else(|| AppError::NotFound("Nutrition profile not found".to_string()))
    }

    pub async fn delete_nutrition(&self, user_id: &str) -> Result<()> {
        self.users
            .update_user(
                user_id,
                mutation(|user| {
                    user.nutrition = None;
                    Ok(())
                }),
            )
            .await?;
        tracing::info!(user_id, "Nutrition profile deleted");
        Ok(())
    }
}
