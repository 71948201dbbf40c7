// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily tracking service.
//!
//! Handles the date-keyed daily logs and completion marks on plan weeks.
//! Every write is one atomic read-modify-write of the user document, so
//! concurrent requests for the same user never drop each other's changes.

use crate::db::{mutation, UserStore};
use crate::error::{AppError, Result};
use crate::models::plan::find_week_by_name_mut;
use crate::models::tracking::recent_logs;
use crate::models::{
    DailyLog, DailyWorkout, DatedLog, MealCompletion, MealType, Mood, UserDocument, Wellness,
};
use crate::time_utils::now_rfc3339;
use crate::validation::{integer_from_value, number_from_value};
use serde_json::Value;
use std::sync::Arc;

/// Validated wellness input from raw request fields.
pub fn parse_wellness(
    sleep_hours: Option<&Value>,
    mood: Option<&str>,
    energy_level: Option<&Value>,
) -> Result<Wellness> {
    let sleep_hours = sleep_hours
        .filter(|v| !v.is_null())
        .map(|v| -> Result<f64> {
            let hours = number_from_value("sleep_hours", v)?;
            if !(0.0..=24.0).contains(&hours) {
                return Err(AppError::BadRequest(
                    "sleep_hours must be between 0 and 24".to_string(),
                ));
            }
            Ok(hours)
        })
        .transpose()?;

    let mood = mood.map(str::parse::<Mood>).transpose()?;

    let energy_level = energy_level
        .filter(|v| !v.is_null())
        .map(|v| -> Result<u8> {
            let energy = integer_from_value("energy_level", v)?;
            u8::try_from(energy)
                .ok()
                .filter(|e| (1..=5).contains(e))
                .ok_or_else(|| {
                    AppError::BadRequest("energy_level must be between 1 and 5".to_string())
                })
        })
        .transpose()?;

    Ok(Wellness {
        sleep_hours,
        mood,
        energy_level,
    })
}

/// Daily logging and plan completion operations.
pub struct TrackingService {
    users: Arc<dyn UserStore>,
}

impl TrackingService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    async fn load_user(&self, user_id: &str) -> Result<UserDocument> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// Replace the items of one meal slot for `date`.
    pub async fn log_daily_meal(
        &self,
        user_id: &str,
        date: &str,
        meal_type: MealType,
        items: Vec<Value>,
    ) -> Result<DailyLog> {
        let key = date.to_string();
        let user = self
            .users
            .update_user(
                user_id,
                mutation(move |user| {
                    user.daily_log_mut(&key).set_meal(meal_type, items.clone());
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(user_id, date, meal_type = meal_type.as_str(), "Meal logged");
        logged_day(user, date)
    }

    /// Replace the workout record for `date`.
    pub async fn log_daily_workout(
        &self,
        user_id: &str,
        date: &str,
        workout: DailyWorkout,
    ) -> Result<DailyLog> {
        let key = date.to_string();
        let user = self
            .users
            .update_user(
                user_id,
                mutation(move |user| {
                    user.daily_log_mut(&key).workout = Some(workout.clone());
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(user_id, date, "Workout logged");
        logged_day(user, date)
    }

    /// Add to, or with `set_total` overwrite, the water intake. Returns the
    /// new total in millilitres.
    pub async fn update_water_intake(
        &self,
        user_id: &str,
        date: &str,
        amount_ml: i64,
        set_total: bool,
    ) -> Result<i64> {
        if amount_ml < 0 {
            return Err(AppError::BadRequest(
                "amount_ml must not be negative".to_string(),
            ));
        }

        let key = date.to_string();
        let user = self
            .users
            .update_user(
                user_id,
                mutation(move |user| {
                    user.daily_log_mut(&key).apply_water(amount_ml, set_total);
                    Ok(())
                }),
            )
            .await?;

        let total = logged_day(user, date)?.water_ml;
        tracing::info!(user_id, date, amount_ml, set_total, total, "Water intake updated");
        Ok(total)
    }

    /// Merge already-validated wellness metrics into the log for `date`.
    pub async fn update_wellness(
        &self,
        user_id: &str,
        date: &str,
        update: Wellness,
    ) -> Result<Wellness> {
        if update.is_empty() {
            return Err(AppError::BadRequest(
                "Provide at least one of sleep_hours, mood, energy_level".to_string(),
            ));
        }

        let key = date.to_string();
        let user = self
            .users
            .update_user(
                user_id,
                mutation(move |user| {
                    user.daily_log_mut(&key).merge_wellness(&update);
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(user_id, date, "Wellness updated");
        logged_day(user, date)?
            .wellness
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Wellness missing after write")))
    }

    /// Mark a meal slot of the first diet week named `week_name` as eaten.
    pub async fn update_meal_completion(
        &self,
        user_id: &str,
        week_name: &str,
        meal_type: MealType,
        actual_meal: String,
    ) -> Result<MealCompletion> {
        let name = week_name.to_string();
        let completion = MealCompletion {
            completed: true,
            actual_meal,
            completed_at: now_rfc3339(),
        };

        let stored = completion.clone();
        self.users
            .update_user(
                user_id,
                mutation(move |user| {
                    let week = find_week_by_name_mut(&mut user.diet, &name)
                        .ok_or_else(|| week_not_found(&name))?;
                    week.completion
                        .insert(meal_type.as_str().to_string(), stored.clone());
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(
            user_id,
            week_name,
            meal_type = meal_type.as_str(),
            "Plan meal completed"
        );
        Ok(completion)
    }

    /// Set `completed` on one workout of the first workout week named
    /// `week_name`.
    pub async fn toggle_workout_status(
        &self,
        user_id: &str,
        week_name: &str,
        workout_id: &str,
        completed: bool,
    ) -> Result<()> {
        let name = week_name.to_string();
        let id = workout_id.to_string();
        self.users
            .update_user(
                user_id,
                mutation(move |user| {
                    let week = find_week_by_name_mut(&mut user.workouts, &name)
                        .ok_or_else(|| week_not_found(&name))?;
                    let workout = week.workout_mut(&id).ok_or_else(|| {
                        AppError::NotFound(format!("Workout {} not found in {}", id, name))
                    })?;
                    workout.completed = completed;
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(user_id, week_name, workout_id, completed, "Plan workout toggled");
        Ok(())
    }

    pub async fn get_daily_log(&self, user_id: &str, date: &str) -> Result<DailyLog> {
        let mut user = self.load_user(user_id).await?;
        user.daily_logs
            .remove(date)
            .ok_or_else(|| AppError::NotFound(format!("No log found for date: {}", date)))
    }

    /// Most recent `limit` daily logs, newest first.
    pub async fn get_tracking_history(&self, user_id: &str, limit: usize) -> Result<Vec<DatedLog>> {
        let user = self.load_user(user_id).await?;
        Ok(recent_logs(&user.daily_logs, limit))
    }
}

fn week_not_found(week_name: &str) -> AppError {
    AppError::NotFound(format!("Week '{}' not found", week_name))
}

fn logged_day(mut user: UserDocument, date: &str) -> Result<DailyLog> {
    user.daily_logs
        .remove(date)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Daily log {date} missing after write")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryUserStore;
    use crate::models::{PlanPreferences, PlannedWorkout, WorkoutWeek};
    use crate::services::generator::{PlanGenerator, StaticBaselineGenerator};
    use serde_json::json;

    const DAY: &str = "2024-01-15";

    async fn store_with_user() -> Arc<MemoryUserStore> {
        let users = Arc::new(MemoryUserStore::new());
        users
            .create_user(
                "u1",
                &UserDocument {
                    email: "a@b.com".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        users
    }

    #[tokio::test]
    async fn test_water_sequence() {
        let service = TrackingService::new(store_with_user().await);
        assert_eq!(service.update_water_intake("u1", DAY, 250, false).await.unwrap(), 250);
        assert_eq!(service.update_water_intake("u1", DAY, 100, false).await.unwrap(), 350);
        assert_eq!(service.update_water_intake("u1", DAY, 500, true).await.unwrap(), 500);
        assert!(service.update_water_intake("u1", DAY, -5, false).await.is_err());
    }

    #[tokio::test]
    async fn test_meal_log_creates_entry_lazily() {
        let service = TrackingService::new(store_with_user().await);
        assert!(matches!(
            service.get_daily_log("u1", DAY).await,
            Err(AppError::NotFound(_))
        ));

        let log = service
            .log_daily_meal("u1", DAY, MealType::Lunch, vec![json!({"name": "Soup"})])
            .await
            .unwrap();
        assert_eq!(log.water_ml, 0);
        assert!(log.workout.is_none());
        assert_eq!(log.meals["lunch"], vec![json!({"name": "Soup"})]);
    }

    #[test]
    fn test_parse_wellness_validation() {
        assert!(parse_wellness(None, None, Some(&json!(6))).is_err());
        assert!(parse_wellness(None, None, Some(&json!(0))).is_err());
        assert!(parse_wellness(Some(&json!(25)), None, None).is_err());
        assert!(parse_wellness(None, Some("excellent"), None).is_err());

        let wellness = parse_wellness(Some(&json!("7.5")), Some("good"), Some(&json!(4))).unwrap();
        assert_eq!(wellness.sleep_hours, Some(7.5));
        assert_eq!(wellness.mood, Some(Mood::Good));
        assert_eq!(wellness.energy_level, Some(4));
    }

    #[tokio::test]
    async fn test_toggle_workout_on_first_matching_week() {
        let users = store_with_user().await;
        let weeks = StaticBaselineGenerator
            .workout_plan(&UserDocument::default(), &PlanPreferences::default())
            .await
            .unwrap();
        let mut duplicate = weeks[0].clone();
        duplicate.id = "dup".to_string();
        users
            .update_user(
                "u1",
                mutation(move |user| {
                    user.workouts = weeks.clone();
                    user.workouts.push(duplicate.clone());
                    Ok(())
                }),
            )
            .await
            .unwrap();

        let service = TrackingService::new(users.clone());
        service
            .toggle_workout_status("u1", "Week 1", "week1-monday", true)
            .await
            .unwrap();

        let user = users.get_user("u1").await.unwrap().unwrap();
        let find = |week: &WorkoutWeek| -> PlannedWorkout {
            week.workouts
                .iter()
                .find(|w| w.workout_id == "week1-monday")
                .cloned()
                .unwrap()
        };
        assert!(find(&user.workouts[0]).completed);
        assert!(!find(user.workouts.last().unwrap()).completed);

        assert!(matches!(
            service
                .toggle_workout_status("u1", "Week 1", "week1-funday", true)
                .await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service
                .toggle_workout_status("u1", "Week 99", "week1-monday", true)
                .await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_meal_completion_requires_week() {
        let service = TrackingService::new(store_with_user().await);
        assert!(matches!(
            service
                .update_meal_completion("u1", "Week 1", MealType::Dinner, String::new())
                .await,
            Err(AppError::NotFound(_))
        ));
    }
}
