// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily tracking routes.
//!
//! The meal and workout endpoints serve two purposes: with `week_name` (and
//! for workouts `workout_id`) they mark plan items complete, otherwise they
//! write the daily log for `date` (default: today, UTC).

use crate::error::{AppError, Result};
use crate::models::{DailyLog, DailyWorkout, DatedLog, MealCompletion, MealType, Wellness};
use crate::routes::extract::JsonBody;
use crate::services::tracking::parse_wellness;
use crate::validation::{date_or_today, integer_from_value, parse_history_limit, require_fields};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{user_id}/tracking/meals", post(track_meal))
        .route("/users/{user_id}/tracking/workout", post(track_workout))
        .route("/users/{user_id}/tracking/water", post(track_water))
        .route("/users/{user_id}/tracking/wellness", post(track_wellness))
        .route("/users/{user_id}/tracking/daily", get(get_daily_log))
        .route("/users/{user_id}/tracking/history", get(get_history))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// ─── Meals ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MealRequest {
    pub date: Option<String>,
    pub meal_type: Option<String>,
    #[serde(default)]
    pub items: Vec<Value>,
    pub week_name: Option<String>,
    pub actual_meal: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum MealResponse {
    Logged {
        message: String,
        date: String,
        daily_log: DailyLog,
    },
    Completed {
        message: String,
        week_name: String,
        meal_type: String,
        completion: MealCompletion,
    },
}

async fn track_meal(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    JsonBody(request): JsonBody<MealRequest>,
) -> Result<Json<MealResponse>> {
    let meal_type: MealType = request.meal_type.as_deref().unwrap_or_default().parse()?;

    if let Some(week_name) = non_empty(request.week_name) {
        let completion = state
            .tracking
            .update_meal_completion(
                &user_id,
                &week_name,
                meal_type,
                request.actual_meal.unwrap_or_default(),
            )
            .await?;
        return Ok(Json(MealResponse::Completed {
            message: "Meal completion updated".to_string(),
            week_name,
            meal_type: meal_type.as_str().to_string(),
            completion,
        }));
    }

    let date = date_or_today(request.date.as_deref())?;
    let daily_log = state
        .tracking
        .log_daily_meal(&user_id, &date, meal_type, request.items)
        .await?;
    Ok(Json(MealResponse::Logged {
        message: "Meal logged successfully".to_string(),
        date,
        daily_log,
    }))
}

// ─── Workouts ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WorkoutRequest {
    pub date: Option<String>,
    pub completed: Option<bool>,
    pub exercises: Option<Vec<Value>>,
    pub duration_minutes: Option<Value>,
    pub notes: Option<String>,
    pub week_name: Option<String>,
    pub workout_id: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum WorkoutResponse {
    Logged {
        message: String,
        date: String,
        daily_log: DailyLog,
    },
    Toggled {
        message: String,
        week_name: String,
        workout_id: String,
        completed: bool,
    },
}

fn duration_minutes(value: Option<&Value>) -> Result<u32> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(v) => {
            let minutes = integer_from_value("duration_minutes", v)?;
            u32::try_from(minutes).map_err(|_| {
                AppError::BadRequest("duration_minutes must not be negative".to_string())
            })
        }
    }
}

async fn track_workout(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    JsonBody(request): JsonBody<WorkoutRequest>,
) -> Result<Json<WorkoutResponse>> {
    let completed = request.completed.unwrap_or(true);

    if let (Some(week_name), Some(workout_id)) = (
        non_empty(request.week_name.clone()),
        non_empty(request.workout_id.clone()),
    ) {
        state
            .tracking
            .toggle_workout_status(&user_id, &week_name, &workout_id, completed)
            .await?;
        return Ok(Json(WorkoutResponse::Toggled {
            message: "Workout status updated".to_string(),
            week_name,
            workout_id,
            completed,
        }));
    }

    let date = date_or_today(request.date.as_deref())?;
    let workout = DailyWorkout {
        completed,
        exercises: request.exercises.unwrap_or_default(),
        duration_minutes: duration_minutes(request.duration_minutes.as_ref())?,
        notes: request.notes.unwrap_or_default(),
    };
    let daily_log = state
        .tracking
        .log_daily_workout(&user_id, &date, workout)
        .await?;
    Ok(Json(WorkoutResponse::Logged {
        message: "Workout logged successfully".to_string(),
        date,
        daily_log,
    }))
}

// ─── Water & Wellness ────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WaterRequest {
    pub date: Option<String>,
    pub amount_ml: Option<Value>,
    #[serde(default)]
    pub set_total: bool,
}

#[derive(Serialize)]
pub struct WaterResponse {
    pub message: String,
    pub date: String,
    pub water_intake_ml: i64,
}

async fn track_water(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    JsonBody(request): JsonBody<WaterRequest>,
) -> Result<Json<WaterResponse>> {
    let amount = request.amount_ml.filter(|v| !v.is_null());
    require_fields(&[("amount_ml", amount.is_some())])?;
    let amount_ml = match &amount {
        Some(v) => integer_from_value("amount_ml", v)?,
        None => 0,
    };

    let date = date_or_today(request.date.as_deref())?;
    let total = state
        .tracking
        .update_water_intake(&user_id, &date, amount_ml, request.set_total)
        .await?;

    Ok(Json(WaterResponse {
        message: "Water intake updated".to_string(),
        date,
        water_intake_ml: total,
    }))
}

#[derive(Debug, Deserialize)]
pub struct WellnessRequest {
    pub date: Option<String>,
    pub sleep_hours: Option<Value>,
    pub mood: Option<String>,
    pub energy_level: Option<Value>,
}

#[derive(Serialize)]
pub struct WellnessResponse {
    pub message: String,
    pub date: String,
    pub wellness: Wellness,
}

async fn track_wellness(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    JsonBody(request): JsonBody<WellnessRequest>,
) -> Result<Json<WellnessResponse>> {
    // Validate every field before anything is written.
    let update = parse_wellness(
        request.sleep_hours.as_ref(),
        request.mood.as_deref(),
        request.energy_level.as_ref(),
    )?;
    let date = date_or_today(request.date.as_deref())?;

    let wellness = state
        .tracking
        .update_wellness(&user_id, &date, update)
        .await?;
    Ok(Json(WellnessResponse {
        message: "Wellness metrics updated".to_string(),
        date,
        wellness,
    }))
}

// ─── Reads ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct DailyLogResponse {
    pub date: String,
    pub daily_log: DailyLog,
}

async fn get_daily_log(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailyLogResponse>> {
    let date = date_or_today(query.date.as_deref())?;
    let daily_log = state.tracking.get_daily_log(&user_id, &date).await?;
    Ok(Json(DailyLogResponse { date, daily_log }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub daily_logs: Vec<DatedLog>,
    pub total: usize,
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>> {
    let limit = parse_history_limit(query.limit.as_deref())?;
    let daily_logs = state.tracking.get_tracking_history(&user_id, limit).await?;
    Ok(Json(HistoryResponse {
        total: daily_logs.len(),
        daily_logs,
    }))
}
