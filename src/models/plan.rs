// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Diet and workout plan records.
//!
//! A plan is two independent ordered lists of weeks stored on the user
//! document (`diet` and `workouts`). Every week carries a stable `id` so
//! records are addressed by id rather than by array position. Fields the
//! service does not interpret are kept verbatim in `extra`.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Which parts of a plan to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Diet,
    Workout,
    Combined,
}

impl PlanType {
    pub fn includes_diet(self) -> bool {
        matches!(self, PlanType::Diet | PlanType::Combined)
    }

    pub fn includes_workouts(self) -> bool {
        matches!(self, PlanType::Workout | PlanType::Combined)
    }
}

impl FromStr for PlanType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "diet" => Ok(PlanType::Diet),
            "workout" => Ok(PlanType::Workout),
            "combined" => Ok(PlanType::Combined),
            _ => Err(AppError::BadRequest(
                "Invalid plan_type. Must be \"diet\", \"workout\", or \"combined\"".to_string(),
            )),
        }
    }
}

/// Lifecycle of the active plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Active,
    Paused,
    Completed,
}

/// Inputs the generator uses to shape a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPreferences {
    pub duration_weeks: u32,
    pub intensity: String,
    #[serde(default)]
    pub specific_goals: Vec<String>,
    #[serde(default)]
    pub available_equipment: Vec<String>,
    pub workout_days_per_week: u32,
    #[serde(default)]
    pub notes: String,
}

impl Default for PlanPreferences {
    fn default() -> Self {
        Self {
            duration_weeks: 4,
            intensity: "moderate".to_string(),
            specific_goals: Vec::new(),
            available_equipment: Vec::new(),
            workout_days_per_week: 5,
            notes: String::new(),
        }
    }
}

/// Plan metadata stored under `users/{id}.plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    pub plan_type: PlanType,
    pub status: PlanStatus,
    pub preferences: PlanPreferences,
    pub created_at: String,
    pub updated_at: String,
}

/// Completion record for one meal slot of a diet week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealCompletion {
    pub completed: bool,
    #[serde(default)]
    pub actual_meal: String,
    #[serde(default)]
    pub completed_at: String,
}

/// One week of the diet plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietWeek {
    #[serde(default)]
    pub id: String,
    pub week_name: String,
    #[serde(default)]
    pub meals: Vec<Value>,
    /// Meal type -> completion
    #[serde(default)]
    pub completion: BTreeMap<String, MealCompletion>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single scheduled session inside a workout week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedWorkout {
    pub workout_id: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// One week of the workout plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutWeek {
    #[serde(default)]
    pub id: String,
    pub week_name: String,
    #[serde(default)]
    pub workouts: Vec<PlannedWorkout>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkoutWeek {
    /// Find a session by its `workout_id`.
    pub fn workout_mut(&mut self, workout_id: &str) -> Option<&mut PlannedWorkout> {
        self.workouts.iter_mut().find(|w| w.workout_id == workout_id)
    }
}

/// Either list of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSection {
    Diet,
    Workouts,
}

impl PlanSection {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanSection::Diet => "diet",
            PlanSection::Workouts => "workouts",
        }
    }
}

impl fmt::Display for PlanSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanSection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "diet" => Ok(PlanSection::Diet),
            "workouts" => Ok(PlanSection::Workouts),
            _ => Err(AppError::NotFound(format!("Unknown plan section '{s}'"))),
        }
    }
}

/// Common access to the id and name of a plan week.
pub trait WeekRecord {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn week_name(&self) -> &str;
}

impl WeekRecord for DietWeek {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn week_name(&self) -> &str {
        &self.week_name
    }
}

impl WeekRecord for WorkoutWeek {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn week_name(&self) -> &str {
        &self.week_name
    }
}

/// Fresh opaque week identifier.
pub fn new_week_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Give every week without an id a fresh one and reject duplicate ids.
pub fn assign_week_ids<T: WeekRecord>(weeks: &mut [T]) -> Result<()> {
    let mut seen = HashSet::new();
    for week in weeks.iter_mut() {
        if week.id().trim().is_empty() {
            week.set_id(new_week_id());
        }
        if !seen.insert(week.id().to_string()) {
            return Err(AppError::BadRequest(format!(
                "Duplicate week id '{}'",
                week.id()
            )));
        }
    }
    Ok(())
}

/// Append a week, returning its (possibly newly assigned) id.
pub fn append_week<T: WeekRecord>(weeks: &mut Vec<T>, mut week: T) -> Result<String> {
    if week.id().trim().is_empty() {
        week.set_id(new_week_id());
    }
    if weeks.iter().any(|w| w.id() == week.id()) {
        return Err(AppError::Conflict(format!(
            "Week id '{}' already exists",
            week.id()
        )));
    }
    let id = week.id().to_string();
    weeks.push(week);
    Ok(id)
}

/// Replace the week with `week_id` in place; the stored id is kept.
pub fn replace_week<T: WeekRecord>(weeks: &mut [T], week_id: &str, mut week: T) -> Result<()> {
    let slot = weeks
        .iter_mut()
        .find(|w| w.id() == week_id)
        .ok_or_else(|| week_not_found(week_id))?;
    week.set_id(week_id.to_string());
    *slot = week;
    Ok(())
}

/// Remove the week with `week_id`.
pub fn remove_week<T: WeekRecord>(weeks: &mut Vec<T>, week_id: &str) -> Result<()> {
    let position = weeks
        .iter()
        .position(|w| w.id() == week_id)
        .ok_or_else(|| week_not_found(week_id))?;
    weeks.remove(position);
    Ok(())
}

/// First week with a matching name, in stored order.
pub fn find_week_by_name_mut<'a, T: WeekRecord>(
    weeks: &'a mut [T],
    week_name: &str,
) -> Option<&'a mut T> {
    weeks.iter_mut().find(|w| w.week_name() == week_name)
}

fn week_not_found(week_id: &str) -> AppError {
    AppError::NotFound(format!("Week {week_id} not found"))
}
