// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Date-keyed daily logs.
//!
//! Logs live in `users/{id}.dailyLogs` keyed by `YYYY-MM-DD`. An entry is
//! created lazily on the first write for its date and is never deleted.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Meal slots accepted by the daily log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snacks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snacks => "snacks",
        }
    }
}

impl FromStr for MealType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        MealType::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                AppError::BadRequest(
                    "Invalid meal_type. Must be one of: breakfast, lunch, dinner, snacks"
                        .to_string(),
                )
            })
    }
}

/// Self-reported mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Bad,
    Terrible,
}

impl FromStr for Mood {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "great" => Ok(Mood::Great),
            "good" => Ok(Mood::Good),
            "okay" => Ok(Mood::Okay),
            "bad" => Ok(Mood::Bad),
            "terrible" => Ok(Mood::Terrible),
            _ => Err(AppError::BadRequest(
                "Invalid mood. Must be one of: great, good, okay, bad, terrible".to_string(),
            )),
        }
    }
}

/// Workout actually performed on a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWorkout {
    pub completed: bool,
    #[serde(default)]
    pub exercises: Vec<Value>,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub notes: String,
}

/// Sleep, mood and energy for a day. Each field is written independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wellness {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<u8>,
}

impl Wellness {
    /// Overwrite only the fields present in `update`.
    pub fn merge(&mut self, update: &Wellness) {
        if let Some(sleep) = update.sleep_hours {
            self.sleep_hours = Some(sleep);
        }
        if let Some(mood) = update.mood {
            self.mood = Some(mood);
        }
        if let Some(energy) = update.energy_level {
            self.energy_level = Some(energy);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sleep_hours.is_none() && self.mood.is_none() && self.energy_level.is_none()
    }
}

/// One day of tracking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    /// Meal type -> items eaten
    #[serde(default)]
    pub meals: BTreeMap<String, Vec<Value>>,
    #[serde(default)]
    pub workout: Option<DailyWorkout>,
    #[serde(default)]
    pub water_ml: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wellness: Option<Wellness>,
}

impl DailyLog {
    /// Replace the items of one meal slot.
    pub fn set_meal(&mut self, meal_type: MealType, items: Vec<Value>) {
        self.meals.insert(meal_type.as_str().to_string(), items);
    }

    /// Add to (or, with `set_total`, overwrite) the water intake.
    /// Returns the new total.
    pub fn apply_water(&mut self, amount_ml: i64, set_total: bool) -> i64 {
        self.water_ml = if set_total {
            amount_ml
        } else {
            self.water_ml.saturating_add(amount_ml)
        };
        self.water_ml
    }

    /// Merge wellness metrics, returning the stored result.
    pub fn merge_wellness(&mut self, update: &Wellness) -> Wellness {
        let wellness = self.wellness.get_or_insert_with(Wellness::default);
        wellness.merge(update);
        wellness.clone()
    }
}

/// A daily log together with its date, as returned by the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedLog {
    pub date: String,
    #[serde(flatten)]
    pub log: DailyLog,
}

/// Most recent `limit` logs, newest first.
///
/// `YYYY-MM-DD` keys sort lexicographically in date order, so map order is
/// chronological order.
pub fn recent_logs(logs: &BTreeMap<String, DailyLog>, limit: usize) -> Vec<DatedLog> {
    logs.iter()
        .rev()
        .take(limit)
        .map(|(date, log)| DatedLog {
            date: date.clone(),
            log: log.clone(),
        })
        .collect()
}
