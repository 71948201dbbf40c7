// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutrition preferences sub-document.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DIET_TYPE: &str = "standard";
pub const DEFAULT_CALORIE_GOAL: u32 = 2000;
pub const DEFAULT_MEALS_PER_DAY: u32 = 3;

/// Nutrition profile stored under `users/{id}.nutrition`.
///
/// Independent of the health profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionProfile {
    #[serde(default)]
    pub allergies: Vec<String>,
    pub diet_type: String,
    pub calorie_goal: u32,
    #[serde(default)]
    pub protein_goal: Option<u32>,
    #[serde(default)]
    pub carb_goal: Option<u32>,
    #[serde(default)]
    pub fat_goal: Option<u32>,
    pub meals_per_day: u32,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub cuisine_preferences: Vec<String>,
    #[serde(default)]
    pub updated_at: String,
}

impl Default for NutritionProfile {
    fn default() -> Self {
        Self {
            allergies: Vec::new(),
            diet_type: DEFAULT_DIET_TYPE.to_string(),
            calorie_goal: DEFAULT_CALORIE_GOAL,
            protein_goal: None,
            carb_goal: None,
            fat_goal: None,
            meals_per_day: DEFAULT_MEALS_PER_DAY,
            dietary_restrictions: Vec::new(),
            cuisine_preferences: Vec::new(),
            updated_at: String::new(),
        }
    }
}
