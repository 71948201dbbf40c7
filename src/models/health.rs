// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health profile sub-document and BMI derivation.

use serde::{Deserialize, Serialize};

/// Health profile stored under `users/{id}.health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    /// Body weight in kilograms
    pub weight: f64,
    /// Height in centimetres
    pub height: f64,
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub health_conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_goal: Option<String>,
    /// Derived from weight and height; never written by clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub updated_at: String,
}

impl HealthProfile {
    /// Recompute `bmi` from the current weight and height.
    pub fn refresh_bmi(&mut self) {
        self.bmi = compute_bmi(self.weight, self.height);
    }
}

/// Body-mass index for a weight in kg and a height in cm, rounded to two
/// decimals. `None` when the height does not allow a division.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !weight_kg.is_finite() || !height_cm.is_finite() || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 100.0).round() / 100.0)
}
