// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan generation strategies.
//!
//! The plan service asks a [`PlanGenerator`] for the weeks of a new plan.
//! [`StaticBaselineGenerator`] returns the same canned weeks for everyone;
//! a personalized planner plugs in behind the same trait.

use crate::error::Result;
use crate::models::{DietWeek, PlanPreferences, PlannedWorkout, UserDocument, WorkoutWeek};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Source of newly generated plan weeks.
///
/// Weeks are returned without ids; the plan service assigns them.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn diet_plan(
        &self,
        user: &UserDocument,
        preferences: &PlanPreferences,
    ) -> Result<Vec<DietWeek>>;

    async fn workout_plan(
        &self,
        user: &UserDocument,
        preferences: &PlanPreferences,
    ) -> Result<Vec<WorkoutWeek>>;
}

struct CannedMeal {
    meal_type: &'static str,
    name: &'static str,
    calories: u32,
    protein: u32,
    carbs: u32,
    fat: u32,
    ingredients: &'static [&'static str],
    instructions: &'static str,
}

const BASELINE_MEALS: [CannedMeal; 4] = [
    CannedMeal {
        meal_type: "breakfast",
        name: "Oatmeal with Berries",
        calories: 350,
        protein: 12,
        carbs: 60,
        fat: 8,
        ingredients: &["oats", "mixed berries", "honey", "almonds"],
        instructions: "Cook oats, top with berries and almonds",
    },
    CannedMeal {
        meal_type: "lunch",
        name: "Grilled Chicken Salad",
        calories: 450,
        protein: 35,
        carbs: 25,
        fat: 20,
        ingredients: &["chicken breast", "mixed greens", "olive oil", "vegetables"],
        instructions: "Grill chicken, serve over mixed greens",
    },
    CannedMeal {
        meal_type: "dinner",
        name: "Salmon with Vegetables",
        calories: 500,
        protein: 40,
        carbs: 30,
        fat: 22,
        ingredients: &["salmon fillet", "broccoli", "brown rice", "lemon"],
        instructions: "Bake salmon, serve with steamed vegetables and rice",
    },
    CannedMeal {
        meal_type: "snacks",
        name: "Greek Yogurt with Nuts",
        calories: 200,
        protein: 15,
        carbs: 15,
        fat: 10,
        ingredients: &["greek yogurt", "walnuts", "honey"],
        instructions: "Mix yogurt with nuts and drizzle honey",
    },
];

struct CannedSession {
    day: &'static str,
    focus: &'static str,
    exercises: Value,
    duration_minutes: u32,
    calories_burn_estimate: u32,
}

fn baseline_sessions() -> Vec<CannedSession> {
    vec![
        CannedSession {
            day: "Monday",
            focus: "Upper Body",
            exercises: json!([
                {"name": "Push-ups", "sets": 3, "reps": 12, "rest_seconds": 60},
                {"name": "Dumbbell Rows", "sets": 3, "reps": 10, "rest_seconds": 60},
                {"name": "Shoulder Press", "sets": 3, "reps": 10, "rest_seconds": 60},
                {"name": "Bicep Curls", "sets": 3, "reps": 12, "rest_seconds": 45}
            ]),
            duration_minutes: 45,
            calories_burn_estimate: 300,
        },
        CannedSession {
            day: "Tuesday",
            focus: "Lower Body",
            exercises: json!([
                {"name": "Squats", "sets": 4, "reps": 12, "rest_seconds": 60},
                {"name": "Lunges", "sets": 3, "reps": 10, "rest_seconds": 60},
                {"name": "Deadlifts", "sets": 3, "reps": 8, "rest_seconds": 90},
                {"name": "Calf Raises", "sets": 3, "reps": 15, "rest_seconds": 45}
            ]),
            duration_minutes: 50,
            calories_burn_estimate: 350,
        },
        CannedSession {
            day: "Wednesday",
            focus: "Rest/Active Recovery",
            exercises: json!([
                {"name": "Light Walking", "duration_minutes": 30},
                {"name": "Stretching", "duration_minutes": 15}
            ]),
            duration_minutes: 45,
            calories_burn_estimate: 150,
        },
        CannedSession {
            day: "Thursday",
            focus: "Core & Cardio",
            exercises: json!([
                {"name": "Planks", "sets": 3, "duration_seconds": 45},
                {"name": "Mountain Climbers", "sets": 3, "reps": 20, "rest_seconds": 45},
                {"name": "Russian Twists", "sets": 3, "reps": 20, "rest_seconds": 45},
                {"name": "HIIT Intervals", "sets": 5, "duration_seconds": 30, "rest_seconds": 30}
            ]),
            duration_minutes: 40,
            calories_burn_estimate: 400,
        },
        CannedSession {
            day: "Friday",
            focus: "Full Body",
            exercises: json!([
                {"name": "Burpees", "sets": 3, "reps": 10, "rest_seconds": 60},
                {"name": "Pull-ups", "sets": 3, "reps": 8, "rest_seconds": 60},
                {"name": "Goblet Squats", "sets": 3, "reps": 12, "rest_seconds": 60},
                {"name": "Dips", "sets": 3, "reps": 10, "rest_seconds": 60}
            ]),
            duration_minutes: 50,
            calories_burn_estimate: 380,
        },
        CannedSession {
            day: "Saturday",
            focus: "Cardio",
            exercises: json!([
                {"name": "Running/Jogging", "duration_minutes": 30},
                {"name": "Cycling", "duration_minutes": 20}
            ]),
            duration_minutes: 50,
            calories_burn_estimate: 450,
        },
        CannedSession {
            day: "Sunday",
            focus: "Rest",
            exercises: json!([]),
            duration_minutes: 0,
            calories_burn_estimate: 0,
        },
    ]
}

/// Deterministic placeholder planner: the same week repeated
/// `duration_weeks` times.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticBaselineGenerator;

impl StaticBaselineGenerator {
    fn diet_week(week_number: u32) -> DietWeek {
        let meals = BASELINE_MEALS
            .iter()
            .map(|m| {
                json!({
                    "meal_type": m.meal_type,
                    "name": m.name,
                    "calories": m.calories,
                    "protein": m.protein,
                    "carbs": m.carbs,
                    "fat": m.fat,
                    "ingredients": m.ingredients,
                    "instructions": m.instructions,
                })
            })
            .collect();

        let sum = |f: fn(&CannedMeal) -> u32| BASELINE_MEALS.iter().map(f).sum::<u32>();
        let mut extra = Map::new();
        extra.insert(
            "daily_totals".to_string(),
            json!({
                "calories": sum(|m| m.calories),
                "protein": sum(|m| m.protein),
                "carbs": sum(|m| m.carbs),
                "fat": sum(|m| m.fat),
            }),
        );

        DietWeek {
            id: String::new(),
            week_name: format!("Week {week_number}"),
            meals,
            completion: BTreeMap::new(),
            extra,
        }
    }

    fn workout_week(week_number: u32) -> WorkoutWeek {
        let sessions = baseline_sessions();

        let total_duration: u32 = sessions.iter().map(|s| s.duration_minutes).sum();
        let total_calories: u32 = sessions.iter().map(|s| s.calories_burn_estimate).sum();
        let workout_days = sessions.iter().filter(|s| s.duration_minutes > 0).count();
        let rest_days = sessions.len() - workout_days;

        let workouts = sessions
            .into_iter()
            .map(|s| {
                let mut details = Map::new();
                details.insert("day".to_string(), json!(s.day));
                details.insert("focus".to_string(), json!(s.focus));
                details.insert("exercises".to_string(), s.exercises);
                details.insert("duration_minutes".to_string(), json!(s.duration_minutes));
                details.insert(
                    "calories_burn_estimate".to_string(),
                    json!(s.calories_burn_estimate),
                );
                PlannedWorkout {
                    workout_id: format!("week{}-{}", week_number, s.day.to_lowercase()),
                    completed: false,
                    details,
                }
            })
            .collect();

        let mut extra = Map::new();
        extra.insert(
            "weekly_totals".to_string(),
            json!({
                "total_duration_minutes": total_duration,
                "total_calories_burn": total_calories,
                "workout_days": workout_days,
                "rest_days": rest_days,
            }),
        );

        WorkoutWeek {
            id: String::new(),
            week_name: format!("Week {week_number}"),
            workouts,
            extra,
        }
    }
}

#[async_trait]
impl PlanGenerator for StaticBaselineGenerator {
    async fn diet_plan(
        &self,
        _user: &UserDocument,
        preferences: &PlanPreferences,
    ) -> Result<Vec<DietWeek>> {
        Ok((1..=preferences.duration_weeks).map(Self::diet_week).collect())
    }

    async fn workout_plan(
        &self,
        _user: &UserDocument,
        preferences: &PlanPreferences,
    ) -> Result<Vec<WorkoutWeek>> {
        Ok((1..=preferences.duration_weeks)
            .map(Self::workout_week)
            .collect())
    }
}
