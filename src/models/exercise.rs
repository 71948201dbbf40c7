// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise reference dataset and generic health records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An exercise from the reference dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub exercise_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gif_url: Option<String>,
    #[serde(default)]
    pub body_parts: Vec<String>,
    #[serde(default)]
    pub equipments: Vec<String>,
    #[serde(default)]
    pub target_muscles: Vec<String>,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tag filters for listing exercises. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseFilter {
    pub body_part: Option<String>,
    pub equipment: Option<String>,
    pub target_muscle: Option<String>,
}

impl ExerciseFilter {
    /// Build a filter, treating empty parameters as absent.
    pub fn new(
        body_part: Option<String>,
        equipment: Option<String>,
        target_muscle: Option<String>,
    ) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            body_part: present(body_part),
            equipment: present(equipment),
            target_muscle: present(target_muscle),
        }
    }

    /// Exact tag membership for every supplied filter.
    pub fn matches(&self, exercise: &Exercise) -> bool {
        let has = |wanted: &Option<String>, tags: &[String]| {
            wanted.as_ref().map_or(true, |w| tags.iter().any(|t| t == w))
        };
        has(&self.body_part, &exercise.body_parts)
            && has(&self.equipment, &exercise.equipments)
            && has(&self.target_muscle, &exercise.target_muscles)
    }
}

/// Entry of the `bodyParts`, `equipments` or `muscles` collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTag {
    pub name: String,
}

/// Which tag collection to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    BodyParts,
    Equipments,
    Muscles,
}

impl TagKind {
    /// Collection name; also the key used in list responses.
    pub fn collection(self) -> &'static str {
        match self {
            TagKind::BodyParts => "bodyParts",
            TagKind::Equipments => "equipments",
            TagKind::Muscles => "muscles",
        }
    }
}

/// A record of the generic `health` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: String,
    pub name: String,
    pub status: String,
    pub notes: Option<String>,
}

/// Partial update of a [`HealthRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthRecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HealthRecordPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.status.is_none() && self.notes.is_none()
    }

    pub fn apply(&self, record: &mut HealthRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(status) = &self.status {
            record.status = status.clone();
        }
        if let Some(notes) = &self.notes {
            record.notes = Some(notes.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn squat() -> Exercise {
        serde_json::from_value(json!({
            "exerciseId": "ex1",
            "name": "barbell squat",
            "bodyParts": ["upper legs"],
            "equipments": ["barbell"],
            "targetMuscles": ["quads"],
            "secondaryMuscles": ["glutes"],
            "instructions": ["Squat down"],
            "difficulty": "intermediate"
        }))
        .unwrap()
    }

    #[test]
    fn test_filters_are_anded() {
        let exercise = squat();
        assert!(ExerciseFilter::default().matches(&exercise));
        assert!(ExerciseFilter::new(Some("upper legs".into()), Some("barbell".into()), None)
            .matches(&exercise));
        assert!(!ExerciseFilter::new(Some("upper legs".into()), Some("dumbbell".into()), None)
            .matches(&exercise));
        assert!(!ExerciseFilter::new(None, None, Some("quad".into())).matches(&exercise));
    }

    #[test]
    fn test_empty_filter_params_are_ignored() {
        let filter = ExerciseFilter::new(Some(String::new()), None, Some(String::new()));
        assert_eq!(filter, ExerciseFilter::default());
    }

    #[test]
    fn test_exercise_keeps_unknown_fields() {
        let value = serde_json::to_value(squat()).unwrap();
        assert_eq!(value["exerciseId"], "ex1");
        assert_eq!(value["difficulty"], "intermediate");
        assert!(value.get("gifUrl").is_none());
    }

    #[test]
    fn test_patch_applies_present_fields_only() {
        let mut record = HealthRecord {
            id: "1".to_string(),
            name: "checkup".to_string(),
            status: "open".to_string(),
            notes: None,
        };
        let patch = HealthRecordPatch {
            status: Some("closed".to_string()),
            ..Default::default()
        };
        patch.apply(&mut record);
        assert_eq!(record.name, "checkup");
        assert_eq!(record.status, "closed");
        assert!(!patch.is_empty());
        assert!(HealthRecordPatch::default().is_empty());
    }
}
