// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process stores for tests and local development.

use crate::db::{email_key, ExerciseCatalog, HealthRecordStore, UserMutation, UserStore};
use crate::error::{AppError, Result};
use crate::models::{
    CatalogTag, Exercise, ExerciseFilter, HealthRecord, HealthRecordPatch, TagKind, UserDocument,
};
use anyhow::Context;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;
use serde::de::DeserializeOwned;
use std::path::Path;

/// User documents in a [`DashMap`].
///
/// A mutation runs while holding the shard lock for its key, which gives the
/// same per-user atomicity as a Firestore transaction.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<String, UserDocument>,
    /// Encoded email -> user id
    emails: DashMap<String, String>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserDocument>> {
        Ok(self.users.get(user_id).map(|u| u.value().clone()))
    }

    async fn create_user(&self, user_id: &str, user: &UserDocument) -> Result<()> {
        match self.emails.entry(email_key(&user.email)) {
            Entry::Occupied(_) => Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            )),
            Entry::Vacant(slot) => {
                self.users.insert(user_id.to_string(), user.clone());
                slot.insert(user_id.to_string());
                Ok(())
            }
        }
    }

    async fn update_user(&self, user_id: &str, mutation: UserMutation) -> Result<UserDocument> {
        let mut entry = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        // Work on a copy so a failing mutation leaves the stored document intact.
        let mut draft = entry.value().clone();
        mutation(&mut draft)?;
        *entry.value_mut() = draft.clone();
        Ok(draft)
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool> {
        let Some((_, user)) = self.users.remove(user_id) else {
            return Ok(false);
        };
        self.emails
            .remove_if(&email_key(&user.email), |_, owner| owner == user_id);
        Ok(true)
    }
}

/// Exercise catalog and health records held in memory.
#[derive(Default)]
pub struct MemoryCatalog {
    exercises: Vec<Exercise>,
    body_parts: Vec<CatalogTag>,
    equipments: Vec<CatalogTag>,
    muscles: Vec<CatalogTag>,
    records: DashMap<String, HealthRecord>,
}

impl MemoryCatalog {
    pub fn new(
        exercises: Vec<Exercise>,
        body_parts: Vec<CatalogTag>,
        equipments: Vec<CatalogTag>,
        muscles: Vec<CatalogTag>,
    ) -> Self {
        Self {
            exercises,
            body_parts,
            equipments,
            muscles,
            records: DashMap::new(),
        }
    }

    /// Load the dataset files (`exercises.json`, `bodyParts.json`,
    /// `equipments.json`, `muscles.json`) from a directory.
    pub async fn load_dir(dir: &Path) -> Result<Self> {
        let catalog = Self::new(
            read_json_array(&dir.join("exercises.json")).await?,
            read_json_array(&dir.join("bodyParts.json")).await?,
            read_json_array(&dir.join("equipments.json")).await?,
            read_json_array(&dir.join("muscles.json")).await?,
        );

        tracing::info!(
            dir = %dir.display(),
            exercises = catalog.exercises.len(),
            "Loaded exercise dataset"
        );
        Ok(catalog)
    }
}

async fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let items = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(items)
}

#[async_trait]
impl ExerciseCatalog for MemoryCatalog {
    async fn list_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        Ok(self
            .exercises
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn get_exercise(&self, exercise_id: &str) -> Result<Option<Exercise>> {
        Ok(self
            .exercises
            .iter()
            .find(|e| e.exercise_id == exercise_id)
            .cloned())
    }

    async fn list_tags(&self, kind: TagKind) -> Result<Vec<CatalogTag>> {
        let tags = match kind {
            TagKind::BodyParts => &self.body_parts,
            TagKind::Equipments => &self.equipments,
            TagKind::Muscles => &self.muscles,
        };
        Ok(tags.clone())
    }
}

#[async_trait]
impl HealthRecordStore for MemoryCatalog {
    async fn list_records(&self) -> Result<Vec<HealthRecord>> {
        let mut records: Vec<HealthRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        // ObjectIds start with a timestamp, so hex order is insertion order.
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    async fn insert_record(
        &self,
        name: &str,
        status: &str,
        notes: Option<&str>,
    ) -> Result<HealthRecord> {
        let record = HealthRecord {
            id: ObjectId::new().to_hex(),
            name: name.to_string(),
            status: status.to_string(),
            notes: notes.map(str::to_string),
        };
        self.records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_record(&self, id: &ObjectId) -> Result<Option<HealthRecord>> {
        Ok(self.records.get(&id.to_hex()).map(|r| r.value().clone()))
    }

    async fn update_record(
        &self,
        id: &ObjectId,
        patch: &HealthRecordPatch,
    ) -> Result<Option<HealthRecord>> {
        Ok(self.records.get_mut(&id.to_hex()).map(|mut r| {
            patch.apply(r.value_mut());
            r.value().clone()
        }))
    }

    async fn delete_record(&self, id: &ObjectId) -> Result<bool> {
        Ok(self.records.remove(&id.to_hex()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mutation;
    use std::sync::Arc;

    fn user(email: &str) -> UserDocument {
        UserDocument {
            email: email.to_string(),
            username: "tester".to_string(),
            password_hash: "hash".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_email_reservation_is_unique() {
        let store = MemoryUserStore::new();
        store.create_user("u1", &user("a@b.com")).await.unwrap();

        let err = store.create_user("u2", &user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(store.get_user("u2").await.unwrap().is_none());

        // Deleting releases the email.
        assert!(store.delete_user("u1").await.unwrap());
        store.create_user("u3", &user("a@b.com")).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_mutation_writes_nothing() {
        let store = MemoryUserStore::new();
        store.create_user("u1", &user("a@b.com")).await.unwrap();

        let result = store
            .update_user(
                "u1",
                mutation(|u| {
                    u.username = "changed".to_string();
                    Err(AppError::BadRequest("nope".to_string()))
                }),
            )
            .await;

        assert!(result.is_err());
        let stored = store.get_user("u1").await.unwrap().unwrap();
        assert_eq!(stored.username, "tester");
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let store = MemoryUserStore::new();
        let err = store
            .update_user("ghost", mutation(|_| Ok(())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_concurrent_water_updates_are_not_lost() {
        let store = Arc::new(MemoryUserStore::new());
        store.create_user("u1", &user("a@b.com")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update_user(
                        "u1",
                        mutation(|u| {
                            u.daily_log_mut("2024-01-15").apply_water(50, false);
                            Ok(())
                        }),
                    )
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = store.get_user("u1").await.unwrap().unwrap();
        assert_eq!(stored.daily_logs["2024-01-15"].water_ml, 1000);
    }

    #[tokio::test]
    async fn test_load_dir_reads_dataset_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("exercises.json"),
            r#"[{"exerciseId": "ex1", "name": "push up", "bodyParts": ["chest"],
                 "equipments": ["body weight"], "targetMuscles": ["pectorals"]}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("bodyParts.json"), r#"[{"name": "chest"}]"#).unwrap();
        std::fs::write(dir.path().join("equipments.json"), r#"[{"name": "body weight"}]"#)
            .unwrap();
        std::fs::write(dir.path().join("muscles.json"), "[]").unwrap();

        let catalog = MemoryCatalog::load_dir(dir.path()).await.unwrap();
        assert_eq!(catalog.get_exercise("ex1").await.unwrap().unwrap().name, "push up");
        assert_eq!(catalog.list_tags(TagKind::BodyParts).await.unwrap().len(), 1);
        assert!(catalog.list_tags(TagKind::Muscles).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_dir_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MemoryCatalog::load_dir(dir.path()).await.is_err());
    }
}
