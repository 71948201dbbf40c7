// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise reference queries and the generic health record collection.

use crate::db::{ExerciseCatalog, HealthRecordStore};
use crate::error::{AppError, Result};
use crate::models::{CatalogTag, Exercise, ExerciseFilter, HealthRecord, HealthRecordPatch, TagKind};
use crate::validation::require_fields;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use std::sync::Arc;

/// Body of `POST /api/health`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateRecordRequest {
    pub name: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

fn parse_record_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| AppError::BadRequest("invalid id".to_string()))
}

fn record_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Health record {} not found", id))
}

pub struct CatalogService {
    exercises: Arc<dyn ExerciseCatalog>,
    records: Arc<dyn HealthRecordStore>,
}

impl CatalogService {
    pub fn new(exercises: Arc<dyn ExerciseCatalog>, records: Arc<dyn HealthRecordStore>) -> Self {
        Self { exercises, records }
    }

    pub async fn list_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        self.exercises.list_exercises(filter).await
    }

    pub async fn get_exercise(&self, exercise_id: &str) -> Result<Exercise> {
        self.exercises
            .get_exercise(exercise_id)
            .await?
            .ok_or_else(|| AppError::NotFound("exercise not found".to_string()))
    }

    pub async fn list_tags(&self, kind: TagKind) -> Result<Vec<CatalogTag>> {
        self.exercises.list_tags(kind).await
    }

    // ─── Health Records ──────────────────────────────────────

    pub async fn list_records(&self) -> Result<Vec<HealthRecord>> {
        self.records.list_records().await
    }

    pub async fn create_record(&self, request: CreateRecordRequest) -> Result<HealthRecord> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        require_fields(&[
            ("name", present(&request.name)),
            ("status", present(&request.status)),
        ])?;

        let (Some(name), Some(status)) = (request.name, request.status) else {
            return Err(AppError::MissingFields(vec![
                "name".to_string(),
                "status".to_string(),
            ]));
        };

        let record = self
            .records
            .insert_record(name.trim(), status.trim(), request.notes.as_deref())
            .await?;
        tracing::info!(record_id = %record.id, "Health record created");
        Ok(record)
    }

    pub async fn get_record(&self, id: &str) -> Result<HealthRecord> {
        let oid = parse_record_id(id)?;
        self.records
            .get_record(&oid)
            .await?
            .ok_or_else(|| record_not_found(id))
    }

    pub async fn update_record(&self, id: &str, patch: HealthRecordPatch) -> Result<HealthRecord> {
        let oid = parse_record_id(id)?;
        if patch.is_empty() {
            return Err(AppError::BadRequest("No update data provided".to_string()));
        }
        let record = self
            .records
            .update_record(&oid, &patch)
            .await?
            .ok_or_else(|| record_not_found(id))?;
        tracing::info!(record_id = id, "Health record updated");
        Ok(record)
    }

    pub async fn delete_record(&self, id: &str) -> Result<()> {
        let oid = parse_record_id(id)?;
        if !self.records.delete_record(&oid).await? {
            return Err(record_not_found(id));
        }
        tracing::info!(record_id = id, "Health record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryCatalog;

    fn service() -> CatalogService {
        let catalog = Arc::new(MemoryCatalog::default());
        CatalogService::new(catalog.clone(), catalog)
    }

    #[tokio::test]
    async fn test_invalid_id_is_bad_request_not_server_error() {
        let service = service();
        assert!(matches!(
            service.get_record("not-an-object-id").await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service.delete_record(&ObjectId::new().to_hex()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_record_lifecycle() {
        let service = service();
        let created = service
            .create_record(CreateRecordRequest {
                name: Some("annual checkup".to_string()),
                status: Some("scheduled".to_string()),
                notes: None,
            })
            .await
            .unwrap();

        let updated = service
            .update_record(
                &created.id,
                HealthRecordPatch {
                    status: Some("done".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "annual checkup");
        assert_eq!(updated.status, "done");

        assert!(service
            .update_record(&created.id, HealthRecordPatch::default())
            .await
            .is_err());

        service.delete_record(&created.id).await.unwrap();
        assert!(service.list_records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_record_requires_name_and_status() {
        let err = service()
            .create_record(CreateRecordRequest {
                name: Some("x".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        match err {
            AppError::MissingFields(fields) => assert_eq!(fields, vec!["status"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
