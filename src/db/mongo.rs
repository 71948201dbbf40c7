// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MongoDB catalog store: the exercise reference dataset and the generic
//! health record collection.

use crate::db::{collections, ExerciseCatalog, HealthRecordStore};
use crate::error::{AppError, Result};
use crate::models::{
    CatalogTag, Exercise, ExerciseFilter, HealthRecord, HealthRecordPatch, TagKind,
};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

/// Stored shape of a health record.
#[derive(Debug, Serialize, Deserialize)]
struct HealthRecordDoc {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl From<HealthRecordDoc> for HealthRecord {
    fn from(doc: HealthRecordDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            status: doc.status,
            notes: doc.notes,
        }
    }
}

fn db_error(e: mongodb::error::Error) -> AppError {
    AppError::Database(e.to_string())
}

/// MongoDB client for the catalog database.
#[derive(Clone)]
pub struct MongoCatalog {
    db: Database,
}

impl MongoCatalog {
    /// Connect to `uri` and use database `db_name`.
    ///
    /// The driver connects lazily; a bad URI fails here, an unreachable
    /// server fails on the first query.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| AppError::Database(format!("Failed to configure MongoDB: {}", e)))?;

        tracing::info!(database = db_name, "MongoDB catalog configured");

        Ok(Self {
            db: client.database(db_name),
        })
    }

    fn exercises(&self) -> Collection<Exercise> {
        self.db.collection(collections::EXERCISES)
    }

    fn records(&self) -> Collection<HealthRecordDoc> {
        self.db.collection(collections::HEALTH_RECORDS)
    }
}

/// Equality filter on the array fields; Mongo matches arrays by membership.
fn exercise_query(filter: &ExerciseFilter) -> Document {
    let mut query = Document::new();
    if let Some(body_part) = &filter.body_part {
        query.insert("bodyParts", body_part.as_str());
    }
    if let Some(equipment) = &filter.equipment {
        query.insert("equipments", equipment.as_str());
    }
    if let Some(target) = &filter.target_muscle {
        query.insert("targetMuscles", target.as_str());
    }
    query
}

#[async_trait]
impl ExerciseCatalog for MongoCatalog {
    async fn list_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        self.exercises()
            .find(exercise_query(filter))
            .projection(doc! { "_id": 0 })
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)
    }

    async fn get_exercise(&self, exercise_id: &str) -> Result<Option<Exercise>> {
        self.exercises()
            .find_one(doc! { "exerciseId": exercise_id })
            .projection(doc! { "_id": 0 })
            .await
            .map_err(db_error)
    }

    async fn list_tags(&self, kind: TagKind) -> Result<Vec<CatalogTag>> {
        self.db
            .collection::<CatalogTag>(kind.collection())
            .find(doc! {})
            .projection(doc! { "_id": 0 })
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)
    }
}

#[async_trait]
impl HealthRecordStore for MongoCatalog {
    async fn list_records(&self) -> Result<Vec<HealthRecord>> {
        let docs: Vec<HealthRecordDoc> = self
            .records()
            .find(doc! {})
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)?;
        Ok(docs.into_iter().map(HealthRecord::from).collect())
    }

    async fn insert_record(
        &self,
        name: &str,
        status: &str,
        notes: Option<&str>,
    ) -> Result<HealthRecord> {
        let record = HealthRecordDoc {
            id: ObjectId::new(),
            name: name.to_string(),
            status: status.to_string(),
            notes: notes.map(str::to_string),
        };
        self.records().insert_one(&record).await.map_err(db_error)?;
        Ok(record.into())
    }

    async fn get_record(&self, id: &ObjectId) -> Result<Option<HealthRecord>> {
        let found = self
            .records()
            .find_one(doc! { "_id": *id })
            .await
            .map_err(db_error)?;
        Ok(found.map(HealthRecord::from))
    }

    async fn update_record(
        &self,
        id: &ObjectId,
        patch: &HealthRecordPatch,
    ) -> Result<Option<HealthRecord>> {
        let changes = mongodb::bson::to_document(patch)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode patch: {e}")))?;

        let updated = self
            .records()
            .find_one_and_update(doc! { "_id": *id }, doc! { "$set": changes })
            .return_document(ReturnDocument::After)
            .await
            .map_err(db_error)?;
        Ok(updated.map(HealthRecord::from))
    }

    async fn delete_record(&self, id: &ObjectId) -> Result<bool> {
        let result = self
            .records()
            .delete_one(doc! { "_id": *id })
            .await
            .map_err(db_error)?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_query_omits_absent_filters() {
        assert!(exercise_query(&ExerciseFilter::default()).is_empty());

        let query = exercise_query(&ExerciseFilter::new(
            Some("chest".to_string()),
            None,
            Some("pectorals".to_string()),
        ));
        assert_eq!(query, doc! { "bodyParts": "chest", "targetMuscles": "pectorals" });
    }
}
