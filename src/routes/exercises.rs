// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise reference dataset and health record routes.

use crate::error::Result;
use crate::models::{Exercise, ExerciseFilter, HealthRecord, HealthRecordPatch, TagKind};
use crate::routes::extract::JsonBody;
use crate::services::catalog::CreateRecordRequest;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/exercises", get(list_exercises))
        .route("/api/exercises/{exercise_id}", get(get_exercise))
        .route("/api/bodyParts", get(list_body_parts))
        .route("/api/equipments", get(list_equipments))
        .route("/api/muscles", get(list_muscles))
        .route("/api/health", get(list_records).post(create_record))
        .route(
            "/api/health/{record_id}",
            get(get_record).put(update_record).delete(delete_record),
        )
}

// ─── Exercises ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseQuery {
    pub body_part: Option<String>,
    pub equipment: Option<String>,
    pub target_muscle: Option<String>,
}

#[derive(Serialize)]
pub struct ExercisesResponse {
    pub count: usize,
    pub exercises: Vec<Exercise>,
}

async fn list_exercises(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExerciseQuery>,
) -> Result<Json<ExercisesResponse>> {
    let filter = ExerciseFilter::new(query.body_part, query.equipment, query.target_muscle);
    let exercises = state.catalog.list_exercises(&filter).await?;
    Ok(Json(ExercisesResponse {
        count: exercises.len(),
        exercises,
    }))
}

async fn get_exercise(
    State(state): State<Arc<AppState>>,
    Path(exercise_id): Path<String>,
) -> Result<Json<Exercise>> {
    Ok(Json(state.catalog.get_exercise(&exercise_id).await?))
}

/// `{count, <collection>: [...]}`
async fn list_tags(state: &AppState, kind: TagKind) -> Result<Json<Value>> {
    let tags = state.catalog.list_tags(kind).await?;
    let mut body = Map::new();
    body.insert("count".to_string(), json!(tags.len()));
    body.insert(kind.collection().to_string(), json!(tags));
    Ok(Json(Value::Object(body)))
}

async fn list_body_parts(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    list_tags(&state, TagKind::BodyParts).await
}

async fn list_equipments(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    list_tags(&state, TagKind::Equipments).await
}

async fn list_muscles(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    list_tags(&state, TagKind::Muscles).await
}

// ─── Health Records ──────────────────────────────────────────

#[derive(Serialize)]
pub struct RecordsResponse {
    pub count: usize,
    pub records: Vec<HealthRecord>,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

async fn list_records(State(state): State<Arc<AppState>>) -> Result<Json<RecordsResponse>> {
    let records = state.catalog.list_records().await?;
    Ok(Json(RecordsResponse {
        count: records.len(),
        records,
    }))
}

async fn create_record(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateRecordRequest>,
) -> Result<(StatusCode, Json<HealthRecord>)> {
    let record = state.catalog.create_record(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<String>,
) -> Result<Json<HealthRecord>> {
    Ok(Json(state.catalog.get_record(&record_id).await?))
}

async fn update_record(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<String>,
    JsonBody(patch): JsonBody<HealthRecordPatch>,
) -> Result<Json<HealthRecord>> {
    Ok(Json(state.catalog.update_record(&record_id, patch).await?))
}

async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<String>,
) -> Result<Json<DeletedResponse>> {
    state.catalog.delete_record(&record_id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}
