// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health and nutrition profile routes.

use crate::error::Result;
use crate::models::{HealthProfile, NutritionProfile};
use crate::routes::extract::JsonBody;
use crate::routes::MessageResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/{user_id}/health",
            get(get_health)
                .post(create_health)
                .put(update_health)
                .delete(delete_health),
        )
        .route(
            "/users/{user_id}/nutrition",
            get(get_nutrition)
                .post(create_nutrition)
                .put(update_nutrition)
                .delete(delete_nutrition),
        )
}

/// A profile, with a message on writes.
#[derive(Serialize)]
pub struct ProfileResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub profile: T,
}

impl<T> ProfileResponse<T> {
    fn written(message: &str, profile: T) -> Json<Self> {
        Json(Self {
            message: Some(message.to_string()),
            profile,
        })
    }

    fn read(profile: T) -> Json<Self> {
        Json(Self {
            message: None,
            profile,
        })
    }
}

// ─── Health ──────────────────────────────────────────────────

async fn create_health(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<ProfileResponse<HealthProfile>>)> {
    let profile = state.profiles.create_health(&user_id, &body).await?;
    Ok((
        StatusCode::CREATED,
        ProfileResponse::written("Health profile created", profile),
    ))
}

async fn get_health(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse<HealthProfile>>> {
    Ok(ProfileResponse::read(
        state.profiles.get_health(&user_id).await?,
    ))
}

async fn update_health(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<ProfileResponse<HealthProfile>>> {
    let profile = state.profiles.update_health(&user_id, &body).await?;
    Ok(ProfileResponse::written("Health profile updated", profile))
}

async fn delete_health(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.profiles.delete_health(&user_id).await?;
    Ok(Json(MessageResponse::new("Health profile deleted")))
}

// ─── Nutrition ───────────────────────────────────────────────

async fn create_nutrition(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<ProfileResponse<NutritionProfile>>)> {
    let profile = state.profiles.create_nutrition(&user_id, &body).await?;
    Ok((
        StatusCode::CREATED,
        ProfileResponse::written("Nutrition profile created", profile),
    ))
}

async fn get_nutrition(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse<NutritionProfile>>> {
    Ok(ProfileResponse::read(
        state.profiles.get_nutrition(&user_id).await?,
    ))
}

async fn update_nutrition(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<ProfileResponse<NutritionProfile>>> {
    let profile = state.profiles.update_nutrition(&user_id, &body).await?;
    Ok(ProfileResponse::written("Nutrition profile updated", profile))
}

async fn delete_nutrition(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.profiles.delete_nutrition(&user_id).await?;
    Ok(Json(MessageResponse::new("Nutrition profile deleted")))
}
