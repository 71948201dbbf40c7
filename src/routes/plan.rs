// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan routes.

use crate::error::Result;
use crate::models::PlanSection;
use crate::routes::extract::JsonBody;
use crate::routes::MessageResponse;
use crate::services::plan::{CreatePlanRequest, PlanView, UpdatePlanRequest};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/{user_id}/plan",
            get(get_plan)
                .post(create_plan)
                .put(update_plan)
                .delete(delete_plan),
        )
        .route("/users/{user_id}/plan/{section}", post(add_week))
        .route(
            "/users/{user_id}/plan/{section}/{week_id}",
            put(replace_week).delete(remove_week),
        )
}

#[derive(Serialize)]
pub struct PlanResponse {
    pub message: String,
    #[serde(flatten)]
    pub plan: PlanView,
}

#[derive(Serialize)]
pub struct WeekCreatedResponse {
    pub message: String,
    pub week_id: String,
}

async fn create_plan(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    JsonBody(request): JsonBody<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>)> {
    let plan = state.plans.create_plan(&user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(PlanResponse {
            message: "Plan created successfully".to_string(),
            plan,
        }),
    ))
}

async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PlanView>> {
    Ok(Json(state.plans.get_plan(&user_id).await?))
}

async fn update_plan(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    JsonBody(request): JsonBody<UpdatePlanRequest>,
) -> Result<Json<PlanResponse>> {
    let plan = state.plans.update_plan(&user_id, request).await?;
    Ok(Json(PlanResponse {
        message: "Plan updated successfully".to_string(),
        plan,
    }))
}

async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.plans.delete_plan(&user_id).await?;
    Ok(Json(MessageResponse::new("Plan deleted successfully")))
}

// ─── Week Records ────────────────────────────────────────────

async fn add_week(
    State(state): State<Arc<AppState>>,
    Path((user_id, section)): Path<(String, String)>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<WeekCreatedResponse>)> {
    let section: PlanSection = section.parse()?;
    let week_id = state.plans.add_week(&user_id, section, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(WeekCreatedResponse {
            message: format!("Week added to {section}"),
            week_id,
        }),
    ))
}

async fn replace_week(
    State(state): State<Arc<AppState>>,
    Path((user_id, section, week_id)): Path<(String, String, String)>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<MessageResponse>> {
    let section: PlanSection = section.parse()?;
    state
        .plans
        .replace_week(&user_id, section, &week_id, body)
        .await?;
    Ok(Json(MessageResponse::new("Week updated")))
}

async fn remove_week(
    State(state): State<Arc<AppState>>,
    Path((user_id, section, week_id)): Path<(String, String, String)>,
) -> Result<Json<MessageResponse>> {
    let section: PlanSection = section.parse()?;
    state.plans.remove_week(&user_id, section, &week_id).await?;
    Ok(Json(MessageResponse::new("Week removed")))
}
