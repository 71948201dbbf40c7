// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use serde_json::{json, Value};
use snap_fitness::config::Config;
use snap_fitness::db::{FirestoreDb, MemoryCatalog};
use snap_fitness::error::AppError;
use snap_fitness::routes::create_router;
use snap_fitness::services::StaticBaselineGenerator;
use snap_fitness::AppState;
use std::sync::Arc;

mod common;

async fn error_body(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_status_codes() {
    assert_eq!(
        AppError::NotFound("x".into()).status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        AppError::BadRequest("x".into()).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::MissingFields(vec!["email".into()]).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::Conflict("x".into()).status_code(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        AppError::Database("x".into()).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_missing_fields_body() {
    let (status, body) =
        error_body(AppError::MissingFields(vec!["email".into(), "password".into()])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_fields");
    assert_eq!(body["missing_fields"], json!(["email", "password"]));
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let (status, body) = error_body(AppError::Database("connection refused".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
    assert!(body.get("details").is_none());

    let (_, body) = error_body(AppError::Internal(anyhow::anyhow!("secret path"))).await;
    assert_eq!(body["error"], "internal_error");
    assert!(!body.to_string().contains("secret path"));
}

#[tokio::test]
async fn test_store_outage_is_server_error() {
    // Offline Firestore client: every store call fails.
    let catalog = Arc::new(MemoryCatalog::default());
    let state = Arc::new(AppState::new(
        Config::default(),
        Arc::new(FirestoreDb::new_mock()),
        catalog.clone(),
        catalog,
        Arc::new(StaticBaselineGenerator),
    ));
    let app = create_router(state);

    let (status, body) = common::send(&app, Method::GET, "/users/someone", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");

    // Validation still runs before the store is touched.
    let (status, _) = common::send(
        &app,
        Method::POST,
        "/users/someone/tracking/water",
        Some(json!({ "amount_ml": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
