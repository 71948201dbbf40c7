// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use snap_fitness::config::Config;
use snap_fitness::db::{FirestoreDb, MemoryCatalog, MemoryUserStore};
use snap_fitness::models::{CatalogTag, Exercise};
use snap_fitness::routes::create_router;
use snap_fitness::services::StaticBaselineGenerator;
use snap_fitness::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Small exercise dataset covering every filter.
#[allow(dead_code)]
pub fn sample_catalog() -> MemoryCatalog {
    let exercises: Vec<Exercise> = serde_json::from_value(json!([
        {
            "exerciseId": "ex-squat",
            "name": "barbell squat",
            "bodyParts": ["upper legs"],
            "equipments": ["barbell"],
            "targetMuscles": ["quads"],
            "secondaryMuscles": ["glutes"],
            "instructions": ["Stand", "Squat", "Stand up"]
        },
        {
            "exerciseId": "ex-pushup",
            "name": "push-up",
            "bodyParts": ["chest"],
            "equipments": ["body weight"],
            "targetMuscles": ["pectorals"],
            "secondaryMuscles": ["triceps"],
            "instructions": ["Lower", "Push"]
        },
        {
            "exerciseId": "ex-bench",
            "name": "barbell bench press",
            "bodyParts": ["chest"],
            "equipments": ["barbell"],
            "targetMuscles": ["pectorals"],
            "secondaryMuscles": ["triceps", "delts"],
            "instructions": ["Unrack", "Press"]
        }
    ]))
    .expect("sample exercises");

    let tags = |names: &[&str]| -> Vec<CatalogTag> {
        names
            .iter()
            .map(|n| serde_json::from_value(json!({ "name": n })).expect("sample tag"))
            .collect()
    };

    MemoryCatalog::new(
        exercises,
        tags(&["chest", "upper legs"]),
        tags(&["barbell", "body weight"]),
        tags(&["pectorals", "quads", "triceps"]),
    )
}

/// Create a test app backed by in-memory stores.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let catalog = Arc::new(sample_catalog());
    let state = Arc::new(AppState::new(
        Config::default(),
        Arc::new(MemoryUserStore::new()),
        catalog.clone(),
        catalog,
        Arc::new(StaticBaselineGenerator),
    ));

    (create_router(state.clone()), state)
}

/// Send a request and decode the JSON response body (`Value::Null` if empty).
#[allow(dead_code)]
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

/// Register a user and return its id.
#[allow(dead_code)]
pub async fn register_user(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/users/register",
        Some(json!({
            "email": email,
            "username": "tester",
            "password": "correct horse battery"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["userId"].as_str().unwrap().to_string()
}
