// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan API tests.

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::{create_test_app, register_user, send};

#[tokio::test]
async fn test_create_plan_with_defaults() {
    let (app, _state) = create_test_app();
    let user_id = register_user(&app, "plan@example.com").await;

    let (status, body) = send(&app, Method::POST, &format!("/users/{user_id}/plan"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Plan created successfully");
    assert_eq!(body["plan"]["plan_type"], "combined");
    assert_eq!(body["plan"]["status"], "active");
    assert_eq!(body["plan"]["preferences"]["duration_weeks"], 4);

    let diet = body["diet"].as_array().unwrap();
    let workouts = body["workouts"].as_array().unwrap();
    assert_eq!(diet.len(), 4);
    assert_eq!(workouts.len(), 4);
    assert_eq!(diet[0]["week_name"], "Week 1");
    assert!(!diet[0]["id"].as_str().unwrap().is_empty());
    assert_ne!(diet[0]["id"], diet[1]["id"]);

    let (_, user) = send(&app, Method::GET, &format!("/users/{user_id}"), None).await;
    assert_eq!(user["has_plan"], true);
}

#[tokio::test]
async fn test_create_diet_only_plan() {
    let (app, _state) = create_test_app();
    let user_id = register_user(&app, "diet@example.com").await;
    let uri = format!("/users/{user_id}/plan");

    // A combined plan first, then diet-only replaces it entirely.
    send(&app, Method::POST, &uri, Some(json!({}))).await;
    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "plan_type": "diet", "duration_weeks": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["diet"].as_array().unwrap().len(), 2);
    assert_eq!(body["workouts"], json!([]));
}

#[tokio::test]
async fn test_create_plan_rejects_bad_input() {
    let (app, _state) = create_test_app();
    let user_id = register_user(&app, "badplan@example.com").await;
    let uri = format!("/users/{user_id}/plan");

    for body in [
        json!({ "plan_type": "bulk" }),
        json!({ "duration_weeks": 0 }),
        json!({ "workout_days_per_week": 8 }),
    ] {
        let (status, _) = send(&app, Method::POST, &uri, Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
    }

    let (status, _) = send(&app, Method::POST, "/users/nobody/plan", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_plan() {
    let (app, _state) = create_test_app();
    let user_id = register_user(&app, "update-plan@example.com").await;
    let uri = format!("/users/{user_id}/plan");

    // Status change needs a plan.
    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "status": "paused" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, Method::POST, &uri, Some(json!({}))).await;

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "No update data provided");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({
            "status": "paused",
            "diet": [{ "week_name": "Custom", "meals": [{ "meal_type": "breakfast", "name": "oats" }] }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["status"], "paused");
    assert_eq!(body["diet"].as_array().unwrap().len(), 1);
    assert_eq!(body["diet"][0]["week_name"], "Custom");
    assert_eq!(body["workouts"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_week_records() {
    let (app, _state) = create_test_app();
    let user_id = register_user(&app, "weeks@example.com").await;
    let uri = format!("/users/{user_id}/plan");
    send(&app, Method::POST, &uri, Some(json!({ "plan_type": "workout" }))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("{uri}/workouts"),
        Some(json!({
            "week_name": "Bonus Week",
            "workouts": [{ "workout_id": "bonus-1", "day": "Saturday", "duration_minutes": 30 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Week added to workouts");
    let week_id = body["week_id"].as_str().unwrap().to_string();

    let (_, plan) = send(&app, Method::GET, &uri, None).await;
    let weeks = plan["workouts"].as_array().unwrap();
    assert_eq!(weeks.len(), 5);
    assert_eq!(weeks[4]["id"], week_id.as_str());
    assert_eq!(weeks[4]["workouts"][0]["day"], "Saturday");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("{uri}/workouts/{week_id}"),
        Some(json!({ "week_name": "Renamed Week" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, plan) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(plan["workouts"][4]["week_name"], "Renamed Week");
    assert_eq!(plan["workouts"][4]["id"], week_id.as_str());

    let (status, _) = send(&app, Method::DELETE, &format!("{uri}/workouts/{week_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, plan) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(plan["workouts"].as_array().unwrap().len(), 4);

    let (status, _) = send(&app, Method::DELETE, &format!("{uri}/workouts/{week_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, &format!("{uri}/snacks"), Some(json!({ "week_name": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_plan() {
    let (app, _state) = create_test_app();
    let user_id = register_user(&app, "delete-plan@example.com").await;
    let uri = format!("/users/{user_id}/plan");
    send(&app, Method::POST, &uri, Some(json!({}))).await;

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Plan deleted successfully");

    let (status, plan) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(plan["plan"].is_null());
    assert_eq!(plan["diet"], json!([]));
    assert_eq!(plan["workouts"], json!([]));
}
