// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration and account lookup.

use crate::db::UserStore;
use crate::error::{AppError, Result};
use crate::models::{PublicUser, UserDocument};
use crate::time_utils::now_rfc3339;
use crate::validation::{normalize_email, require_fields, validation_failed};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Registration request body.
///
/// Fields are optional at the serde level so missing ones can be reported
/// together as `missing_fields`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(length(min = 8, max = 128, message = "must be 8-128 characters"))]
    pub password: Option<String>,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Registration and account operations.
pub struct UserService {
    users: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    /// Register a new user and return its id.
    pub async fn register(&self, mut request: RegisterRequest) -> Result<String> {
        require_fields(&[
            ("email", filled(&request.email)),
            ("username", filled(&request.username)),
            ("password", filled(&request.password)),
        ])?;

        request.email = request.email.as_deref().map(normalize_email);
        request.username = request.username.as_deref().map(|u| u.trim().to_string());
        request.validate().map_err(validation_failed)?;

        let (Some(email), Some(username), Some(password)) =
            (request.email, request.username, request.password)
        else {
            return Err(AppError::BadRequest("Incomplete registration".to_string()));
        };

        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

        let user_id = uuid::Uuid::new_v4().simple().to_string();
        let user = UserDocument {
            email,
            username,
            password_hash,
            created_at: now_rfc3339(),
            ..Default::default()
        };

        self.users.create_user(&user_id, &user).await?;

        tracing::info!(user_id = %user_id, "User registered");
        Ok(user_id)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<PublicUser> {
        let user = self
            .users
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        Ok(PublicUser::from_document(user_id, &user))
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        if !self.users.delete_user(user_id).await? {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        tracing::info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryUserStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryUserStore::new()), 4)
    }

    fn request(email: &str, username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.to_string()),
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_normalizes_email() {
        let users = Arc::new(MemoryUserStore::new());
        let service = UserService::new(users.clone(), 4);

        let id = service
            .register(request(" Jane@Example.COM ", "jane", "correct horse"))
            .await
            .unwrap();

        let stored = users.get_user(&id).await.unwrap().unwrap();
        assert_eq!(stored.email, "jane@example.com");
        assert_ne!(stored.password_hash, "correct horse");
        assert!(bcrypt::verify("correct horse", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts_case_insensitively() {
        let service = service();
        service
            .register(request("jane@example.com", "jane", "correct horse"))
            .await
            .unwrap();

        let err = service
            .register(request("JANE@example.com", "other", "correct horse"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_reports_all_missing_fields() {
        let err = service()
            .register(RegisterRequest {
                email: Some("  ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        match err {
            AppError::MissingFields(fields) => {
                assert_eq!(fields, vec!["email", "username", "password"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email_and_short_password() {
        let err = service()
            .register(request("not-an-email", "jane", "short"))
            .await
            .unwrap_err();
        match err {
            AppError::BadRequest(msg) => {
                assert!(msg.contains("email"));
                assert!(msg.contains("password"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_unknown_user_is_not_found() {
        assert!(matches!(
            service().delete_user("ghost").await,
            Err(AppError::NotFound(_))
        ));
    }
}
