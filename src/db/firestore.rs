// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides the user store:
//! - Users (profile, plan and daily logs on one document)
//! - Email reservations (uniqueness of registered emails)
//!
//! Every write that depends on a read runs inside `run_transaction`, so a
//! concurrent writer to the same user makes Firestore retry the closure with
//! fresh data instead of losing an update.

use crate::db::{collections, email_key, UserMutation, UserStore};
use crate::error::{AppError, Result};
use crate::models::{EmailReservation, UserDocument};
use async_trait::async_trait;
use firestore::errors::{BackoffError, FirestoreError};
use firestore::FirestoreTransaction;
use futures_util::FutureExt;

/// Result of a transaction body: the outer error aborts (or retries) the
/// transaction, the inner one is a domain outcome reported to the caller.
type TransactionOutcome<T> = std::result::Result<Result<T>, BackoffError<FirestoreError>>;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

#[async_trait]
impl UserStore for FirestoreDb {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserDocument>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn create_user(&self, user_id: &str, user: &UserDocument) -> Result<()> {
        let user_id = user_id.to_string();
        let user = user.clone();

        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                create_in_transaction(db, transaction, user_id.clone(), user.clone()).boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("User creation transaction failed: {}", e)))?;

        if outcome.is_ok() {
            tracing::info!(user_id = %user_id, "User created");
        }
        outcome
    }

    async fn update_user(&self, user_id: &str, mutation: UserMutation) -> Result<UserDocument> {
        let user_id = user_id.to_string();

        self.get_client()?
            .run_transaction(|db, transaction| {
                mutate_in_transaction(db, transaction, user_id.clone(), mutation.clone()).boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("User update transaction failed: {}", e)))?
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool> {
        let user_id = user_id.to_string();

        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                delete_in_transaction(db, transaction, user_id.clone()).boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("User deletion transaction failed: {}", e)))?;

        if let Ok(true) = outcome {
            tracing::info!(user_id = %user_id, "User deleted");
        }
        outcome
    }
}

// ─── Transaction Bodies ──────────────────────────────────────────
//
// `db` carries the transaction's consistency selector, so the reads below
// register the documents for conflict detection.

/// Reserve the email and write the new user document.
async fn create_in_transaction(
    db: firestore::FirestoreDb,
    transaction: &mut FirestoreTransaction<'_>,
    user_id: String,
    user: UserDocument,
) -> TransactionOutcome<()> {
    let key = email_key(&user.email);

    let existing: Option<EmailReservation> = db
        .fluent()
        .select()
        .by_id_in(collections::USER_EMAILS)
        .obj()
        .one(&key)
        .await?;

    if existing.is_some() {
        return Ok(Err(AppError::Conflict(
            "A user with this email already exists".to_string(),
        )));
    }

    let reservation = EmailReservation {
        user_id: user_id.clone(),
    };

    db.fluent()
        .update()
        .in_col(collections::USER_EMAILS)
        .document_id(&key)
        .object(&reservation)
        .add_to_transaction(&mut *transaction)?;

    db.fluent()
        .update()
        .in_col(collections::USERS)
        .document_id(&user_id)
        .object(&user)
        .add_to_transaction(&mut *transaction)?;

    Ok(Ok(()))
}

/// Read the user, apply the mutation and stage the full document write.
async fn mutate_in_transaction(
    db: firestore::FirestoreDb,
    transaction: &mut FirestoreTransaction<'_>,
    user_id: String,
    mutation: UserMutation,
) -> TransactionOutcome<UserDocument> {
    let current: Option<UserDocument> = db
        .fluent()
        .select()
        .by_id_in(collections::USERS)
        .obj()
        .one(&user_id)
        .await?;

    let Some(mut user) = current else {
        return Ok(Err(AppError::NotFound(format!("User {} not found", user_id))));
    };

    if let Err(e) = mutation(&mut user) {
        // Nothing staged; the empty transaction commits harmlessly.
        return Ok(Err(e));
    }

    db.fluent()
        .update()
        .in_col(collections::USERS)
        .document_id(&user_id)
        .object(&user)
        .add_to_transaction(&mut *transaction)?;

    Ok(Ok(user))
}

/// Delete the user document together with its email reservation.
async fn delete_in_transaction(
    db: firestore::FirestoreDb,
    transaction: &mut FirestoreTransaction<'_>,
    user_id: String,
) -> TransactionOutcome<bool> {
    let current: Option<UserDocument> = db
        .fluent()
        .select()
        .by_id_in(collections::USERS)
        .obj()
        .one(&user_id)
        .await?;

    let Some(user) = current else {
        return Ok(Ok(false));
    };

    db.fluent()
        .delete()
        .from(collections::USER_EMAILS)
        .document_id(email_key(&user.email))
        .add_to_transaction(&mut *transaction)?;

    db.fluent()
        .delete()
        .from(collections::USERS)
        .document_id(&user_id)
        .add_to_transaction(&mut *transaction)?;

    Ok(Ok(true))
}
