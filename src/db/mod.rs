//! Database layer.
//!
//! Two stores back the API:
//! - the user store (Firestore, or in-memory) holds one nested document per user
//! - the catalog store (MongoDB, or in-memory) holds the exercise reference
//!   data and the generic health records
//!
//! Both are trait objects constructed in `main` and handed to the services.

pub mod firestore;
pub mod memory;
pub mod mongo;

pub use self::firestore::FirestoreDb;
pub use memory::{MemoryCatalog, MemoryUserStore};
pub use mongo::MongoCatalog;

use crate::error::Result;
use crate::models::{
    CatalogTag, Exercise, ExerciseFilter, HealthRecord, HealthRecordPatch, TagKind, UserDocument,
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email uniqueness reservations (keyed by encoded email)
    pub const USER_EMAILS: &str = "user_emails";
    pub const EXERCISES: &str = "exercises";
    pub const HEALTH_RECORDS: &str = "health";
}

/// In-place change to a user document.
///
/// May run more than once if the store retries a conflicting transaction,
/// so it must depend only on the document it is given.
pub type UserMutation = Arc<dyn Fn(&mut UserDocument) -> Result<()> + Send + Sync>;

/// Wrap a closure as a [`UserMutation`].
pub fn mutation<F>(f: F) -> UserMutation
where
    F: Fn(&mut UserDocument) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Per-user document storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user document.
    async fn get_user(&self, user_id: &str) -> Result<Option<UserDocument>>;

    /// Create a user, reserving its email atomically.
    ///
    /// Fails with `Conflict` if the email is already registered.
    async fn create_user(&self, user_id: &str, user: &UserDocument) -> Result<()>;

    /// Atomically read, mutate and write back a user document.
    ///
    /// Returns the document as written. Fails with `NotFound` if the user
    /// does not exist; an error from the mutation aborts without writing.
    async fn update_user(&self, user_id: &str, mutation: UserMutation) -> Result<UserDocument>;

    /// Delete a user and its email reservation. Returns `false` if absent.
    async fn delete_user(&self, user_id: &str) -> Result<bool>;
}

/// Read-only exercise reference data.
#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    async fn list_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>>;

    async fn get_exercise(&self, exercise_id: &str) -> Result<Option<Exercise>>;

    async fn list_tags(&self, kind: TagKind) -> Result<Vec<CatalogTag>>;
}

/// The generic `health` record collection.
#[async_trait]
pub trait HealthRecordStore: Send + Sync {
    async fn list_records(&self) -> Result<Vec<HealthRecord>>;

    async fn insert_record(
        &self,
        name: &str,
        status: &str,
        notes: Option<&str>,
    ) -> Result<HealthRecord>;

    async fn get_record(&self, id: &ObjectId) -> Result<Option<HealthRecord>>;

    /// Apply a patch, returning the updated record (`None` if absent).
    async fn update_record(
        &self,
        id: &ObjectId,
        patch: &HealthRecordPatch,
    ) -> Result<Option<HealthRecord>>;

    async fn delete_record(&self, id: &ObjectId) -> Result<bool>;
}

/// Document ID for an email reservation.
pub fn email_key(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}
