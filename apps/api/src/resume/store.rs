//! Storage seams. `AppState` carries these as trait objects so the handlers
//! never depend on a concrete backend.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::section::SectionRecord;
use crate::models::user::{NewUser, User};
use crate::resume::payload::SectionChanges;
use crate::resume::schema::SectionKind;

/// Owner-scoped row storage for every section kind.
///
/// Every method takes the owner explicitly and must apply it as a filter:
/// a row owned by another user behaves exactly like a missing row.
#[async_trait]
pub trait SectionStore: Send + Sync {
    /// Rows owned by `owner`, newest first.
    async fn list(&self, kind: SectionKind, owner: Uuid) -> Result<Vec<SectionRecord>, sqlx::Error>;

    async fn get(
        &self,
        kind: SectionKind,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<SectionRecord>, sqlx::Error>;

    /// Inserts a row; fields absent from `changes` default to the empty string.
    async fn create(
        &self,
        kind: SectionKind,
        owner: Uuid,
        changes: &SectionChanges,
    ) -> Result<SectionRecord, sqlx::Error>;

    /// Applies `changes` to an owned row, leaving other fields untouched.
    async fn update(
        &self,
        kind: SectionKind,
        owner: Uuid,
        id: i64,
        changes: &SectionChanges,
    ) -> Result<Option<SectionRecord>, sqlx::Error>;

    /// Returns `false` when no owned row matched.
    async fn delete(&self, kind: SectionKind, owner: Uuid, id: i64) -> Result<bool, sqlx::Error>;

    /// The singleton row for `owner`, if one has been materialized.
    async fn find_singleton(
        &self,
        kind: SectionKind,
        owner: Uuid,
    ) -> Result<Option<SectionRecord>, sqlx::Error>;

    /// Returns the singleton row, inserting a blank one if absent.
    /// Concurrent callers for the same owner converge on a single row.
    async fn get_or_create_singleton(
        &self,
        kind: SectionKind,
        owner: Uuid,
    ) -> Result<SectionRecord, sqlx::Error>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns `None` when the username is already taken.
    async fn create_user(&self, user: NewUser) -> Result<Option<User>, sqlx::Error>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
}
