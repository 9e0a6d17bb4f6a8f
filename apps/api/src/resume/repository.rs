use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::section::SectionRecord;
use crate::resume::payload::parse_changes;
use crate::resume::schema::SectionKind;
use crate::resume::store::SectionStore;

/// Owner-scoped CRUD for one section kind.
///
/// Validation happens here, before the store is touched. Rows that are
/// missing or owned by someone else both surface as `NotFound`.
#[derive(Clone)]
pub struct SectionRepository {
    store: Arc<dyn SectionStore>,
    kind: SectionKind,
}

impl SectionRepository {
    pub fn new(store: Arc<dyn SectionStore>, kind: SectionKind) -> Self {
        Self { store, kind }
    }

    pub async fn list(&self, owner: Uuid) -> Result<Vec<SectionRecord>, AppError> {
        Ok(self.store.list(self.kind, owner).await?)
    }

    pub async fn get(&self, owner: Uuid, id: i64) -> Result<SectionRecord, AppError> {
        self.store
            .get(self.kind, owner, id)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    pub async fn create(&self, owner: Uuid, body: &Value) -> Result<SectionRecord, AppError> {
        let changes = parse_changes(self.kind, body)?;
        let record = self.store.create(self.kind, owner, &changes).await?;
        info!(
            "Created {} {} for user {owner}",
            self.kind.table(),
            record.id
        );
        Ok(record)
    }

    pub async fn update(&self, owner: Uuid, id: i64, body: &Value) -> Result<SectionRecord, AppError> {
        let changes = parse_changes(self.kind, body)?;
        let record = self
            .store
            .update(self.kind, owner, id, &changes)
            .await?
            .ok_or_else(|| self.not_found(id))?;
        info!("Updated {} {id} for user {owner}", self.kind.table());
        Ok(record)
    }

    pub async fn delete(&self, owner: Uuid, id: i64) -> Result<(), AppError> {
        if !self.store.delete(self.kind, owner, id).await? {
            return Err(self.not_found(id));
        }
        info!("Deleted {} {id} for user {owner}", self.kind.table());
        Ok(())
    }

    /// Returns the owner's singleton row, materializing a blank one on first access.
    pub async fn get_or_create(&self, owner: Uuid) -> Result<SectionRecord, AppError> {
        debug_assert!(self.kind.is_singleton());
        Ok(self.store.get_or_create_singleton(self.kind, owner).await?)
    }

    /// Partial update of the owner's singleton row, creating it first if needed.
    pub async fn update_singleton(&self, owner: Uuid, body: &Value) -> Result<SectionRecord, AppError> {
        let changes = parse_changes(self.kind, body)?;
        let current = self.get_or_create(owner).await?;
        let record = self
            .store
            .update(self.kind, owner, current.id, &changes)
            .await?
            .ok_or_else(|| self.not_found(current.id))?;
        info!("Updated {} for user {owner}", self.kind.table());
        Ok(record)
    }

    fn not_found(&self, id: i64) -> AppError {
        AppError::NotFound(format!("{} {id} not found", self.kind.label()))
    }
}
