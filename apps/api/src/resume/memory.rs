//! In-process storage used by router and aggregation tests. Mirrors the
//! Postgres semantics: owner filtering, newest-first ordering, one row per
//! owner for singleton kinds, unique usernames, and section rows only for
//! registered owners.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::section::SectionRecord;
use crate::models::user::{NewUser, User};
use crate::resume::payload::SectionChanges;
use crate::resume::schema::SectionKind;
use crate::resume::store::{SectionStore, UserStore};

#[derive(Default)]
struct Tables {
    next_id: i64,
    rows: HashMap<SectionKind, Vec<SectionRecord>>,
    users: Vec<User>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row count across all owners, for asserting that nothing leaked or vanished.
    pub async fn count(&self, kind: SectionKind) -> usize {
        self.tables
            .read()
            .await
            .rows
            .get(&kind)
            .map_or(0, |rows| rows.len())
    }

    /// Registers an account directly and returns its id.
    pub async fn add_user(&self, username: &str) -> Uuid {
        let user = NewUser {
            username: username.to_string(),
            email: String::new(),
            password_hash: String::new(),
        };
        match self.create_user(user).await {
            Ok(Some(created)) => created.id,
            _ => panic!("username {username} already registered"),
        }
    }
}

impl Tables {
    /// Same outcome as the `REFERENCES users (id)` constraint.
    fn check_owner(&self, kind: SectionKind, owner: Uuid) -> Result<(), sqlx::Error> {
        if self.users.iter().any(|u| u.id == owner) {
            Ok(())
        } else {
            Err(sqlx::Error::Protocol(format!(
                "insert on table \"{}\" violates foreign key constraint: user {owner} does not exist",
                kind.table()
            )))
        }
    }
}

fn blank_record(kind: SectionKind, id: i64, owner: Uuid) -> SectionRecord {
    let now = Utc::now();
    SectionRecord {
        id,
        user_id: owner,
        fields: kind
            .fields()
            .iter()
            .map(|f| (f.name.to_string(), Some(String::new())))
            .collect::<BTreeMap<_, _>>(),
        created_at: now,
        updated_at: now,
    }
}

fn apply(record: &mut SectionRecord, changes: &SectionChanges) {
    for (name, value) in changes.iter() {
        record.fields.insert(name.to_string(), value.clone());
    }
}

#[async_trait]
impl SectionStore for MemoryStore {
    async fn list(&self, kind: SectionKind, owner: Uuid) -> Result<Vec<SectionRecord>, sqlx::Error> {
        let tables = self.tables.read().await;
        let mut rows: Vec<SectionRecord> = tables
            .rows
            .get(&kind)
            .into_iter()
            .flatten()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn get(
        &self,
        kind: SectionKind,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<SectionRecord>, sqlx::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .rows
            .get(&kind)
            .into_iter()
            .flatten()
            .find(|r| r.id == id && r.user_id == owner)
            .cloned())
    }

    async fn create(
        &self,
        kind: SectionKind,
        owner: Uuid,
        changes: &SectionChanges,
    ) -> Result<SectionRecord, sqlx::Error> {
        let mut tables = self.tables.write().await;
        tables.check_owner(kind, owner)?;
        tables.next_id += 1;
        let mut record = blank_record(kind, tables.next_id, owner);
        apply(&mut record, changes);
        tables.rows.entry(kind).or_default().push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        kind: SectionKind,
        owner: Uuid,
        id: i64,
        changes: &SectionChanges,
    ) -> Result<Option<SectionRecord>, sqlx::Error> {
        let mut tables = self.tables.write().await;
        let Some(record) = tables
            .rows
            .get_mut(&kind)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id && r.user_id == owner))
        else {
            return Ok(None);
        };
        apply(record, changes);
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn delete(&self, kind: SectionKind, owner: Uuid, id: i64) -> Result<bool, sqlx::Error> {
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.rows.get_mut(&kind) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|r| !(r.id == id && r.user_id == owner));
        Ok(rows.len() < before)
    }

    async fn find_singleton(
        &self,
        kind: SectionKind,
        owner: Uuid,
    ) -> Result<Option<SectionRecord>, sqlx::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .rows
            .get(&kind)
            .into_iter()
            .flatten()
            .find(|r| r.user_id == owner)
            .cloned())
    }

    async fn get_or_create_singleton(
        &self,
        kind: SectionKind,
        owner: Uuid,
    ) -> Result<SectionRecord, sqlx::Error> {
        // The write lock plays the part of the UNIQUE (user_id) constraint.
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .rows
            .get(&kind)
            .into_iter()
            .flatten()
            .find(|r| r.user_id == owner)
        {
            return Ok(existing.clone());
        }
        tables.check_owner(kind, owner)?;
        tables.next_id += 1;
        let record = blank_record(kind, tables.next_id, owner);
        tables.rows.entry(kind).or_default().push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<Option<User>, sqlx::Error> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Ok(None);
        }
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(Some(created))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}
