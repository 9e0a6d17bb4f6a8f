use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::section::SectionRecord;
use crate::models::user::{NewUser, User};
use crate::resume::payload::SectionChanges;
use crate::resume::schema::SectionKind;
use crate::resume::store::{SectionStore, UserStore};

/// PostgreSQL-backed storage. SQL is assembled from the static section
/// schema, so no client-supplied text ever reaches a statement string.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn select_list(kind: SectionKind) -> String {
    let fields: Vec<&str> = kind.fields().iter().map(|f| f.name).collect();
    format!("id, user_id, {}, created_at, updated_at", fields.join(", "))
}

fn record_from_row(kind: SectionKind, row: &PgRow) -> Result<SectionRecord, sqlx::Error> {
    let mut fields = BTreeMap::new();
    for spec in kind.fields() {
        fields.insert(spec.name.to_string(), row.try_get::<Option<String>, _>(spec.name)?);
    }
    Ok(SectionRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        fields,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl SectionStore for PgStore {
    async fn list(&self, kind: SectionKind, owner: Uuid) -> Result<Vec<SectionRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            select_list(kind),
            kind.table()
        );
        let rows = sqlx::query(&sql).bind(owner).fetch_all(&self.pool).await?;
        rows.iter().map(|row| record_from_row(kind, row)).collect()
    }

    async fn get(
        &self,
        kind: SectionKind,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<SectionRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1 AND user_id = $2",
            select_list(kind),
            kind.table()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(|r| record_from_row(kind, r)).transpose()
    }

    async fn create(
        &self,
        kind: SectionKind,
        owner: Uuid,
        changes: &SectionChanges,
    ) -> Result<SectionRecord, sqlx::Error> {
        let fields = kind.fields();
        let columns: Vec<&str> = fields.iter().map(|f| f.name).collect();
        let placeholders: Vec<String> = (2..=fields.len() + 1).map(|i| format!("${i}")).collect();
        let sql = format!(
            "INSERT INTO {} (user_id, {}) VALUES ($1, {}) RETURNING {}",
            kind.table(),
            columns.join(", "),
            placeholders.join(", "),
            select_list(kind)
        );

        let mut query = sqlx::query(&sql).bind(owner);
        for spec in fields {
            let value = changes
                .get(spec.name)
                .cloned()
                .unwrap_or_else(|| Some(String::new()));
            query = query.bind(value);
        }

        let row = query.fetch_one(&self.pool).await?;
        record_from_row(kind, &row)
    }

    async fn update(
        &self,
        kind: SectionKind,
        owner: Uuid,
        id: i64,
        changes: &SectionChanges,
    ) -> Result<Option<SectionRecord>, sqlx::Error> {
        let mut assignments: Vec<String> = changes
            .iter()
            .enumerate()
            .map(|(i, (name, _))| format!("{name} = ${}", i + 3))
            .collect();
        assignments.push("updated_at = NOW()".to_string());

        let sql = format!(
            "UPDATE {} SET {} WHERE id = $1 AND user_id = $2 RETURNING {}",
            kind.table(),
            assignments.join(", "),
            select_list(kind)
        );

        let mut query = sqlx::query(&sql).bind(id).bind(owner);
        for (_, value) in changes.iter() {
            query = query.bind(value.clone());
        }

        let row = query.fetch_optional(&self.pool).await?;
        row.as_ref().map(|r| record_from_row(kind, r)).transpose()
    }

    async fn delete(&self, kind: SectionKind, owner: Uuid, id: i64) -> Result<bool, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", kind.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_singleton(
        &self,
        kind: SectionKind,
        owner: Uuid,
    ) -> Result<Option<SectionRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = $1",
            select_list(kind),
            kind.table()
        );
        let row = sqlx::query(&sql)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(|r| record_from_row(kind, r)).transpose()
    }

    async fn get_or_create_singleton(
        &self,
        kind: SectionKind,
        owner: Uuid,
    ) -> Result<SectionRecord, sqlx::Error> {
        // UNIQUE (user_id) arbitrates racing first accesses; the loser's
        // insert becomes a no-op and both read back the same row.
        let insert = format!(
            "INSERT INTO {} (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
            kind.table()
        );
        sqlx::query(&insert).bind(owner).execute(&self.pool).await?;

        let select = format!(
            "SELECT {} FROM {} WHERE user_id = $1",
            select_list(kind),
            kind.table()
        );
        let row = sqlx::query(&select).bind(owner).fetch_one(&self.pool).await?;
        record_from_row(kind, &row)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
