//! Postgres-backed store over the single `objects` table (see `sql/schema.sql`).
//!
//! Every entity is one row keyed by id; the typed payload lives in `body`.
//! `create` is a compare-and-create (`ON CONFLICT DO NOTHING`), so two racing
//! creators of the same id cannot both succeed.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};

use super::{Page, Pager, Store, StoreError};
use crate::model::{Entity, PROFILE_TYPE};

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Rebuilds an entity from a `type, body` row.
fn entity_from_row(row: &sqlx::postgres::PgRow) -> Result<Entity, StoreError> {
    let type_name: String = row.try_get("type")?;
    let body: serde_json::Value = row.try_get("body")?;
    Ok(Entity::from_parts(&type_name, body)?)
}

/// Converts a listing pattern into an `ILIKE` operand; `None` matches everything.
fn like_pattern(pattern: &str) -> Option<String> {
    let pattern = pattern.trim();
    if pattern.is_empty() || pattern == "*" {
        return None;
    }
    let escaped = pattern
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip(self, entity), fields(id = entity.id(), object_type = entity.type_name()))]
    async fn create(&self, entity: Entity) -> Result<Option<Entity>, StoreError> {
        let body = entity.to_body()?;
        let result = sqlx::query(
            r"
            INSERT INTO objects (id, type, name, body)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(entity.id())
        .bind(entity.type_name())
        .bind(entity.name())
        .bind(body)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!("object already exists");
            return Ok(None);
        }
        Ok(Some(entity))
    }

    async fn read(&self, id: &str) -> Result<Option<Entity>, StoreError> {
        let row = sqlx::query("SELECT type, body FROM objects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(entity_from_row).transpose()
    }

    #[instrument(skip(self, entity), fields(id = entity.id(), object_type = entity.type_name()))]
    async fn update(&self, entity: Entity) -> Result<Option<Entity>, StoreError> {
        let body = entity.to_body()?;
        let query = if entity.type_name() == PROFILE_TYPE {
            r"
            INSERT INTO objects (id, type, name, body)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
                SET name = EXCLUDED.name, body = EXCLUDED.body, updated_at = NOW()
                WHERE objects.type = EXCLUDED.type
            "
        } else {
            r"
            UPDATE objects
            SET name = $3, body = $4, updated_at = NOW()
            WHERE id = $1 AND type = $2
            "
        };
        let result = sqlx::query(query)
            .bind(entity.id())
            .bind(entity.type_name())
            .bind(entity.name())
            .bind(body)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(entity))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM objects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_by_type(&self, type_name: &str) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM objects WHERE type = $1")
            .bind(type_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn query_by_type(
        &self,
        type_name: &str,
        pattern: &str,
        pager: &Pager,
    ) -> Result<Page<Entity>, StoreError> {
        let like = like_pattern(pattern);
        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM objects
            WHERE type = $1 AND ($2::text IS NULL OR name ILIKE $2)
            ",
        )
        .bind(type_name)
        .bind(like.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(
            r"
            SELECT type, body FROM objects
            WHERE type = $1 AND ($2::text IS NULL OR name ILIKE $2)
            ORDER BY created_at, id
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(type_name)
        .bind(like.as_deref())
        .bind(i64::from(pager.limit))
        .bind(i64::try_from(pager.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .iter()
            .map(entity_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or_default(),
            pager: *pager,
        })
    }
}
