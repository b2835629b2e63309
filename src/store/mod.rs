//! Object storage capability consumed by the admin managers.
//!
//! The managers only ever talk to [`Store`]; adapters decide where objects
//! live. `create` and `update` report a declined write as `Ok(None)` so the
//! caller can tell "the store said no" apart from an infrastructure failure,
//! and `delete` is an idempotent "ensure absent".

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::model::Entity;

pub const DEFAULT_PAGE_LIMIT: u32 = 30;
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid stored payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One-based page cursor for listing queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pager {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pager {
    /// Builds a pager, clamping the page to `>= 1` and the limit to `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pager: Pager,
}

impl<T> Page<T> {
    /// Maps items while keeping paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pager: self.pager,
        }
    }
}

/// Returns `true` when `name` satisfies a listing pattern.
/// `*` (or an empty pattern) matches everything; anything else is a case-insensitive substring.
pub(crate) fn matches_pattern(pattern: &str, name: Option<&str>) -> bool {
    let pattern = pattern.trim();
    if pattern.is_empty() || pattern == "*" {
        return true;
    }
    name.is_some_and(|name| name.to_lowercase().contains(&pattern.to_lowercase()))
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Persists a new entity. `Ok(None)` means an entity with the same id already exists.
    async fn create(&self, entity: Entity) -> Result<Option<Entity>, StoreError>;

    async fn read(&self, id: &str) -> Result<Option<Entity>, StoreError>;

    /// Replaces an existing entity. Profiles are upserted because they are owned
    /// by the identity provider and may not have been stored yet.
    async fn update(&self, entity: Entity) -> Result<Option<Entity>, StoreError>;

    /// Removes the entity if present; absent ids are not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    async fn count_by_type(&self, type_name: &str) -> Result<u64, StoreError>;

    /// Lists entities of one type in creation order.
    async fn query_by_type(
        &self,
        type_name: &str,
        pattern: &str,
        pager: &Pager,
    ) -> Result<Page<Entity>, StoreError>;
}
