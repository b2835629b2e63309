//! In-process store used for local runs and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{matches_pattern, Page, Pager, Store, StoreError};
use crate::model::{Entity, PROFILE_TYPE};

#[derive(Debug, Default)]
struct Objects {
    next_seq: u64,
    // id -> (insertion sequence, entity)
    by_id: HashMap<String, (u64, Entity)>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<Objects>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entities across all types.
    pub async fn len(&self) -> usize {
        self.objects.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create(&self, entity: Entity) -> Result<Option<Entity>, StoreError> {
        let mut objects = self.objects.write().await;
        if objects.by_id.contains_key(entity.id()) {
            return Ok(None);
        }
        objects.next_seq += 1;
        let seq = objects.next_seq;
        objects
            .by_id
            .insert(entity.id().to_string(), (seq, entity.clone()));
        Ok(Some(entity))
    }

    async fn read(&self, id: &str) -> Result<Option<Entity>, StoreError> {
        let objects = self.objects.read().await;
        Ok(objects.by_id.get(id).map(|(_, entity)| entity.clone()))
    }

    async fn update(&self, entity: Entity) -> Result<Option<Entity>, StoreError> {
        let mut objects = self.objects.write().await;
        if let Some((_, stored)) = objects.by_id.get_mut(entity.id()) {
            *stored = entity.clone();
            return Ok(Some(entity));
        }
        if entity.type_name() != PROFILE_TYPE {
            return Ok(None);
        }
        objects.next_seq += 1;
        let seq = objects.next_seq;
        objects
            .by_id
            .insert(entity.id().to_string(), (seq, entity.clone()));
        Ok(Some(entity))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.objects.write().await.by_id.remove(id);
        Ok(())
    }

    async fn count_by_type(&self, type_name: &str) -> Result<u64, StoreError> {
        let objects = self.objects.read().await;
        let count = objects
            .by_id
            .values()
            .filter(|(_, entity)| entity.type_name() == type_name)
            .count();
        Ok(count as u64)
    }

    async fn query_by_type(
        &self,
        type_name: &str,
        pattern: &str,
        pager: &Pager,
    ) -> Result<Page<Entity>, StoreError> {
        let objects = self.objects.read().await;
        let mut matching: Vec<&(u64, Entity)> = objects
            .by_id
            .values()
            .filter(|(_, entity)| {
                entity.type_name() == type_name && matches_pattern(pattern, entity.name())
            })
            .collect();
        matching.sort_by_key(|(seq, _)| *seq);

        let total = matching.len() as u64;
        let offset = usize::try_from(pager.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(pager.limit as usize)
            .map(|(_, entity)| entity.clone())
            .collect();

        Ok(Page {
            items,
            total,
            pager: *pager,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Object, Principal, Space, SPACE_TYPE};
    use serde_json::Value;

    fn space(name: &str) -> Entity {
        match Space::from_name(name) {
            Some(space) => Entity::Space(space),
            None => panic!("test space name must derive: {name}"),
        }
    }

    #[tokio::test]
    async fn create_refuses_existing_id() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        assert!(store.create(space("Team A")).await?.is_some());
        assert!(store.create(space("team a")).await?.is_none());
        assert_eq!(store.count_by_type(SPACE_TYPE).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_upserts_profiles_only() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        let profile = Entity::Profile(Principal::admin("u1", "Ada"));
        assert!(store.update(profile).await?.is_some());
        assert!(store.read("u1").await?.is_some());

        assert!(store.update(space("Ghost")).await?.is_none());
        assert!(store.read("space:ghost").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        store.create(space("Team A")).await?;
        store.delete("space:team-a").await?;
        store.delete("space:team-a").await?;
        assert!(store.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn query_pages_in_creation_order() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            store.create(space(name)).await?;
        }
        store
            .create(Entity::Object(Object {
                id: "q1".to_string(),
                type_name: "question".to_string(),
                name: Some("Alpha?".to_string()),
                fields: Value::Null,
            }))
            .await?;

        let first = store
            .query_by_type(SPACE_TYPE, "*", &Pager::new(1, 2))
            .await?;
        assert_eq!(first.total, 3);
        let ids: Vec<&str> = first.items.iter().map(Entity::id).collect();
        assert_eq!(ids, ["space:zeta", "space:alpha"]);

        let second = store
            .query_by_type(SPACE_TYPE, "*", &Pager::new(2, 2))
            .await?;
        let ids: Vec<&str> = second.items.iter().map(Entity::id).collect();
        assert_eq!(ids, ["space:mid"]);

        let filtered = store
            .query_by_type(SPACE_TYPE, "alp", &Pager::default())
            .await?;
        assert_eq!(filtered.total, 1);
        Ok(())
    }
}
