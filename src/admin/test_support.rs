//! Store wrappers for manager tests: call counting and injected failures.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::model::{Entity, Principal, Space};
use crate::store::{MemoryStore, Page, Pager, Store, StoreError};

#[derive(Debug, Default)]
pub(crate) struct CountingStore {
    pub(crate) inner: MemoryStore,
    creates: AtomicUsize,
    reads: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
    decline_creates: AtomicBool,
    decline_updates: AtomicBool,
}

impl CountingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub(crate) fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `create` return `Ok(None)`.
    pub(crate) fn decline_creates(&self) {
        self.decline_creates.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent `update` return `Ok(None)`.
    pub(crate) fn decline_updates(&self) {
        self.decline_updates.store(true, Ordering::SeqCst);
    }

    pub(crate) fn accept_updates(&self) {
        self.decline_updates.store(false, Ordering::SeqCst);
    }

    /// Seeds a space without going through the counters.
    pub(crate) async fn seed_space(&self, name: &str) -> Space {
        let Some(space) = Space::from_name(name) else {
            panic!("seed space name must derive an id: {name}");
        };
        if let Err(err) = self.inner.create(Entity::Space(space.clone())).await {
            panic!("seeding space failed: {err}");
        }
        space
    }

    pub(crate) async fn seed(&self, entity: Entity) {
        if let Err(err) = self.inner.create(entity).await {
            panic!("seeding entity failed: {err}");
        }
    }

    pub(crate) async fn stored(&self, id: &str) -> Option<Entity> {
        self.inner.read(id).await.ok().flatten()
    }

    pub(crate) async fn stored_profile(&self, id: &str) -> Option<Principal> {
        self.stored(id).await.and_then(Entity::into_profile)
    }
}

#[async_trait]
impl Store for CountingStore {
    async fn create(&self, entity: Entity) -> Result<Option<Entity>, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.decline_creates.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.create(entity).await
    }

    async fn read(&self, id: &str) -> Result<Option<Entity>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(id).await
    }

    async fn update(&self, entity: Entity) -> Result<Option<Entity>, StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.decline_updates.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.update(entity).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }

    async fn count_by_type(&self, type_name: &str) -> Result<u64, StoreError> {
        self.inner.count_by_type(type_name).await
    }

    async fn query_by_type(
        &self,
        type_name: &str,
        pattern: &str,
        pager: &Pager,
    ) -> Result<Page<Entity>, StoreError> {
        self.inner.query_by_type(type_name, pattern, pager).await
    }
}
