//! Shared admin state handed to every handler through an `Extension`.

use std::sync::Arc;

use crate::admin::{AdminConfig, ConfigSnapshot, ForceDeleteOperator, SpaceManager, WebhookManager};
use crate::store::Store;

#[derive(Clone)]
pub struct AdminState {
    store: Arc<dyn Store>,
    config: Arc<AdminConfig>,
    snapshot: Arc<ConfigSnapshot>,
    spaces: SpaceManager,
    webhooks: WebhookManager,
    force_delete: ForceDeleteOperator,
}

impl AdminState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: AdminConfig, snapshot: ConfigSnapshot) -> Self {
        let config = Arc::new(config);
        Self {
            spaces: SpaceManager::new(store.clone()),
            webhooks: WebhookManager::new(store.clone(), config.clone()),
            force_delete: ForceDeleteOperator::new(store.clone()),
            snapshot: Arc::new(snapshot),
            config,
            store,
        }
    }

    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    #[must_use]
    pub fn snapshot(&self) -> &ConfigSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn spaces(&self) -> &SpaceManager {
        &self.spaces
    }

    #[must_use]
    pub fn webhooks(&self) -> &WebhookManager {
        &self.webhooks
    }

    #[must_use]
    pub fn force_delete(&self) -> &ForceDeleteOperator {
        &self.force_delete
    }
}
