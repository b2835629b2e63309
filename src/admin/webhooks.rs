//! Webhook subscription management.
//!
//! All three operations are gated on the global `webhooks_enabled` flag.
//! Creation rejects a disabled feature as a validation failure so the form
//! shows an error; toggle and delete treat it as a silent no-op. Deletion is
//! keyed only by id and never reads the webhook first.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::{
    gate, is_blank, store_failure, AdminConfig, AdminError, AdminResult, Outcome,
    MSG_PERSISTENCE, MSG_REQUIRED_FIELD,
};
use crate::model::{Entity, EventFlags, Principal, Webhook};
use crate::store::Store;

/// Input for [`WebhookManager::create_webhook`].
#[derive(Clone, Debug, Default)]
pub struct CreateWebhook {
    pub target_url: String,
    pub type_filter: String,
    /// `true` to deliver JSON payloads; `false` for form-urlencoded ones.
    pub json: bool,
    pub events: BTreeSet<String>,
}

/// Accepts absolute `http`/`https` URLs with a host.
pub(crate) fn is_valid_target_url(value: &str) -> bool {
    Url::parse(value.trim()).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

#[derive(Clone)]
pub struct WebhookManager {
    store: Arc<dyn Store>,
    config: Arc<AdminConfig>,
}

impl WebhookManager {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: Arc<AdminConfig>) -> Self {
        Self { store, config }
    }

    /// Creates an active webhook with a fresh signing secret.
    ///
    /// # Errors
    /// - `Validation` when the URL is invalid or webhooks are disabled.
    /// - `Persistence` when the secret cannot be generated or the store does not create the webhook.
    #[instrument(skip(self, request, principal), fields(target_url = %request.target_url))]
    pub async fn create_webhook(
        &self,
        request: CreateWebhook,
        principal: Option<&Principal>,
    ) -> AdminResult<Webhook> {
        if !gate::is_authorized(principal) {
            return Ok(Outcome::Denied);
        }
        if !self.config.webhooks_enabled() || !is_valid_target_url(&request.target_url) {
            return Err(AdminError::Validation(MSG_REQUIRED_FIELD));
        }

        let mut webhook = Webhook::new(request.target_url.trim());
        webhook.events = EventFlags::from_tokens(&request.events);
        webhook.type_filter = self.config.resolve_type_filter(request.type_filter.trim());
        webhook.url_encoded = !request.json;
        if let Err(err) = webhook.reset_secret() {
            error!("Failed to generate webhook secret: {err}");
            return Err(AdminError::Persistence(MSG_PERSISTENCE));
        }

        match self.store.create(Entity::Webhook(webhook.clone())).await {
            Ok(Some(_)) => {
                info!(webhook_id = %webhook.id, type_filter = %webhook.type_filter, "webhook created");
                Ok(Outcome::Applied(webhook))
            }
            Ok(None) => {
                warn!(webhook_id = %webhook.id, "store declined webhook creation");
                Err(AdminError::Persistence(MSG_PERSISTENCE))
            }
            Err(err) => Err(store_failure("create webhook")(err)),
        }
    }

    /// Flips `active` on an existing webhook. Unknown ids are a no-op.
    ///
    /// # Errors
    /// `Persistence` when the store cannot be read or the update is not applied.
    #[instrument(skip(self, principal))]
    pub async fn toggle_webhook(&self, id: &str, principal: Option<&Principal>) -> AdminResult<Webhook> {
        if !gate::is_authorized(principal) {
            return Ok(Outcome::Denied);
        }
        if is_blank(id) || !self.config.webhooks_enabled() {
            return Ok(Outcome::NoOp);
        }

        let webhook = self
            .store
            .read(id.trim())
            .await
            .map_err(store_failure("read webhook"))?
            .and_then(Entity::into_webhook);
        let Some(mut webhook) = webhook else {
            debug!("webhook not found");
            return Ok(Outcome::NoOp);
        };

        webhook.active = !webhook.active;
        match self.store.update(Entity::Webhook(webhook.clone())).await {
            Ok(Some(_)) => {
                info!(webhook_id = %webhook.id, active = webhook.active, "webhook toggled");
                Ok(Outcome::Applied(webhook))
            }
            // Deleted between read and update.
            Ok(None) => Ok(Outcome::NoOp),
            Err(err) => Err(store_failure("update webhook")(err)),
        }
    }

    /// Ensures the webhook with `id` no longer exists.
    ///
    /// # Errors
    /// `Persistence` when the delete fails.
    #[instrument(skip(self, principal))]
    pub async fn delete_webhook(&self, id: &str, principal: Option<&Principal>) -> AdminResult<()> {
        if !gate::is_authorized(principal) {
            return Ok(Outcome::Denied);
        }
        if is_blank(id) || !self.config.webhooks_enabled() {
            return Ok(Outcome::NoOp);
        }

        self.store
            .delete(id.trim())
            .await
            .map_err(store_failure("delete webhook"))?;
        info!(webhook_id = %id.trim(), "webhook deleted");
        Ok(Outcome::Applied(()))
    }
}
