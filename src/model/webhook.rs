//! Webhook subscriptions and their event vocabulary.

use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const WEBHOOK_TYPE: &str = "webhook";

const SECRET_BYTES: usize = 32;

/// Lifecycle events a webhook can subscribe to.
///
/// `*All` variants fire for bulk operations; every flag is independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WebhookEvent {
    Create,
    Update,
    Delete,
    CreateAll,
    UpdateAll,
    DeleteAll,
}

impl WebhookEvent {
    pub const ALL: [Self; 6] = [
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::CreateAll,
        Self::UpdateAll,
        Self::DeleteAll,
    ];

    /// Returns the token accepted from admin forms for this event.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::CreateAll => "createAll",
            Self::UpdateAll => "updateAll",
            Self::DeleteAll => "deleteAll",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventFlags {
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub update: bool,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub create_all: bool,
    #[serde(default)]
    pub update_all: bool,
    #[serde(default)]
    pub delete_all: bool,
}

impl EventFlags {
    /// Sets each flag by exact membership of its token; unknown tokens are ignored.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::default();
        for token in tokens {
            if let Some(event) = WebhookEvent::ALL
                .into_iter()
                .find(|event| event.as_str() == token.as_ref())
            {
                flags.set(event, true);
            }
        }
        flags
    }

    #[must_use]
    pub fn is_set(&self, event: WebhookEvent) -> bool {
        match event {
            WebhookEvent::Create => self.create,
            WebhookEvent::Update => self.update,
            WebhookEvent::Delete => self.delete,
            WebhookEvent::CreateAll => self.create_all,
            WebhookEvent::UpdateAll => self.update_all,
            WebhookEvent::DeleteAll => self.delete_all,
        }
    }

    pub fn set(&mut self, event: WebhookEvent, value: bool) {
        let flag = match event {
            WebhookEvent::Create => &mut self.create,
            WebhookEvent::Update => &mut self.update,
            WebhookEvent::Delete => &mut self.delete,
            WebhookEvent::CreateAll => &mut self.create_all,
            WebhookEvent::UpdateAll => &mut self.update_all,
            WebhookEvent::DeleteAll => &mut self.delete_all,
        };
        *flag = value;
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    pub target_url: String,
    pub type_filter: String,
    #[serde(default)]
    pub url_encoded: bool,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Payload signing secret. Only ever produced by [`Webhook::reset_secret`].
    #[serde(default)]
    pub secret: String,
    #[serde(flatten)]
    pub events: EventFlags,
}

fn default_active() -> bool {
    true
}

impl Webhook {
    /// New active subscription with a fresh id and no secret yet.
    #[must_use]
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            target_url: target_url.into(),
            type_filter: String::new(),
            url_encoded: false,
            active: true,
            secret: String::new(),
            events: EventFlags::default(),
        }
    }

    /// Replaces the signing secret with 32 random bytes from the OS RNG.
    ///
    /// # Errors
    /// Returns an error if the OS random source is unavailable.
    pub fn reset_secret(&mut self) -> Result<(), rand::Error> {
        let mut bytes = [0u8; SECRET_BYTES];
        OsRng.try_fill_bytes(&mut bytes)?;
        self.secret = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);
        Ok(())
    }
}

impl std::fmt::Debug for Webhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Webhook")
            .field("id", &self.id)
            .field("target_url", &self.target_url)
            .field("type_filter", &self.type_filter)
            .field("url_encoded", &self.url_encoded)
            .field("active", &self.active)
            .field("secret", &"***")
            .field("events", &self.events)
            .finish()
    }
}
