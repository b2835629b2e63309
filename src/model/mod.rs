//! Persisted entities handled by the admin surface.
//!
//! The store is type-agnostic, so everything it holds is an [`Entity`]: a
//! closed set of variants the admin logic understands plus a generic
//! [`Object`] for any other content type (questions, replies, ...). Only the
//! type name and id are needed to delete an entity.

mod principal;
mod slug;
mod space;
mod webhook;

pub use principal::{Principal, PROFILE_TYPE};
pub use space::{
    is_default_space, space_id, space_id_from_token, Space, DEFAULT_SPACE_ID, SEPARATOR,
    SPACE_ID_PREFIX, SPACE_TYPE,
};
pub use webhook::{EventFlags, Webhook, WebhookEvent, WEBHOOK_TYPE};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Any persisted object the admin surface does not model explicitly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Object {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Space(Space),
    Webhook(Webhook),
    Profile(Principal),
    Object(Object),
}

impl Entity {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Space(space) => &space.id,
            Self::Webhook(webhook) => &webhook.id,
            Self::Profile(principal) => &principal.id,
            Self::Object(object) => &object.id,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Space(_) => SPACE_TYPE,
            Self::Webhook(_) => WEBHOOK_TYPE,
            Self::Profile(_) => PROFILE_TYPE,
            Self::Object(object) => &object.type_name,
        }
    }

    /// Display name used for pattern queries.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Space(space) => Some(&space.name),
            Self::Webhook(webhook) => Some(&webhook.target_url),
            Self::Profile(principal) => Some(&principal.display_name),
            Self::Object(object) => object.name.as_deref(),
        }
    }

    /// Serializes the typed payload; the type name travels separately.
    ///
    /// # Errors
    /// Returns an error if the payload cannot be represented as JSON.
    pub fn to_body(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Space(space) => serde_json::to_value(space),
            Self::Webhook(webhook) => serde_json::to_value(webhook),
            Self::Profile(principal) => serde_json::to_value(principal),
            Self::Object(object) => serde_json::to_value(object),
        }
    }

    /// Rebuilds an entity from its stored type name and payload.
    ///
    /// # Errors
    /// Returns an error if the payload does not match the shape of its type.
    pub fn from_parts(type_name: &str, body: Value) -> Result<Self, serde_json::Error> {
        Ok(match type_name {
            SPACE_TYPE => Self::Space(serde_json::from_value(body)?),
            WEBHOOK_TYPE => Self::Webhook(serde_json::from_value(body)?),
            PROFILE_TYPE => Self::Profile(serde_json::from_value(body)?),
            _ => Self::Object(serde_json::from_value(body)?),
        })
    }

    #[must_use]
    pub fn into_webhook(self) -> Option<Webhook> {
        match self {
            Self::Webhook(webhook) => Some(webhook),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_space(self) -> Option<Space> {
        match self {
            Self::Space(space) => Some(space),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_profile(self) -> Option<Principal> {
        match self {
            Self::Profile(principal) => Some(principal),
            _ => None,
        }
    }
}

impl From<Space> for Entity {
    fn from(space: Space) -> Self {
        Self::Space(space)
    }
}

impl From<Webhook> for Entity {
    fn from(webhook: Webhook) -> Self {
        Self::Webhook(webhook)
    }
}

impl From<Principal> for Entity {
    fn from(principal: Principal) -> Self {
        Self::Profile(principal)
    }
}

impl From<Object> for Entity {
    fn from(object: Object) -> Self {
        Self::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parts_round_trip_keeps_variant() {
        let space = Space::from_name("Team A").map(Entity::from);
        let Some(space) = space else {
            panic!("space should derive");
        };
        let body = space.to_body().unwrap_or_default();
        let rebuilt = Entity::from_parts(space.type_name(), body).ok();
        assert_eq!(rebuilt, Some(space));
    }

    #[test]
    fn unknown_types_become_generic_objects() {
        let body = json!({"id": "q1", "type": "question", "name": "How?", "fields": {"votes": 3}});
        let entity = Entity::from_parts("question", body).ok();
        let Some(entity) = entity else {
            panic!("generic object should parse");
        };
        assert_eq!(entity.type_name(), "question");
        assert_eq!(entity.id(), "q1");
        assert_eq!(entity.name(), Some("How?"));
    }

    #[test]
    fn typed_payload_mismatch_is_an_error() {
        assert!(Entity::from_parts(WEBHOOK_TYPE, json!({"id": 1})).is_err());
    }
}
