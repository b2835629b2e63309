//! Request/response payloads for the admin endpoints.
//!
//! Admin forms are posted as `application/x-www-form-urlencoded`. Fields are
//! optional at the wire level so a missing field reaches the admin logic as a
//! blank value and is reported like any other invalid input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::form_urlencoded;
use utoipa::{IntoParams, ToSchema};

use crate::admin::CreateWebhook;

/// Checkbox-style boolean: `true`, `on`, `yes` and `1` count as set.
pub(crate) fn is_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "true" | "on" | "yes" | "1"
        )
    })
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SpaceForm {
    /// Space name for `add-space`, space token for `remove-space` and `sync-space`.
    #[serde(default)]
    pub space: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct WebhookIdForm {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ForceDeleteForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub confirmdelete: Option<String>,
    /// Local path to go back to after the delete.
    #[serde(default)]
    pub returnto: Option<String>,
}

/// `events` may repeat (one field per checkbox) or hold a comma separated list.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateWebhookForm {
    #[serde(default, rename = "targetUrl")]
    pub target_url: String,
    #[serde(default, rename = "type")]
    pub type_filter: String,
    #[serde(default)]
    pub json: Option<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

impl CreateWebhookForm {
    #[must_use]
    pub fn parse(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (key, value) in form_urlencoded::parse(body) {
            match key.as_ref() {
                "targetUrl" => form.target_url = value.into_owned(),
                "type" => form.type_filter = value.into_owned(),
                "json" => form.json = Some(value.into_owned()),
                "events" => form.events.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|event| !event.is_empty())
                        .map(ToString::to_string),
                ),
                _ => {}
            }
        }
        form
    }

    #[must_use]
    pub fn into_request(self) -> CreateWebhook {
        CreateWebhook {
            json: is_truthy(self.json.as_deref()),
            target_url: self.target_url,
            type_filter: self.type_filter,
            events: self.events.into_iter().collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Spaces page (1-based).
    pub page: Option<u32>,
    /// Webhooks page (1-based).
    pub page1: Option<u32>,
}

/// Error body for AJAX callers: form field name to message key.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: BTreeMap<String, String>,
}

impl ErrorBody {
    #[must_use]
    pub fn new(field: &str, message_key: &str) -> Self {
        Self {
            error: BTreeMap::from([(field.to_string(), message_key.to_string())]),
        }
    }
}
