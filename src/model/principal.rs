//! The acting user, as resolved by the upstream authentication layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;

pub const PROFILE_TYPE: &str = "profile";

/// Authenticated user context plus the space memberships this core maintains.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub is_admin: bool,
    /// Membership tokens, `{space id}:{space name}`.
    #[serde(default)]
    pub spaces: BTreeSet<String>,
}

impl Principal {
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn admin(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::new(id, display_name)
        }
    }
}
