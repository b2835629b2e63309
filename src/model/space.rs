//! Spaces: named content partitions and the membership tokens that reference them.
//!
//! A space id is derived from its name, so two names that normalize to the
//! same slug collide on purpose. Members reference spaces through tokens of
//! the form `{id}{SEPARATOR}{name}`, e.g. `space:team-a:Team A`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::slug::normalize_slug;

pub const SPACE_TYPE: &str = "space";
pub const SPACE_ID_PREFIX: &str = "space";
pub const SEPARATOR: &str = ":";
pub const DEFAULT_SPACE_ID: &str = "space:default";

const SPACE_SLUG_MIN: usize = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Space {
    /// Builds a space from a display name, deriving its id.
    /// Returns `None` for names that are blank or contain nothing slug-worthy.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let id = space_id(name)?;
        Some(Self {
            is_default: is_default_space(&id),
            id,
            name: name.to_string(),
        })
    }

    /// Membership token stored in a principal's space list.
    #[must_use]
    pub fn token(&self) -> String {
        format!("{}{SEPARATOR}{}", self.id, self.name)
    }
}

/// Derives the space id for a display name.
#[must_use]
pub fn space_id(name: &str) -> Option<String> {
    let slug = normalize_slug(name, SPACE_SLUG_MIN)?;
    Some(format!("{SPACE_ID_PREFIX}{SEPARATOR}{slug}"))
}

/// Extracts the space id from a membership token.
///
/// Tokens carrying the id prefix yield their first two segments, and a prefixed
/// token with an empty slug is invalid. Anything else is treated as a bare name
/// and goes through the regular derivation.
#[must_use]
pub fn space_id_from_token(token: &str) -> Option<String> {
    let token = token.trim();
    let prefix = format!("{SPACE_ID_PREFIX}{SEPARATOR}");
    if let Some(rest) = token.strip_prefix(&prefix) {
        let slug = rest.split(SEPARATOR).next().unwrap_or_default();
        if slug.is_empty() {
            return None;
        }
        return Some(format!("{prefix}{slug}"));
    }
    space_id(token)
}

#[must_use]
pub fn is_default_space(id: &str) -> bool {
    id == DEFAULT_SPACE_ID
}
