//! Principal extraction for admin handlers.
//!
//! Authentication happens upstream: the proxy in front of the service sets
//! `x-qadmin-user` to the authenticated user id. The profile (and with it the
//! admin flag) is loaded from the store. Anything that does not resolve to a
//! stored profile is treated as anonymous.

use axum::http::HeaderMap;
use tracing::{debug, error};

use crate::model::{Entity, Principal};
use crate::store::Store;

pub const USER_HEADER: &str = "x-qadmin-user";

/// Resolves the acting principal, or `None` for anonymous callers.
pub async fn resolve_principal(headers: &HeaderMap, store: &dyn Store) -> Option<Principal> {
    let user_id = headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())?;

    match store.read(user_id).await {
        Ok(Some(Entity::Profile(principal))) => Some(principal),
        Ok(_) => {
            debug!(user_id, "no profile for user");
            None
        }
        Err(err) => {
            error!("Failed to load profile: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::http::HeaderValue;

    fn headers(user: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(user) {
            headers.insert(USER_HEADER, value);
        }
        headers
    }

    #[tokio::test]
    async fn resolves_stored_profiles_only() {
        let store = MemoryStore::new();
        let seeded = store.create(Entity::Profile(Principal::admin("u1", "Ada"))).await;
        assert!(matches!(seeded, Ok(Some(_))));

        let principal = resolve_principal(&headers(" u1 "), &store).await;
        assert_eq!(principal.map(|p| p.is_admin), Some(true));
        assert!(resolve_principal(&headers("u404"), &store).await.is_none());
        assert!(resolve_principal(&headers(""), &store).await.is_none());
        assert!(resolve_principal(&HeaderMap::new(), &store).await.is_none());
    }

    #[tokio::test]
    async fn ids_of_other_types_are_anonymous() {
        let store = MemoryStore::new();
        let space = crate::model::Space::from_name("Team A");
        assert!(space.is_some());
        if let Some(space) = space {
            let id = space.id.clone();
            let _ = store.create(Entity::Space(space)).await;
            assert!(resolve_principal(&headers(&id), &store).await.is_none());
        }
    }
}
