//! Space lifecycle and the acting principal's membership list.
//!
//! Creating a space is a two-step write: the space itself, then the
//! principal's token list. There is no transaction spanning both, so a
//! failure in between leaves a stored space the creator is not yet a member
//! of. That state is logged and repaired by [`SpaceManager::sync_membership`],
//! which is safe to call any number of times.
//!
//! Concurrent creators of the same name can both pass the existence check;
//! the store's compare-and-create decides the winner and the loser gets a
//! persistence error. The capacity check is not serialized.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    gate, is_blank, store_failure, AdminError, AdminResult, Outcome, MAX_SPACES, MSG_PERSISTENCE,
    MSG_REQUIRED_FIELD,
};
use crate::model::{space_id_from_token, is_default_space, Entity, Principal, Space, SPACE_TYPE};
use crate::store::Store;

#[derive(Clone)]
pub struct SpaceManager {
    store: Arc<dyn Store>,
}

impl SpaceManager {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates a space named `name` and adds it to the principal's memberships.
    ///
    /// # Errors
    /// - `Validation` for blank names or names without any slug characters.
    /// - `CapacityOrConflict` for the default space, a full store, or an existing id.
    /// - `Persistence` when the store does not create the space.
    #[instrument(skip(self, principal))]
    pub async fn add_space(
        &self,
        name: &str,
        principal: Option<&mut Principal>,
    ) -> AdminResult<Space> {
        let Some(principal) = gate::admit(principal) else {
            return Ok(Outcome::Denied);
        };
        if is_blank(name) {
            return Err(AdminError::Validation(MSG_REQUIRED_FIELD));
        }
        let Some(space) = Space::from_name(name) else {
            return Err(AdminError::Validation(MSG_REQUIRED_FIELD));
        };

        if space.is_default {
            debug!(space_id = %space.id, "refusing to create the default space");
            return Err(AdminError::CapacityOrConflict);
        }
        let count = self
            .store
            .count_by_type(SPACE_TYPE)
            .await
            .map_err(store_failure("count spaces"))?;
        if count >= MAX_SPACES {
            debug!(count, "space limit reached");
            return Err(AdminError::CapacityOrConflict);
        }
        let existing = self
            .store
            .read(&space.id)
            .await
            .map_err(store_failure("look up space"))?;
        if existing.is_some() {
            debug!(space_id = %space.id, "space already exists");
            return Err(AdminError::CapacityOrConflict);
        }

        match self.store.create(Entity::Space(space.clone())).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(space_id = %space.id, "store declined space creation");
                return Err(AdminError::Persistence(MSG_PERSISTENCE));
            }
            Err(err) => return Err(store_failure("create space")(err)),
        }

        principal.spaces.insert(space.token());
        if !self.persist_principal(principal).await {
            warn!(
                space_id = %space.id,
                principal_id = %principal.id,
                "space created but membership not persisted; sync_membership will repair it"
            );
        }

        info!(space_id = %space.id, principal_id = %principal.id, "space created");
        Ok(Outcome::Applied(space))
    }

    /// Deletes the space behind `token` and drops every membership token for
    /// that space from the principal, whether `token` is a full token or a bare name.
    ///
    /// Deleting an absent space succeeds; the default space is never deleted.
    ///
    /// # Errors
    /// - `Validation` for blank or unparseable tokens.
    /// - `Persistence` when the delete itself fails.
    #[instrument(skip(self, principal))]
    pub async fn remove_space(
        &self,
        token: &str,
        principal: Option<&mut Principal>,
    ) -> AdminResult<()> {
        let Some(principal) = gate::admit(principal) else {
            return Ok(Outcome::Denied);
        };
        if is_blank(token) {
            return Err(AdminError::Validation(MSG_REQUIRED_FIELD));
        }
        let Some(space_id) = space_id_from_token(token) else {
            return Err(AdminError::Validation(MSG_REQUIRED_FIELD));
        };
        if is_default_space(&space_id) {
            debug!("ignoring removal of the default space");
            return Ok(Outcome::NoOp);
        }

        self.store
            .delete(&space_id)
            .await
            .map_err(store_failure("delete space"))?;

        principal
            .spaces
            .retain(|member| space_id_from_token(member).as_deref() != Some(space_id.as_str()));
        if !self.persist_principal(principal).await {
            warn!(%space_id, principal_id = %principal.id, "space removed but membership not persisted");
        }

        info!(%space_id, principal_id = %principal.id, "space removed");
        Ok(Outcome::Applied(()))
    }

    /// Re-adds the membership token for an existing space if it is missing.
    ///
    /// # Errors
    /// - `Validation` for blank or unparseable tokens.
    /// - `Persistence` when the store cannot be read or the principal cannot be saved.
    #[instrument(skip(self, principal))]
    pub async fn sync_membership(
        &self,
        token: &str,
        principal: Option<&mut Principal>,
    ) -> AdminResult<()> {
        let Some(principal) = gate::admit(principal) else {
            return Ok(Outcome::Denied);
        };
        if is_blank(token) {
            return Err(AdminError::Validation(MSG_REQUIRED_FIELD));
        }
        let Some(space_id) = space_id_from_token(token) else {
            return Err(AdminError::Validation(MSG_REQUIRED_FIELD));
        };

        let space = self
            .store
            .read(&space_id)
            .await
            .map_err(store_failure("look up space"))?
            .and_then(Entity::into_space);
        let Some(space) = space else {
            return Ok(Outcome::NoOp);
        };

        if !principal.spaces.insert(space.token()) {
            return Ok(Outcome::NoOp);
        }
        if !self.persist_principal(principal).await {
            return Err(AdminError::Persistence(MSG_PERSISTENCE));
        }

        info!(%space_id, principal_id = %principal.id, "membership repaired");
        Ok(Outcome::Applied(()))
    }

    /// Saves the principal's profile, returning `false` if the store did not take it.
    async fn persist_principal(&self, principal: &Principal) -> bool {
        match self.store.update(Entity::Profile(principal.clone())).await {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(err) => {
                warn!("Failed to update principal {}: {err}", principal.id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::test_support::CountingStore;
    use crate::model::DEFAULT_SPACE_ID;
    use crate::store::StoreError;

    fn setup() -> (Arc<CountingStore>, SpaceManager) {
        let store = Arc::new(CountingStore::new());
        let manager = SpaceManager::new(store.clone());
        (store, manager)
    }

    #[tokio::test]
    async fn blank_names_fail_validation_without_store_writes() {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");
        for name in ["", " ", "\t\n", "%%%"] {
            let result = manager.add_space(name, Some(&mut admin)).await;
            assert_eq!(result, Err(AdminError::Validation(MSG_REQUIRED_FIELD)));
        }
        assert_eq!(store.creates(), 0);
        assert!(admin.spaces.is_empty());
    }

    #[tokio::test]
    async fn non_admin_is_denied_before_anything_else() {
        let (store, manager) = setup();
        let mut member = Principal::new("u2", "Bob");
        assert_eq!(
            manager.add_space("test", Some(&mut member)).await,
            Ok(Outcome::Denied)
        );
        assert_eq!(manager.add_space("test", None).await, Ok(Outcome::Denied));
        assert_eq!(manager.add_space("", Some(&mut member)).await, Ok(Outcome::Denied));
        assert_eq!(store.creates(), 0);
        assert_eq!(store.reads(), 0);
        assert!(member.spaces.is_empty());
    }

    #[tokio::test]
    async fn admin_creates_space_and_membership_token() -> Result<(), StoreError> {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");

        let outcome = manager.add_space("Team A", Some(&mut admin)).await;
        let Ok(Outcome::Applied(space)) = outcome else {
            panic!("expected applied outcome, got {outcome:?}");
        };
        assert_eq!(space.id, "space:team-a");
        assert_eq!(store.count_by_type(SPACE_TYPE).await?, 1);
        assert!(store.stored("space:team-a").await.is_some());

        let tokens: Vec<&str> = admin.spaces.iter().map(String::as_str).collect();
        assert_eq!(tokens, ["space:team-a:Team A"]);
        let profile = store.stored_profile("u1").await;
        assert_eq!(profile.map(|p| p.spaces), Some(admin.spaces.clone()));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_and_keeps_one_space() -> Result<(), StoreError> {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");
        assert!(manager
            .add_space("Team A", Some(&mut admin))
            .await
            .is_ok_and(|outcome| outcome.applied().is_some()));
        assert_eq!(
            manager.add_space("team  a", Some(&mut admin)).await,
            Err(AdminError::CapacityOrConflict)
        );
        assert_eq!(store.count_by_type(SPACE_TYPE).await?, 1);
        assert_eq!(store.creates(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn eleventh_space_hits_capacity() {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");
        for index in 0..MAX_SPACES {
            let outcome = manager
                .add_space(&format!("Space {index}"), Some(&mut admin))
                .await;
            assert!(matches!(outcome, Ok(Outcome::Applied(_))), "{outcome:?}");
        }
        assert_eq!(
            manager.add_space("One Too Many", Some(&mut admin)).await,
            Err(AdminError::CapacityOrConflict)
        );
        assert_eq!(store.creates(), 10);
        assert_eq!(admin.spaces.len(), 10);
    }

    #[tokio::test]
    async fn default_space_cannot_be_created_or_removed() {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");
        assert_eq!(
            manager.add_space("default", Some(&mut admin)).await,
            Err(AdminError::CapacityOrConflict)
        );
        assert_eq!(
            manager.remove_space(DEFAULT_SPACE_ID, Some(&mut admin)).await,
            Ok(Outcome::NoOp)
        );
        assert_eq!(store.creates(), 0);
        assert_eq!(store.deletes(), 0);
    }

    #[tokio::test]
    async fn declined_create_reports_persistence_and_leaves_principal() {
        let (store, manager) = setup();
        store.decline_creates();
        let mut admin = Principal::admin("u1", "Ada");
        assert_eq!(
            manager.add_space("Team A", Some(&mut admin)).await,
            Err(AdminError::Persistence(MSG_PERSISTENCE))
        );
        assert!(admin.spaces.is_empty());
        assert_eq!(store.updates(), 0);
    }

    #[tokio::test]
    async fn failed_membership_write_still_returns_space_and_sync_repairs() {
        let (store, manager) = setup();
        store.decline_updates();
        let mut admin = Principal::admin("u1", "Ada");

        let outcome = manager.add_space("Team A", Some(&mut admin)).await;
        assert!(matches!(outcome, Ok(Outcome::Applied(_))), "{outcome:?}");
        assert!(store.stored("space:team-a").await.is_some());
        assert!(store.stored_profile("u1").await.is_none());

        // The next request loads the profile as it was last persisted.
        store.accept_updates();
        let mut reloaded = Principal::admin("u1", "Ada");
        assert_eq!(
            manager.sync_membership("space:team-a", Some(&mut reloaded)).await,
            Ok(Outcome::Applied(()))
        );
        assert!(reloaded.spaces.contains("space:team-a:Team A"));
        assert_eq!(
            store.stored_profile("u1").await.map(|p| p.spaces),
            Some(reloaded.spaces.clone())
        );

        assert_eq!(
            manager.sync_membership("Team A", Some(&mut reloaded)).await,
            Ok(Outcome::NoOp)
        );
        assert_eq!(store.updates(), 2);
    }

    #[tokio::test]
    async fn sync_membership_ignores_missing_spaces() {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");
        assert_eq!(
            manager.sync_membership("space:ghost:Ghost", Some(&mut admin)).await,
            Ok(Outcome::NoOp)
        );
        assert!(admin.spaces.is_empty());
        assert_eq!(store.updates(), 0);
    }

    #[tokio::test]
    async fn remove_space_deletes_and_drops_token() {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");
        let outcome = manager.add_space("Team A", Some(&mut admin)).await;
        let Ok(Outcome::Applied(space)) = outcome else {
            panic!("expected applied outcome, got {outcome:?}");
        };

        assert_eq!(
            manager.remove_space(&space.token(), Some(&mut admin)).await,
            Ok(Outcome::Applied(()))
        );
        assert!(store.stored(&space.id).await.is_none());
        assert!(admin.spaces.is_empty());
        assert_eq!(
            store.stored_profile("u1").await.map(|p| p.spaces.len()),
            Some(0)
        );
    }

    #[tokio::test]
    async fn remove_space_by_bare_name_drops_full_token() {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");
        admin.spaces.insert("space:team-b:Team B".to_string());
        let outcome = manager.add_space("Team A", Some(&mut admin)).await;
        assert!(matches!(outcome, Ok(Outcome::Applied(_))), "{outcome:?}");

        assert_eq!(
            manager.remove_space("Team A", Some(&mut admin)).await,
            Ok(Outcome::Applied(()))
        );
        assert!(store.stored("space:team-a").await.is_none());
        let tokens: Vec<&str> = admin.spaces.iter().map(String::as_str).collect();
        assert_eq!(tokens, ["space:team-b:Team B"]);
    }

    #[tokio::test]
    async fn unicode_names_create_distinct_spaces() {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");

        let outcome = manager.add_space("日本語", Some(&mut admin)).await;
        let Ok(Outcome::Applied(space)) = outcome else {
            panic!("expected applied outcome, got {outcome:?}");
        };
        assert_eq!(space.id, "space:日本語");

        for name in ["Über", "ber"] {
            let outcome = manager.add_space(name, Some(&mut admin)).await;
            assert!(matches!(outcome, Ok(Outcome::Applied(_))), "{name}: {outcome:?}");
        }
        assert!(store.stored("space:über").await.is_some());
        assert!(store.stored("space:ber").await.is_some());
    }

    #[tokio::test]
    async fn long_names_sharing_a_prefix_do_not_conflict() {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");
        let prefix = "x".repeat(70);
        for suffix in ["A", "B"] {
            let outcome = manager
                .add_space(&format!("{prefix}{suffix}"), Some(&mut admin))
                .await;
            assert!(matches!(outcome, Ok(Outcome::Applied(_))), "{outcome:?}");
        }
        assert_eq!(store.creates(), 2);
        assert_eq!(admin.spaces.len(), 2);
    }

    #[tokio::test]
    async fn prefixed_token_without_slug_fails_validation() {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");
        assert_eq!(
            manager.remove_space("space::x", Some(&mut admin)).await,
            Err(AdminError::Validation(MSG_REQUIRED_FIELD))
        );
        assert_eq!(
            manager.sync_membership("space::x", Some(&mut admin)).await,
            Err(AdminError::Validation(MSG_REQUIRED_FIELD))
        );
        assert_eq!(store.deletes(), 0);
    }

    #[tokio::test]
    async fn removing_unknown_space_is_a_successful_noop() {
        let (store, manager) = setup();
        let mut admin = Principal::admin("u1", "Ada");
        admin.spaces.insert("space:team-b:Team B".to_string());
        let before = admin.spaces.clone();

        let outcome = manager
            .remove_space("space:ghost:Ghost", Some(&mut admin))
            .await;
        assert_eq!(outcome, Ok(Outcome::Applied(())));
        assert_eq!(admin.spaces, before);
        assert_eq!(store.deletes(), 1);

        let again = manager
            .remove_space("space:ghost:Ghost", Some(&mut admin))
            .await;
        assert_eq!(again, Ok(Outcome::Applied(())));
    }

    #[tokio::test]
    async fn remove_space_requires_admin_and_token() {
        let (store, manager) = setup();
        let mut member = Principal::new("u2", "Bob");
        let mut admin = Principal::admin("u1", "Ada");
        assert_eq!(
            manager.remove_space("space:a:A", Some(&mut member)).await,
            Ok(Outcome::Denied)
        );
        assert_eq!(
            manager.remove_space("  ", Some(&mut admin)).await,
            Err(AdminError::Validation(MSG_REQUIRED_FIELD))
        );
        assert_eq!(store.deletes(), 0);
    }
}
