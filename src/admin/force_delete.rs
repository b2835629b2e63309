//! Privileged deletion of any stored object by id.
//!
//! This path goes straight to [`Store::delete`] and skips the type-specific
//! cleanup a regular delete would do (counters, child objects, membership
//! lists). It exists for moderation of broken or abusive records.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use super::{gate, is_blank, store_failure, AdminResult, Outcome};
use crate::model::Principal;
use crate::store::Store;

/// Tracing target for records that must end up in the audit log.
pub const AUDIT_TARGET: &str = "audit";

/// Who deleted what.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuditRecord {
    pub actor_name: String,
    pub actor_id: String,
    pub object_type: String,
    pub object_id: String,
}

#[derive(Clone)]
pub struct ForceDeleteOperator {
    store: Arc<dyn Store>,
}

impl ForceDeleteOperator {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Deletes the object with `id` when the admin confirmed the action.
    ///
    /// # Errors
    /// `Persistence` when the store read or delete fails.
    #[instrument(skip(self, principal))]
    pub async fn force_delete(
        &self,
        id: &str,
        confirm: bool,
        principal: Option<&Principal>,
    ) -> AdminResult<AuditRecord> {
        if !gate::is_authorized(principal) {
            return Ok(Outcome::Denied);
        }
        let Some(actor) = principal else {
            return Ok(Outcome::Denied);
        };
        if !confirm || is_blank(id) {
            return Ok(Outcome::NoOp);
        }

        let id = id.trim();
        let Some(object) = self
            .store
            .read(id)
            .await
            .map_err(store_failure("read object"))?
        else {
            debug!("object not found");
            return Ok(Outcome::NoOp);
        };

        self.store
            .delete(id)
            .await
            .map_err(store_failure("delete object"))?;

        let record = AuditRecord {
            actor_name: actor.display_name.clone(),
            actor_id: actor.id.clone(),
            object_type: object.type_name().to_string(),
            object_id: id.to_string(),
        };
        info!(
            target: AUDIT_TARGET,
            actor_name = %record.actor_name,
            actor_id = %record.actor_id,
            object_type = %record.object_type,
            object_id = %record.object_id,
            "object force-deleted"
        );
        Ok(Outcome::Applied(record))
    }
}
