//! Admin decisions for spaces, webhooks, and privileged object deletion.
//!
//! Every mutating operation starts with the same guard: non-admins get
//! [`Outcome::Denied`] and nothing else, so the admin surface never tells an
//! outsider whether a resource exists or why a request was ignored. Missing
//! resources on delete/toggle paths are [`Outcome::NoOp`], not errors.
//!
//! Flow Overview:
//! 1) Resolve the principal (done by the caller).
//! 2) Check [`gate::is_authorized`].
//! 3) Validate input and feature flags.
//! 4) Read/write through the [`Store`](crate::store::Store).
//!
//! None of the managers wrap their writes in a transaction. `add_space`
//! writes the space and then the principal; if the second write fails the
//! space stays and [`SpaceManager::sync_membership`] repairs the membership.

pub mod dashboard;
pub mod force_delete;
pub mod gate;
pub mod snapshot;
pub mod spaces;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod test_support;

pub use dashboard::{AdminDashboard, DashboardPagers};
pub use force_delete::{AuditRecord, ForceDeleteOperator};
pub use snapshot::ConfigSnapshot;
pub use spaces::SpaceManager;
pub use webhooks::{CreateWebhook, WebhookManager};

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Maximum number of stored spaces.
pub const MAX_SPACES: u64 = 10;

pub const MSG_REQUIRED_FIELD: &str = "requiredfield";
pub const MSG_PERSISTENCE: &str = "posts.error1";
pub const MSG_SPACE_CONFLICT: &str = "spaces.conflict";

/// Dashboard code the UI renders as "space limit reached or space exists".
pub const CONFLICT_ERROR_CODE: u16 = 7;

pub const DEFAULT_FALLBACK_TYPE: &str = "question";
pub const DEFAULT_CORE_TYPES: [&str; 10] = [
    "question",
    "reply",
    "comment",
    "profile",
    "revision",
    "badge",
    "report",
    "sticky",
    "unapprovedquestion",
    "unapprovedreply",
];

/// Result of an admin operation that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation changed (or re-asserted) state.
    Applied(T),
    /// Nothing to do: missing target, disabled feature, or unconfirmed request.
    NoOp,
    /// The caller is not an admin. Carries no detail on purpose.
    Denied,
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }

    #[must_use]
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::NoOp | Self::Denied => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error("missing or invalid required field ({0})")]
    Validation(&'static str),
    #[error("space limit reached or space already exists")]
    CapacityOrConflict,
    #[error("store did not persist the change ({0})")]
    Persistence(&'static str),
}

impl AdminError {
    /// Localization key shown to the admin.
    #[must_use]
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Validation(key) | Self::Persistence(key) => *key,
            Self::CapacityOrConflict => MSG_SPACE_CONFLICT,
        }
    }

    /// Dashboard error code for redirects, when the UI knows one.
    #[must_use]
    pub fn error_code(&self) -> Option<u16> {
        match self {
            Self::CapacityOrConflict => Some(CONFLICT_ERROR_CODE),
            Self::Validation(_) | Self::Persistence(_) => None,
        }
    }
}

pub type AdminResult<T> = Result<Outcome<T>, AdminError>;

#[derive(Clone, Debug)]
pub struct AdminConfig {
    webhooks_enabled: bool,
    core_types: BTreeSet<String>,
    fallback_type: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            webhooks_enabled: false,
            core_types: DEFAULT_CORE_TYPES.iter().map(ToString::to_string).collect(),
            fallback_type: DEFAULT_FALLBACK_TYPE.to_string(),
        }
    }

    #[must_use]
    pub fn with_webhooks_enabled(mut self, enabled: bool) -> Self {
        self.webhooks_enabled = enabled;
        self
    }

    /// Replaces the core type whitelist. Blank entries are dropped.
    #[must_use]
    pub fn with_core_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.core_types = types
            .into_iter()
            .map(|value| value.as_ref().trim().to_string())
            .filter(|value| !value.is_empty())
            .collect();
        self
    }

    #[must_use]
    pub fn with_fallback_type(mut self, fallback: String) -> Self {
        self.fallback_type = fallback;
        self
    }

    #[must_use]
    pub fn webhooks_enabled(&self) -> bool {
        self.webhooks_enabled
    }

    #[must_use]
    pub fn core_types(&self) -> &BTreeSet<String> {
        &self.core_types
    }

    #[must_use]
    pub fn fallback_type(&self) -> &str {
        &self.fallback_type
    }

    /// Returns `requested` when it is a core type, the fallback type otherwise.
    #[must_use]
    pub fn resolve_type_filter(&self, requested: &str) -> String {
        if self.core_types.contains(requested) {
            requested.to_string()
        } else {
            self.fallback_type.clone()
        }
    }
}

/// `true` when the input is missing or whitespace only.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Logs a store failure and maps it to the generic persistence error.
pub(crate) fn store_failure(action: &'static str) -> impl FnOnce(StoreError) -> AdminError {
    move |err| {
        error!("Failed to {action}: {err}");
        AdminError::Persistence(MSG_PERSISTENCE)
    }
}
