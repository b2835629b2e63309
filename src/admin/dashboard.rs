//! Everything the admin page renders in one read-only view.

use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use super::{gate, store_failure, AdminConfig, AdminResult, ConfigSnapshot, Outcome};
use crate::model::{Entity, Principal, Space, Webhook, SPACE_TYPE, WEBHOOK_TYPE};
use crate::store::{Page, Pager, Store};
use crate::GIT_COMMIT_HASH;

pub const SPACES_PAGE_LIMIT: u32 = 40;

/// Independent cursors for the two listings on the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DashboardPagers {
    pub spaces: Pager,
    pub webhooks: Pager,
}

impl Default for DashboardPagers {
    fn default() -> Self {
        Self {
            spaces: Pager::new(1, SPACES_PAGE_LIMIT),
            webhooks: Pager::default(),
        }
    }
}

impl DashboardPagers {
    /// Builds pagers from optional 1-based page numbers.
    #[must_use]
    pub fn from_pages(spaces_page: Option<u32>, webhooks_page: Option<u32>) -> Self {
        let defaults = Self::default();
        Self {
            spaces: Pager::new(spaces_page.unwrap_or(1), defaults.spaces.limit),
            webhooks: Pager::new(webhooks_page.unwrap_or(1), defaults.webhooks.limit),
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ListingPage<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> ListingPage<T> {
    fn from_entities(page: Page<Entity>, convert: impl Fn(Entity) -> Option<T>) -> Self {
        Self {
            total: page.total,
            page: page.pager.page,
            limit: page.pager.limit,
            items: page.items.into_iter().filter_map(convert).collect(),
        }
    }

    fn empty(pager: Pager) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: pager.page,
            limit: pager.limit,
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub spaces: ListingPage<Space>,
    pub webhooks: ListingPage<Webhook>,
    pub core_types: Vec<String>,
    pub webhooks_enabled: bool,
    pub version: String,
    pub commit: String,
    #[schema(value_type = Object)]
    pub config: ConfigSnapshot,
}

impl AdminDashboard {
    /// Loads the dashboard for an admin.
    ///
    /// The webhook listing is only queried while webhooks are enabled.
    ///
    /// # Errors
    /// `Persistence` when a listing query fails.
    #[instrument(skip_all)]
    pub async fn load(
        store: &dyn Store,
        config: &AdminConfig,
        snapshot: &ConfigSnapshot,
        principal: Option<&Principal>,
        pagers: DashboardPagers,
    ) -> AdminResult<Self> {
        if !gate::is_authorized(principal) {
            return Ok(Outcome::Denied);
        }

        let spaces = store
            .query_by_type(SPACE_TYPE, "*", &pagers.spaces)
            .await
            .map_err(store_failure("list spaces"))?;
        let webhooks = if config.webhooks_enabled() {
            let page = store
                .query_by_type(WEBHOOK_TYPE, "*", &pagers.webhooks)
                .await
                .map_err(store_failure("list webhooks"))?;
            ListingPage::from_entities(page, Entity::into_webhook)
        } else {
            ListingPage::empty(pagers.webhooks)
        };

        Ok(Outcome::Applied(Self {
            spaces: ListingPage::from_entities(spaces, Entity::into_space),
            webhooks,
            core_types: config.core_types().iter().cloned().collect(),
            webhooks_enabled: config.webhooks_enabled(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: GIT_COMMIT_HASH.to_string(),
            config: snapshot.clone(),
        }))
    }
}
