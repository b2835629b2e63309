//! Admin dashboard endpoint.

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{
    principal::resolve_principal,
    response::denied,
    state::AdminState,
    types::{DashboardQuery, ErrorBody},
};
use crate::admin::{AdminDashboard, DashboardPagers, Outcome};

#[utoipa::path(
    get,
    path = "/admin",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard data.", body = AdminDashboard),
        (status = 303, description = "Caller is not an admin."),
        (status = 500, description = "Store failure.", body = ErrorBody),
    ),
    tag = "admin"
)]
/// Spaces, webhooks, core types, build info and the effective configuration.
pub async fn dashboard(
    headers: HeaderMap,
    state: Extension<Arc<AdminState>>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let principal = resolve_principal(&headers, state.store()).await;
    let pagers = DashboardPagers::from_pages(query.page, query.page1);
    let result = AdminDashboard::load(
        state.store(),
        state.config(),
        state.snapshot(),
        principal.as_ref(),
        pagers,
    )
    .await;

    match result {
        Ok(Outcome::Applied(dashboard)) => Json(dashboard).into_response(),
        Ok(Outcome::Denied | Outcome::NoOp) => denied(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("dashboard", err.message_key())),
        )
            .into_response(),
    }
}
