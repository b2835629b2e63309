//! Space endpoints: create, remove, and repair membership.

use axum::{
    extract::{Extension, Form},
    http::HeaderMap,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{
    principal::resolve_principal,
    response::respond,
    state::AdminState,
    types::{ErrorBody, SpaceForm},
};
use crate::model::Space;

/// Form field errors are reported against.
const SPACE_FIELD: &str = "name";

#[utoipa::path(
    post,
    path = "/admin/add-space",
    request_body(content = SpaceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Space created (AJAX).", body = Space),
        (status = 303, description = "Redirect to the dashboard, with `code=7&error=true` on conflict."),
        (status = 400, description = "Invalid name, conflict or store failure (AJAX).", body = ErrorBody),
    ),
    tag = "spaces"
)]
/// Creates a space from its display name and makes the caller a member.
pub async fn add_space(
    headers: HeaderMap,
    state: Extension<Arc<AdminState>>,
    Form(form): Form<SpaceForm>,
) -> impl IntoResponse {
    let mut principal = resolve_principal(&headers, state.store()).await;
    let result = state.spaces().add_space(&form.space, principal.as_mut()).await;
    respond(&headers, SPACE_FIELD, result)
}

#[utoipa::path(
    post,
    path = "/admin/remove-space",
    request_body(content = SpaceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Space removed or nothing to do (AJAX)."),
        (status = 303, description = "Redirect to the dashboard."),
        (status = 400, description = "Missing space token (AJAX).", body = ErrorBody),
    ),
    tag = "spaces"
)]
/// Deletes a space by token. The default space is never removed.
pub async fn remove_space(
    headers: HeaderMap,
    state: Extension<Arc<AdminState>>,
    Form(form): Form<SpaceForm>,
) -> impl IntoResponse {
    let mut principal = resolve_principal(&headers, state.store()).await;
    let result = state
        .spaces()
        .remove_space(&form.space, principal.as_mut())
        .await;
    respond(&headers, SPACE_FIELD, result)
}

#[utoipa::path(
    post,
    path = "/admin/sync-space",
    request_body(content = SpaceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Membership repaired or already present (AJAX)."),
        (status = 303, description = "Redirect to the dashboard."),
        (status = 400, description = "Missing space token or store failure (AJAX).", body = ErrorBody),
    ),
    tag = "spaces"
)]
/// Adds an existing space to the caller's memberships if it is missing.
pub async fn sync_space(
    headers: HeaderMap,
    state: Extension<Arc<AdminState>>,
    Form(form): Form<SpaceForm>,
) -> impl IntoResponse {
    let mut principal = resolve_principal(&headers, state.store()).await;
    let result = state
        .spaces()
        .sync_membership(&form.space, principal.as_mut())
        .await;
    respond(&headers, SPACE_FIELD, result)
}
