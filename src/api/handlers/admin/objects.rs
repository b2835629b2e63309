//! Privileged delete of any object, posted from moderation links across the site.

use axum::{
    extract::{Extension, Form},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
};
use std::sync::Arc;

use super::{
    principal::resolve_principal,
    response::{denied, error_response, is_ajax, safe_return_to},
    state::AdminState,
    types::{is_truthy, ErrorBody, ForceDeleteForm},
};
use crate::admin::{AuditRecord, Outcome};

#[utoipa::path(
    post,
    path = "/admin",
    request_body(content = ForceDeleteForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Object deleted (AJAX).", body = AuditRecord),
        (status = 303, description = "Redirect to `returnto` when it is a local path, the dashboard otherwise."),
        (status = 400, description = "Store failure (AJAX).", body = ErrorBody),
    ),
    tag = "objects"
)]
/// Deletes the object with `id` when `confirmdelete` is set.
///
/// Type-specific cleanup does not run, e.g. a deleted space stays in its
/// members' token lists.
pub async fn force_delete(
    headers: HeaderMap,
    state: Extension<Arc<AdminState>>,
    Form(form): Form<ForceDeleteForm>,
) -> Response {
    let principal = resolve_principal(&headers, state.store()).await;
    let confirm = is_truthy(form.confirmdelete.as_deref());
    let result = state
        .force_delete()
        .force_delete(&form.id, confirm, principal.as_ref())
        .await;

    let ajax = is_ajax(&headers);
    match result {
        Ok(Outcome::Denied) => denied(),
        Ok(Outcome::Applied(record)) if ajax => Json(record).into_response(),
        Ok(Outcome::NoOp) if ajax => StatusCode::OK.into_response(),
        Err(err) if ajax => error_response("id", &err),
        // Not-found, unconfirmed and failed deletes all land back where the admin came from.
        Ok(_) | Err(_) => Redirect::to(safe_return_to(form.returnto.as_deref())).into_response(),
    }
}
