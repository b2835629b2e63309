//! Webhook endpoints.

use axum::{
    body::Bytes,
    extract::{Extension, Form},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{
    principal::resolve_principal,
    response::{error_response, respond},
    state::AdminState,
    types::{CreateWebhookForm, ErrorBody, WebhookIdForm},
};
use crate::model::Webhook;

const TARGET_URL_FIELD: &str = "targetUrl";
const ID_FIELD: &str = "id";

#[utoipa::path(
    post,
    path = "/admin/create-webhook",
    request_body(content = CreateWebhookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Webhook created (AJAX).", body = Webhook),
        (status = 303, description = "Redirect to the dashboard."),
        (status = 400, description = "Invalid URL, webhooks disabled or store failure.", body = ErrorBody),
    ),
    tag = "webhooks"
)]
/// Registers a webhook. `events` may be repeated or comma separated.
///
/// Failures are rendered as `400` for form posts too, so the form can show
/// the error next to the URL field.
pub async fn create_webhook(
    headers: HeaderMap,
    state: Extension<Arc<AdminState>>,
    body: Bytes,
) -> Response {
    let request = CreateWebhookForm::parse(&body).into_request();
    let principal = resolve_principal(&headers, state.store()).await;
    match state
        .webhooks()
        .create_webhook(request, principal.as_ref())
        .await
    {
        Err(err) => error_response(TARGET_URL_FIELD, &err),
        result => respond(&headers, TARGET_URL_FIELD, result),
    }
}

#[utoipa::path(
    post,
    path = "/admin/toggle-webhook",
    request_body(content = WebhookIdForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Webhook toggled or nothing to do (AJAX).", body = Webhook),
        (status = 303, description = "Redirect to the dashboard."),
        (status = 400, description = "Store failure (AJAX).", body = ErrorBody),
    ),
    tag = "webhooks"
)]
/// Flips a webhook between active and inactive.
pub async fn toggle_webhook(
    headers: HeaderMap,
    state: Extension<Arc<AdminState>>,
    Form(form): Form<WebhookIdForm>,
) -> impl IntoResponse {
    let principal = resolve_principal(&headers, state.store()).await;
    let result = state
        .webhooks()
        .toggle_webhook(&form.id, principal.as_ref())
        .await;
    respond(&headers, ID_FIELD, result)
}

#[utoipa::path(
    post,
    path = "/admin/delete-webhook",
    request_body(content = WebhookIdForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Webhook deleted or nothing to do (AJAX)."),
        (status = 303, description = "Redirect to the dashboard."),
        (status = 400, description = "Store failure (AJAX).", body = ErrorBody),
    ),
    tag = "webhooks"
)]
/// Deletes a webhook by id. Unknown ids succeed.
pub async fn delete_webhook(
    headers: HeaderMap,
    state: Extension<Arc<AdminState>>,
    Form(form): Form<WebhookIdForm>,
) -> impl IntoResponse {
    let principal = resolve_principal(&headers, state.store()).await;
    let result = state
        .webhooks()
        .delete_webhook(&form.id, principal.as_ref())
        .await;
    respond(&headers, ID_FIELD, result)
}
