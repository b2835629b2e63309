//! Maps admin outcomes onto HTTP.
//!
//! The admin page is served to two kinds of callers. Browsers posting a plain
//! form get a `303` back to the dashboard. Scripted calls marked with
//! `X-Requested-With: XMLHttpRequest` get a status code and a JSON body.
//! Denied callers are always sent home without detail.

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
};
use serde::Serialize;

use super::types::ErrorBody;
use crate::admin::{AdminError, AdminResult, Outcome};

pub const ADMIN_LINK: &str = "/admin";
pub const HOME_LINK: &str = "/";

const REQUESTED_WITH: &str = "x-requested-with";
const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

pub fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get(REQUESTED_WITH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case(XML_HTTP_REQUEST))
}

/// Returns `candidate` when it is a local absolute path, the dashboard otherwise.
///
/// Protocol-relative (`//host`) and backslash variants are rejected so the
/// redirect can never leave the site.
pub fn safe_return_to(candidate: Option<&str>) -> &str {
    match candidate.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => ADMIN_LINK,
    }
}

/// Redirect target for a failed form post.
pub fn error_location(err: &AdminError) -> String {
    match err.error_code() {
        Some(code) => format!("{ADMIN_LINK}?code={code}&error=true"),
        None => ADMIN_LINK.to_string(),
    }
}

pub fn error_response(field: &str, err: &AdminError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::new(field, err.message_key())),
    )
        .into_response()
}

pub fn denied() -> Response {
    Redirect::to(HOME_LINK).into_response()
}

/// Standard mapping used by the space and webhook endpoints.
///
/// `field` names the form input an error is reported against.
pub fn respond<T: Serialize>(headers: &HeaderMap, field: &str, result: AdminResult<T>) -> Response {
    let ajax = is_ajax(headers);
    match result {
        Ok(Outcome::Denied) => denied(),
        Ok(Outcome::Applied(value)) if ajax => (StatusCode::OK, Json(value)).into_response(),
        Ok(Outcome::NoOp) if ajax => StatusCode::OK.into_response(),
        Ok(Outcome::Applied(_) | Outcome::NoOp) => Redirect::to(ADMIN_LINK).into_response(),
        Err(err) if ajax => error_response(field, &err),
        Err(err) => Redirect::to(&error_location(&err)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{MSG_PERSISTENCE, MSG_REQUIRED_FIELD};
    use axum::http::{header::LOCATION, HeaderValue};

    fn ajax_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
        headers
    }

    fn location(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    #[test]
    fn detects_ajax() {
        assert!(is_ajax(&ajax_headers()));
        assert!(!is_ajax(&HeaderMap::new()));
    }

    #[test]
    fn return_to_must_stay_local() {
        assert_eq!(safe_return_to(Some("/questions/42")), "/questions/42");
        assert_eq!(safe_return_to(Some("//evil.example")), ADMIN_LINK);
        assert_eq!(safe_return_to(Some("/\\evil.example")), ADMIN_LINK);
        assert_eq!(safe_return_to(Some("https://evil.example")), ADMIN_LINK);
        assert_eq!(safe_return_to(Some("/a\r\nSet-Cookie: x")), ADMIN_LINK);
        assert_eq!(safe_return_to(Some("")), ADMIN_LINK);
        assert_eq!(safe_return_to(None), ADMIN_LINK);
    }

    #[test]
    fn conflict_redirects_carry_code() {
        assert_eq!(
            error_location(&AdminError::CapacityOrConflict),
            "/admin?code=7&error=true"
        );
        assert_eq!(
            error_location(&AdminError::Validation(MSG_REQUIRED_FIELD)),
            "/admin"
        );
    }

    #[test]
    fn form_posts_redirect() {
        let headers = HeaderMap::new();
        let response = respond(&headers, "name", Ok(Outcome::Applied(1)));
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some(ADMIN_LINK));

        let response = respond::<()>(&headers, "name", Err(AdminError::CapacityOrConflict));
        assert_eq!(location(&response), Some("/admin?code=7&error=true"));

        let response = respond::<()>(&headers, "name", Ok(Outcome::Denied));
        assert_eq!(location(&response), Some(HOME_LINK));
    }

    #[test]
    fn ajax_gets_status_codes() {
        let headers = ajax_headers();
        assert_eq!(
            respond(&headers, "name", Ok(Outcome::Applied(1))).status(),
            StatusCode::OK
        );
        assert_eq!(
            respond::<()>(&headers, "name", Ok(Outcome::NoOp)).status(),
            StatusCode::OK
        );
        assert_eq!(
            respond::<()>(&headers, "name", Err(AdminError::Persistence(MSG_PERSISTENCE))).status(),
            StatusCode::BAD_REQUEST
        );
        let response = respond::<()>(&headers, "name", Ok(Outcome::Denied));
        assert_eq!(location(&response), Some(HOME_LINK));
    }
}
