use super::handlers::{admin, health};
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Router that also drives the `OpenAPI` document.
///
/// Register endpoints here with `.routes(routes!(...))` so they are served
/// and documented from the same `#[utoipa::path]` attributes.
pub(crate) fn api_router() -> OpenApiRouter {
    OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(
            admin::dashboard::dashboard,
            admin::objects::force_delete
        ))
        .routes(routes!(admin::spaces::add_space))
        .routes(routes!(admin::spaces::remove_space))
        .routes(routes!(admin::spaces::sync_space))
        .routes(routes!(admin::webhooks::create_webhook))
        .routes(routes!(admin::webhooks::toggle_webhook))
        .routes(routes!(admin::webhooks::delete_webhook))
}

fn tag(name: &str, description: &str) -> Tag {
    let mut tag = Tag::new(name);
    tag.description = Some(description.to_string());
    tag
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(non_empty(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact(env!("CARGO_PKG_AUTHORS"));
    info.license = non_empty(env!("CARGO_PKG_LICENSE")).map(|identifier| {
        let mut license = License::new(identifier);
        license.identifier = Some(identifier.to_string());
        license
    });

    OpenApiBuilder::new()
        .info(info)
        .tags(Some(vec![
            tag("admin", "Admin dashboard"),
            tag("spaces", "Space lifecycle and membership"),
            tag("webhooks", "Webhook subscriptions"),
            tag("objects", "Privileged object deletion"),
            tag("health", "Service health"),
        ]))
        .build()
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|value| !value.is_empty())
}

/// First Cargo author (`;` separated), as `Name <email>` or a bare name.
fn cargo_contact(authors: &str) -> Option<Contact> {
    let primary = non_empty(authors.split(';').next()?)?;
    let (name, email) = match primary.split_once('<') {
        Some((name, email)) => (non_empty(name), non_empty(email.trim_end_matches('>'))),
        None => (Some(primary), None),
    };
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let doc = openapi();
        assert_eq!(doc.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            doc.info.description.as_deref(),
            Some(env!("CARGO_PKG_DESCRIPTION"))
        );

        let contact = doc.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Team Qadmin"));
            assert_eq!(contact.email.as_deref(), Some("team@qadmin.dev"));
        }

        let license = doc.info.license;
        assert!(license.is_some());
        if let Some(license) = license {
            assert_eq!(license.name, "BSD-3-Clause");
        }
    }

    #[test]
    fn base_document_carries_tags() {
        let tags = cargo_openapi().tags.unwrap_or_default();
        let names: Vec<&str> = tags.iter().map(|tag| tag.name.as_str()).collect();
        assert_eq!(names, ["admin", "spaces", "webhooks", "objects", "health"]);
        assert!(tags.iter().all(|tag| tag.description.is_some()));
    }

    #[test]
    fn author_parsing() {
        let contact = cargo_contact("Ada Lovelace;Bob");
        assert_eq!(contact.and_then(|c| c.name), Some("Ada Lovelace".to_string()));
        let contact = cargo_contact("<ops@example.com>");
        assert_eq!(contact.and_then(|c| c.email), Some("ops@example.com".to_string()));
        assert!(cargo_contact("").is_none());
    }

    #[test]
    fn openapi_tags_and_paths() {
        let doc = openapi();
        let tags = doc.tags.clone().unwrap_or_default();
        for name in ["admin", "spaces", "webhooks", "objects", "health"] {
            assert!(tags.iter().any(|tag| tag.name == name), "missing tag {name}");
        }
        for path in [
            "/admin",
            "/admin/add-space",
            "/admin/remove-space",
            "/admin/sync-space",
            "/admin/create-webhook",
            "/admin/toggle-webhook",
            "/admin/delete-webhook",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }
}
