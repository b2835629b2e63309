//! # Qadmin (admin control plane for a Q&A platform)
//!
//! `qadmin` owns the privileged operations of a question-and-answer site:
//! managing **spaces** (named partitions of content), **webhooks**
//! (subscriptions to object lifecycle events) and forced deletion of any
//! stored object.
//!
//! ## Authorization
//!
//! Every operation is admin-only. The check runs before anything else and a
//! rejected caller gets a neutral outcome with no detail, so the admin surface
//! does not reveal whether a resource exists.
//!
//! ## Spaces
//!
//! A space id is derived from its name (`space:<slug>`); the token stored on
//! a member's profile is `<id>:<name>`. At most [`admin::MAX_SPACES`] spaces
//! exist and the default space can be neither created nor removed.
//!
//! ## Storage
//!
//! The admin logic only sees the [`store::Store`] trait. The server uses
//! Postgres when a DSN is configured and an in-process store otherwise.

pub mod admin;
pub mod api;
pub mod cli;
pub mod model;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
