//! Admin endpoints.
//!
//! Handlers only parse the request, resolve the principal and hand off to
//! the managers in [`crate::admin`]; every decision lives there. The
//! `response` module turns the resulting outcome into a redirect or a JSON
//! reply depending on the caller.
//!
//! Flow Overview:
//! 1) Resolve the principal from `x-qadmin-user`.
//! 2) Call the manager with the parsed form.
//! 3) Map the outcome (redirect for forms, status + JSON for AJAX).

pub(crate) mod dashboard;
pub(crate) mod objects;
pub(crate) mod principal;
pub(crate) mod response;
pub(crate) mod spaces;
mod state;
pub(crate) mod types;
pub(crate) mod webhooks;

pub use principal::USER_HEADER;
pub use state::AdminState;
