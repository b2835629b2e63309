//! Maps parsed CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{admin, ARG_DSN, ARG_PORT};
use anyhow::Result;
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if the arguments are inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .map(|dsn| dsn.trim())
        .filter(|dsn| !dsn.is_empty())
        .map(|dsn| SecretString::from(dsn.to_string()));

    let admin_opts = admin::Options::parse(matches);
    if let Some(fallback) = &admin_opts.fallback_type {
        if fallback.trim().is_empty() {
            anyhow::bail!("--{} must not be blank", admin::ARG_FALLBACK_TYPE);
        }
    }

    Ok(Action::Server(Args {
        port,
        dsn,
        webhooks_enabled: admin_opts.webhooks_enabled,
        core_types: admin_opts.core_types,
        fallback_type: admin_opts.fallback_type,
    }))
}
