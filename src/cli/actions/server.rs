use crate::{
    admin::{AdminConfig, ConfigSnapshot},
    api::{self, AdminState},
    cli::telemetry,
    store::{MemoryStore, PgStore, Store},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};
use url::Url;

pub struct Args {
    pub port: u16,
    pub dsn: Option<SecretString>,
    pub webhooks_enabled: bool,
    pub core_types: Option<Vec<String>>,
    pub fallback_type: Option<String>,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("port", &self.port)
            .field("dsn", &self.dsn.as_ref().map(|_| "***"))
            .field("webhooks_enabled", &self.webhooks_enabled)
            .field("core_types", &self.core_types)
            .field("fallback_type", &self.fallback_type)
            .finish()
    }
}

impl Args {
    fn admin_config(&self) -> AdminConfig {
        let mut config = AdminConfig::new().with_webhooks_enabled(self.webhooks_enabled);
        if let Some(core_types) = &self.core_types {
            config = config.with_core_types(core_types);
        }
        if let Some(fallback) = &self.fallback_type {
            config = config.with_fallback_type(fallback.trim().to_string());
        }
        config
    }

    /// System settings shown on the dashboard. The DSN is redacted by key.
    fn system_entries(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("port", Some(self.port.to_string())),
            (
                "dsn",
                self.dsn.as_ref().map(|dsn| dsn.expose_secret().to_string()),
            ),
            ("webhooks_enabled", Some(self.webhooks_enabled.to_string())),
            ("core_types", self.core_types.as_ref().map(|types| types.join(","))),
            ("fallback_type", self.fallback_type.clone()),
        ]
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let store: Arc<dyn Store> = match &args.dsn {
        Some(dsn) => {
            let pool = PgPoolOptions::new()
                .min_connections(1)
                .max_connections(5)
                .max_lifetime(Duration::from_secs(60 * 2))
                .test_before_acquire(true)
                .connect(dsn.expose_secret())
                .await
                .context("Failed to connect to database")?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            warn!("No DSN configured, objects are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let snapshot = ConfigSnapshot::build(args.system_entries(), std::env::vars());
    let state = Arc::new(AdminState::new(store, args.admin_config(), snapshot));

    let result = api::new(args.port, state).await;
    telemetry::shutdown_tracer();
    result
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        (
            "store",
            args.dsn
                .as_ref()
                .map_or_else(|| "memory".to_string(), |dsn| redact_dsn(dsn.expose_secret())),
        ),
        ("webhooks_enabled", args.webhooks_enabled.to_string()),
        (
            "core_types",
            args.core_types
                .as_ref()
                .map_or_else(|| "default".to_string(), |types| types.join(",")),
        ),
        (
            "fallback_type",
            args.fallback_type
                .clone()
                .unwrap_or_else(|| "default".to_string()),
        ),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} ({})\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
