//! Read-only view of the effective configuration for the admin dashboard.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Prefix applied to every system configuration key.
pub const CONFIG_NAMESPACE: &str = "qadmin";

const REDACTED: &str = "***";
const MISSING: &str = "-";

static SENSITIVE_KEY: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)(secret|password|token|dsn|key)").ok());

fn is_sensitive(key: &str) -> bool {
    match SENSITIVE_KEY.as_ref() {
        Some(pattern) => pattern.is_match(key),
        // Pattern failed to compile: treat everything as sensitive.
        None => true,
    }
}

/// Ordered key/value pairs with sensitive values already redacted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    entries: Vec<(String, String)>,
}

impl ConfigSnapshot {
    /// Builds the snapshot from the system settings and the process environment.
    ///
    /// System keys are namespaced with `qadmin_` and come first. Environment
    /// variables are appended in iteration order and replace a system value
    /// in place only when the key is literally the same.
    #[must_use]
    pub fn build<S, K, E>(system_entries: S, env: E) -> Self
    where
        S: IntoIterator<Item = (K, Option<String>)>,
        K: AsRef<str>,
        E: IntoIterator<Item = (String, String)>,
    {
        let mut snapshot = Self::default();
        for (key, value) in system_entries {
            snapshot.insert(format!("{CONFIG_NAMESPACE}_{}", key.as_ref()), value);
        }
        for (key, value) in env {
            snapshot.insert(key, Some(value));
        }
        snapshot
    }

    fn insert(&mut self, key: String, value: Option<String>) {
        let display = match value {
            Some(_) if is_sensitive(&key) => REDACTED.to_string(),
            Some(value) => value,
            None => MISSING.to_string(),
        };
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = display,
            None => self.entries.push((key, display)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ConfigSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
