//! Preference access behind an opaque key-value store.
//!
//! The store itself (file, GUI settings page, ...) is an external
//! collaborator; this module only defines the trait, the recognized keys
//! and the typed accessors with their fallback rules.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::MonitorError;

pub const KEY_SERVER_URL: &str = "server_url";
pub const KEY_API_TOKEN: &str = "api_token";
pub const KEY_REFRESH_INTERVAL: &str = "refresh_interval";
pub const KEY_THEME: &str = "theme";
pub const KEY_HTTP_TIMEOUT: &str = "http_timeout";

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Opaque string preference store. Implementations are free to persist
/// however they like; `set` takes `&self` so stores can be shared.
pub trait PrefStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

/// Theme preference; anything but "light" means dark.
pub fn theme(store: &dyn PrefStore) -> Theme {
    match store.get(KEY_THEME).as_deref() {
        Some("light") => Theme::Light,
        _ => Theme::Dark,
    }
}

/// Refresh interval in seconds, re-read by the scheduler at every wait.
pub fn effective_interval(store: &dyn PrefStore) -> u64 {
    parse_interval(store.get(KEY_REFRESH_INTERVAL).as_deref().unwrap_or(""))
}

/// Non-numeric or non-positive values fall back to the default.
fn parse_interval(raw: &str) -> u64 {
    match raw.trim().parse::<i64>() {
        Ok(secs) if secs > 0 => secs as u64,
        _ => DEFAULT_REFRESH_INTERVAL_SECS,
    }
}

/// Connection settings for one refresh cycle.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub endpoint: String,
    pub token: String,
    pub timeout: Duration,
}

/// Reads endpoint, token and timeout. Fails fast with `Config` when
/// either required value is missing; no network call happens after that.
pub fn server_config(store: &dyn PrefStore) -> Result<ServerConfig, MonitorError> {
    let endpoint = store.get(KEY_SERVER_URL).unwrap_or_default();
    let token = store.get(KEY_API_TOKEN).unwrap_or_default();
    if endpoint.trim().is_empty() || token.trim().is_empty() {
        return Err(MonitorError::Config("server URL or API token not set"));
    }

    let timeout_secs = store
        .get(KEY_HTTP_TIMEOUT)
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

    Ok(ServerConfig {
        endpoint,
        token,
        timeout: Duration::from_secs(timeout_secs),
    })
}

/// In-memory store for tests and embedders without persistence.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(pairs: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (key, value) in pairs {
            store.set(key, value);
        }
        store
    }
}

impl PrefStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}
