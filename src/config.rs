// src/config.rs
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite file backing the document store.
    pub db_path: String,
    pub schema_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    /// Collection holding the registration documents.
    pub collection: String,
    /// Auto refresh period for the list view. `None` disables it.
    pub refresh_interval: Option<Duration>,
    pub demo_email: String,
    pub demo_password: String,
    pub session_ttl_secs: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "registry.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_workers: 8,
            collection: "vehicleRegistrations".to_string(),
            refresh_interval: Some(Duration::from_secs(5 * 60)),
            demo_email: "abc@gmail.com".to_string(),
            demo_password: "password".to_string(),
            session_ttl_secs: 60 * 60 * 24 * 7,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let refresh_secs: u64 = parse_or(
            &lookup,
            "REGISTRY_REFRESH_SECS",
            defaults
                .refresh_interval
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        );

        Self {
            db_path: lookup("REGISTRY_DB_PATH").unwrap_or(defaults.db_path),
            schema_path: lookup("REGISTRY_SCHEMA_PATH").unwrap_or(defaults.schema_path),
            bind_addr: parse_or(&lookup, "REGISTRY_BIND_ADDR", defaults.bind_addr),
            max_workers: parse_or(&lookup, "REGISTRY_MAX_WORKERS", defaults.max_workers),
            collection: lookup("REGISTRY_COLLECTION").unwrap_or(defaults.collection),
            refresh_interval: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
            demo_email: lookup("REGISTRY_DEMO_EMAIL").unwrap_or(defaults.demo_email),
            demo_password: lookup("REGISTRY_DEMO_PASSWORD").unwrap_or(defaults.demo_password),
            session_ttl_secs: parse_or(
                &lookup,
                "REGISTRY_SESSION_TTL_SECS",
                defaults.session_ttl_secs,
            ),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring unparseable config value");
            default
        }),
        None => default,
    }
}
