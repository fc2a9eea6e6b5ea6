// src/config.rs
use std::env;
use std::net::SocketAddr;

const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the process environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub schema_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    /// Shared staff secret. `None` disables the admin console entirely.
    pub admin_token: Option<String>,
    pub session_ttl_secs: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, so tests don't touch the real env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr: Option<SocketAddr> = parse_or(&lookup, "BIND_ADDR", "127.0.0.1:3000".parse().ok())?;
        let max_workers: Option<usize> = parse_or(&lookup, "MAX_WORKERS", Some(8))?;
        let session_ttl_secs: Option<i64> =
            parse_or(&lookup, "SESSION_TTL_SECS", Some(DEFAULT_SESSION_TTL_SECS))?;

        Ok(Self {
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "brokerage.sqlite3".into()),
            schema_path: lookup("SCHEMA_PATH").unwrap_or_else(|| "sql/schema.sql".into()),
            bind_addr: bind_addr.ok_or(ConfigError::Invalid {
                key: "BIND_ADDR",
                value: String::new(),
            })?,
            max_workers: max_workers.unwrap_or(8),
            admin_token: lookup("ADMIN_TOKEN").filter(|t| !t.trim().is_empty()),
            session_ttl_secs: session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: Option<T>) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
