//! Environment-backed configuration for the ledger pool.

use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/classtoken.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection, in seconds.
    pub acquire_timeout_secs: u64,
    /// Upper bound on waiting for a locked database file, in seconds.
    pub busy_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            acquire_timeout_secs: 5,
            busy_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Reads settings from the environment, loading a `.env` file first
    /// when one is present. Unset variables keep their defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let mut config = Self::default();
        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(n) = env_parse("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = n;
        }
        if let Some(secs) = env_parse("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            config.acquire_timeout_secs = secs;
        }
        if let Some(secs) = env_parse("DATABASE_BUSY_TIMEOUT_SECS") {
            config.busy_timeout_secs = secs;
        }
        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.parse().ok())
}
