// src/config.rs
use std::{env, fmt::Display, str::FromStr};

use tracing::info;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store {other:?}, expected postgres or memory")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub run_migrations: bool,
    pub track_vote_count: bool,
    pub strict_http_status: bool,
    pub cors_allowed_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3030,
            store: StoreKind::Postgres,
            database_url: None,
            max_connections: 5,
            run_migrations: true,
            track_vote_count: false,
            strict_http_status: false,
            cors_allowed_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source, so parsing can
    /// be exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let config = Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            store: parse_or(&lookup, "POLL_STORE", defaults.store)?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", defaults.run_migrations)?,
            track_vote_count: parse_or(&lookup, "TRACK_VOTE_COUNT", defaults.track_vote_count)?,
            strict_http_status: parse_or(&lookup, "STRICT_HTTP_STATUS", defaults.strict_http_status)?,
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN").filter(|origin| !origin.is_empty()),
        };

        if config.store == StoreKind::Postgres && config.database_url.is_none() {
            return Err(ConfigError::Missing { key: "DATABASE_URL" });
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => {
            info!("{key} not set, using default: {default:?}");
            Ok(default)
        }
    }
}
