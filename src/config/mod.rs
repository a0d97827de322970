use chrono::NaiveDateTime;
use chrono_tz::Tz;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::chat::DEFAULT_POLL_INTERVAL;
use crate::store::DEFAULT_STORE_TIMEOUT;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::with_security_headers;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/couple_calendar";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_TIMEZONE: &str = "Europe/Paris";
const DEFAULT_RELATIONSHIP_START: &str = "2025-09-19T00:00:00";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub reason: String,
}

impl ConfigError {
    fn new(key: &'static str, reason: impl ToString) -> Self {
        Self {
            key,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    /// Zone whose local fields define "today" and every date key.
    pub timezone: Tz,
    pub store_timeout: Duration,
    pub poll_interval: Duration,
    pub relationship_start: NaiveDateTime,
    pub cors_allowed_origins: Vec<String>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let timezone = get("CALENDAR_TIMEZONE", DEFAULT_TIMEZONE)
            .parse::<Tz>()
            .map_err(|e| ConfigError::new("CALENDAR_TIMEZONE", e))?;

        let relationship_start = NaiveDateTime::parse_from_str(
            &get("RELATIONSHIP_START", DEFAULT_RELATIONSHIP_START),
            "%Y-%m-%dT%H:%M:%S",
        )
        .map_err(|e| ConfigError::new("RELATIONSHIP_START", e))?;

        Ok(Self {
            database_url: get("DATABASE_URL", DEFAULT_DATABASE_URL),
            store_backend: get("STORE_BACKEND", "postgres")
                .parse()
                .map_err(|e| ConfigError::new("STORE_BACKEND", e))?,
            max_connections: parse_number(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            bind_addr: get("BIND_ADDR", DEFAULT_BIND_ADDR)
                .parse()
                .map_err(|e| ConfigError::new("BIND_ADDR", e))?,
            timezone,
            store_timeout: parse_seconds(&lookup, "STORE_TIMEOUT_SECS", DEFAULT_STORE_TIMEOUT)?,
            poll_interval: parse_seconds(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL)?,
            relationship_start,
            cors_allowed_origins: cors::parse_origin_list(
                &get("CORS_ALLOWED_ORIGINS", cors::DEFAULT_ALLOWED_ORIGINS),
            ),
            production: lookup("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
        })
    }
}

fn parse_number<F>(lookup: &F, key: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(0) => Err(ConfigError::new(key, "must be greater than zero")),
            Ok(n) => Ok(n),
            Err(e) => Err(ConfigError::new(key, e)),
        },
    }
}

fn parse_seconds<F>(
    lookup: &F,
    key: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(_) => parse_number(lookup, key, 0).map(|secs| Duration::from_secs(u64::from(secs))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.timezone, chrono_tz::Europe::Paris);
        assert_eq!(config.store_timeout, Duration::from_secs(10));
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.bind_addr.port(), 3001);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.cors_allowed_origins.len(), 2);
        assert!(!config.production);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STORE_BACKEND", "memory"),
            ("CALENDAR_TIMEZONE", "America/Montreal"),
            ("POLL_INTERVAL_SECS", "5"),
            ("RUST_ENV", "Production"),
        ])
        .unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.timezone, chrono_tz::America::Montreal);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert!(config.production);
    }

    #[test]
    fn test_invalid_values_name_their_key() {
        let err = config_from(&[("CALENDAR_TIMEZONE", "Mars/Olympus")]).unwrap_err();
        assert_eq!(err.key, "CALENDAR_TIMEZONE");

        let err = config_from(&[("STORE_TIMEOUT_SECS", "0")]).unwrap_err();
        assert_eq!(err.key, "STORE_TIMEOUT_SECS");

        let err = config_from(&[("RELATIONSHIP_START", "yesterday")]).unwrap_err();
        assert_eq!(err.key, "RELATIONSHIP_START");
    }
}
