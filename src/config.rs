// src/config.rs
use anyhow::{Context, Result};
use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::services::db::DEFAULT_DATABASE_URL;
use crate::services::rates::DEFAULT_RATES_API_URL;
use crate::services::resolver::DEFAULT_CACHE_TTL_SECS;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_HISTORY_LIMIT: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub rates_api_url: String,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub history_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            rates_api_url: DEFAULT_RATES_API_URL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS as u64),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr + std::fmt::Display,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value, got '{raw}'")),
        None => {
            warn!("${} not set, defaulting to {}", key, default);
            Ok(default)
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_var(&lookup, "PORT", DEFAULT_PORT)?;
        let database_url = parse_var(&lookup, "DATABASE_URL", DEFAULT_DATABASE_URL.to_string())?;
        let rates_api_url = parse_var(&lookup, "RATES_API_URL", DEFAULT_RATES_API_URL.to_string())?;
        let ttl_secs = parse_var(&lookup, "RATE_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS as u64)?;
        let timeout_secs = parse_var(&lookup, "RATE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let history_limit = parse_var(&lookup, "HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?;

        if timeout_secs == 0 {
            anyhow::bail!("RATE_TIMEOUT_SECS must be greater than zero");
        }
        if history_limit == 0 {
            anyhow::bail!("HISTORY_LIMIT must be greater than zero");
        }

        Ok(AppConfig {
            port,
            database_url,
            rates_api_url,
            cache_ttl: Duration::from_secs(ttl_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            history_limit,
        })
    }
}
