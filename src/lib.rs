// src/lib.rs
pub mod config;
pub mod currency;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::routes::AppState;
use crate::services::converter::Converter;
use crate::services::db::DbStore;
use crate::services::rates::OpenErApiSource;
use crate::services::resolver::RateResolver;

/// Wires the upstream client, resolver, converter and history store together.
pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    let source = OpenErApiSource::new(&config.rates_api_url, config.request_timeout)
        .context("Failed to build the exchange-rate HTTP client")?;
    let ttl = chrono::Duration::from_std(config.cache_ttl)
        .context("RATE_CACHE_TTL_SECS is out of range")?;
    let resolver = Arc::new(RateResolver::new(Arc::new(source), ttl));

    let db = DbStore::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open history database {}", config.database_url))?;

    Ok(AppState {
        converter: Arc::new(Converter::new(resolver)),
        db: Arc::new(db),
        history_limit: config.history_limit,
    })
}
