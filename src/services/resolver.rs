// src/services/resolver.rs
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::currency::CurrencyCode;
use crate::services::rates::RateSource;

/// Default freshness window for cached rates.
pub const DEFAULT_CACHE_TTL_SECS: i64 = 20 * 60;

/// Hardcoded rates used when neither the upstream nor the cache can help.
const DEFAULT_RATES: [(&str, &str, f64); 12] = [
    ("EUR", "USD", 1.09),
    ("USD", "EUR", 0.92),
    ("EUR", "VES", 39.00),
    ("USD", "VES", 35.00),
    ("EUR", "PYG", 8000.00),
    ("USD", "PYG", 7300.00),
    ("PYG", "VES", 0.0045),
    ("VES", "PYG", 220.00),
    ("PYG", "USD", 0.00014),
    ("VES", "USD", 0.028),
    ("PYG", "EUR", 0.00012),
    ("VES", "EUR", 0.025),
];

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Which step of the resolution produced a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateOrigin {
    Identity,
    Cached,
    Live,
    Stale,
    Inverse,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRate {
    pub rate: f64,
    pub origin: RateOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no exchange rate available for {from} -> {to}")]
    Unavailable { from: CurrencyCode, to: CurrencyCode },
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    rate: f64,
    fetched_at: DateTime<Utc>,
}

/// Resolves conversion rates, owning the rate cache.
///
/// Order: identity, fresh cache, live fetch, stale cache, the inverse pair
/// through the same steps, the static default table, then failure.
pub struct RateResolver {
    source: Arc<dyn RateSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    cache: Mutex<HashMap<(CurrencyCode, CurrencyCode), CacheEntry>>,
}

impl RateResolver {
    pub fn new(source: Arc<dyn RateSource>, ttl: Duration) -> Self {
        Self::with_clock(source, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        source: Arc<dyn RateSource>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        RateResolver {
            source,
            clock,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn resolve(
        &self,
        source: CurrencyCode,
        target: CurrencyCode,
    ) -> Result<ResolvedRate, ResolveError> {
        if source == target {
            return Ok(ResolvedRate {
                rate: 1.0,
                origin: RateOrigin::Identity,
            });
        }

        if let Some(resolved) = self.resolve_direct(source, target).await {
            return Ok(resolved);
        }

        if let Some(inverse) = self.resolve_direct(target, source).await {
            warn!(
                "Using inverted {} -> {} rate for {} -> {}",
                target, source, source, target
            );
            return Ok(ResolvedRate {
                rate: 1.0 / inverse.rate,
                origin: RateOrigin::Inverse,
            });
        }

        if let Some(rate) = default_rate(source, target) {
            warn!("Using default rate {} for {} -> {}", rate, source, target);
            return Ok(ResolvedRate {
                rate,
                origin: RateOrigin::Default,
            });
        }

        error!("No exchange rate available for {} -> {}", source, target);
        Err(ResolveError::Unavailable {
            from: source,
            to: target,
        })
    }

    /// Fresh cache, then the upstream, then a stale cache entry.
    async fn resolve_direct(
        &self,
        source: CurrencyCode,
        target: CurrencyCode,
    ) -> Option<ResolvedRate> {
        let cached = self.cache.lock().await.get(&(source, target)).copied();

        if let Some(entry) = cached {
            if self.clock.now() - entry.fetched_at < self.ttl {
                debug!("Rate cache HIT for {} -> {}", source, target);
                return Some(ResolvedRate {
                    rate: entry.rate,
                    origin: RateOrigin::Cached,
                });
            }
            debug!("Rate cache entry for {} -> {} is stale", source, target);
        } else {
            debug!("Rate cache MISS for {} -> {}", source, target);
        }

        match self.source.fetch_rates(source).await {
            Ok(rates) => {
                let fetched_at = self.clock.now();
                let mut cache = self.cache.lock().await;
                let mut quoted = None;
                for (code, rate) in rates {
                    if !(rate.is_finite() && rate > 0.0) {
                        continue;
                    }
                    let Ok(quote) = CurrencyCode::parse(&code) else {
                        continue;
                    };
                    if quote == source {
                        continue;
                    }
                    cache.insert((source, quote), CacheEntry { rate, fetched_at });
                    if quote == target {
                        quoted = Some(rate);
                    }
                }

                if let Some(rate) = quoted {
                    info!("Fetched live rate {} -> {}: {}", source, target, rate);
                    return Some(ResolvedRate {
                        rate,
                        origin: RateOrigin::Live,
                    });
                }
                warn!("Upstream did not quote {} for base {}", target, source);
            }
            Err(e) => {
                error!("Failed to fetch rates for base {}: {}", source, e);
            }
        }

        cached.map(|entry| {
            warn!(
                "Falling back to stale rate {} -> {} from {}",
                source, target, entry.fetched_at
            );
            ResolvedRate {
                rate: entry.rate,
                origin: RateOrigin::Stale,
            }
        })
    }
}

fn default_rate(source: CurrencyCode, target: CurrencyCode) -> Option<f64> {
    DEFAULT_RATES
        .iter()
        .find(|(s, t, _)| *s == source.as_str() && *t == target.as_str())
        .map(|(_, _, rate)| *rate)
}
