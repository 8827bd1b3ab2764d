// src/services/rates.rs
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::currency::CurrencyCode;

pub const DEFAULT_RATES_API_URL: &str = "https://open.er-api.com/v6/latest";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream answered with HTTP {0}")]
    Status(u16),

    #[error("upstream reported result '{0}'")]
    Upstream(String),

    #[error("could not decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can quote every known rate for a base currency.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<HashMap<String, f64>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Client for the open.er-api.com `latest/{BASE}` endpoint.
pub struct OpenErApiSource {
    base_url: String,
    client: Client,
}

impl OpenErApiSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("currency_converter/0.1")
            .build()?;

        Ok(OpenErApiSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl RateSource for OpenErApiSource {
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<HashMap<String, f64>, FetchError> {
        let url = format!("{}/{}", self.base_url, base);
        info!("Fetching exchange rates from URL: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&body)?;
        if data.result != "success" {
            return Err(FetchError::Upstream(data.result));
        }

        debug!("Received {} rates for base {}", data.rates.len(), base);
        Ok(data.rates)
    }
}
