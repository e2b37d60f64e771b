//! Pricing abstractions and core types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Snapshot of the market for one crypto/fiat pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub crypto_id: String,
    pub fiat_code: String,
    /// Fiat units per one unit of the cryptocurrency.
    pub unit_price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    /// Signed percent change over the last 24 hours.
    pub change_24h: f64,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("HTTP error: {status} for {crypto_id}/{fiat_code}")]
    Status {
        status: StatusCode,
        crypto_id: String,
        fiat_code: String,
    },
    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("failed to parse price response: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("no price data for {crypto_id}/{fiat_code}")]
    MissingPair { crypto_id: String, fiat_code: String },
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::Status { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS)
    }
}

#[async_trait]
pub trait PriceFetcher: Send + Sync {
    async fn fetch(&self, crypto_id: &str, fiat_code: &str) -> Result<PriceQuote, FetchError>;
}
