//! Fiat to crypto conversion

use crate::core::catalog::CurrencyCatalog;
use crate::core::price::{FetchError, PriceFetcher};
use chrono::{DateTime, Utc};
use std::fmt::Display;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Fiat,
    Crypto,
}

impl Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Selection::Fiat => "fiat currency",
                Selection::Crypto => "cryptocurrency",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("invalid amount '{input}': expected a number greater than zero")]
    InvalidAmount { input: String },
    #[error("no {selection} selected for '{label}'")]
    MissingSelection { selection: Selection, label: String },
    #[error("price unavailable: {0}")]
    PriceUnavailable(#[source] FetchError),
    #[error("cannot convert at a unit price of {price}")]
    DivisionError { price: f64 },
}

/// Outcome of a successful conversion, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub amount: f64,
    pub fiat_code: String,
    pub fiat_label: String,
    pub crypto_id: String,
    pub crypto_label: String,
    pub crypto_amount: f64,
    pub unit_price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub change_24h: f64,
    pub fetched_at: DateTime<Utc>,
}

pub struct ConversionEngine<F> {
    catalog: CurrencyCatalog,
    fetcher: F,
}

impl<F: PriceFetcher> ConversionEngine<F> {
    pub fn new(catalog: CurrencyCatalog, fetcher: F) -> Self {
        Self { catalog, fetcher }
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.catalog
    }

    #[instrument(name = "Convert", skip(self))]
    pub async fn convert(
        &self,
        amount_text: &str,
        fiat_label: &str,
        crypto_label: &str,
    ) -> Result<ConversionResult, ConversionError> {
        let amount = parse_amount(amount_text)?;

        let fiat_code = self.catalog.fiat().id_for_label(fiat_label).ok_or_else(|| {
            ConversionError::MissingSelection {
                selection: Selection::Fiat,
                label: fiat_label.to_string(),
            }
        })?;
        let crypto_id = self
            .catalog
            .crypto()
            .id_for_label(crypto_label)
            .ok_or_else(|| ConversionError::MissingSelection {
                selection: Selection::Crypto,
                label: crypto_label.to_string(),
            })?;

        let quote = self
            .fetcher
            .fetch(crypto_id, fiat_code)
            .await
            .map_err(ConversionError::PriceUnavailable)?;
        debug!(quote = ?quote, "Received quote");

        if !quote.unit_price.is_finite() || quote.unit_price <= 0.0 {
            return Err(ConversionError::DivisionError {
                price: quote.unit_price,
            });
        }

        let crypto_amount = amount / quote.unit_price;
        // Overflow to inf or underflow to zero cannot be converted back.
        if !crypto_amount.is_finite() || crypto_amount == 0.0 {
            return Err(ConversionError::DivisionError {
                price: quote.unit_price,
            });
        }

        Ok(ConversionResult {
            amount,
            fiat_code: fiat_code.to_string(),
            fiat_label: fiat_label.to_string(),
            crypto_id: crypto_id.to_string(),
            crypto_label: crypto_label.to_string(),
            crypto_amount,
            unit_price: quote.unit_price,
            market_cap: quote.market_cap,
            volume_24h: quote.volume_24h,
            change_24h: quote.change_24h,
            fetched_at: quote.fetched_at,
        })
    }
}

fn parse_amount(amount_text: &str) -> Result<f64, ConversionError> {
    let invalid = || ConversionError::InvalidAmount {
        input: amount_text.to_string(),
    };

    let amount: f64 = amount_text.trim().parse().map_err(|_| invalid())?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(invalid());
    }
    Ok(amount)
}
