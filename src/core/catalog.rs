//! Supported currencies and the mapping between ids and display labels

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{table} catalog is empty")]
    Empty { table: &'static str },
    #[error("{table} catalog contains an entry with an empty id")]
    EmptyId { table: &'static str },
    #[error("invalid id '{id}' in {table} catalog: use lowercase letters, digits and '-'")]
    InvalidId { table: &'static str, id: String },
    #[error("{table} catalog entry '{id}' has an empty label")]
    EmptyLabel { table: &'static str, id: String },
    #[error("duplicate id '{id}' in {table} catalog")]
    DuplicateId { table: &'static str, id: String },
    #[error("duplicate label '{label}' in {table} catalog")]
    DuplicateLabel { table: &'static str, label: String },
}

/// A canonical identifier together with the label shown to users.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
}

impl CatalogEntry {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// Bidirectional lookup table between ids and labels.
///
/// Entries keep their insertion order so listings match the configured order.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<String, usize>,
    by_label: HashMap<String, usize>,
}

impl CurrencyTable {
    pub fn new(table: &'static str, entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty { table });
        }

        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_label = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(CatalogError::EmptyId { table });
            }
            // Ids are sent to the price API unescaped.
            if !entry
                .id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            {
                return Err(CatalogError::InvalidId {
                    table,
                    id: entry.id.clone(),
                });
            }
            if entry.label.trim().is_empty() {
                return Err(CatalogError::EmptyLabel {
                    table,
                    id: entry.id.clone(),
                });
            }
            if by_id.insert(entry.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId {
                    table,
                    id: entry.id.clone(),
                });
            }
            if by_label.insert(entry.label.clone(), index).is_some() {
                return Err(CatalogError::DuplicateLabel {
                    table,
                    label: entry.label.clone(),
                });
            }
        }

        Ok(Self {
            entries,
            by_id,
            by_label,
        })
    }

    /// Resolves a display label to its canonical id.
    pub fn id_for_label(&self, label: &str) -> Option<&str> {
        self.by_label
            .get(label)
            .map(|&index| self.entries[index].id.as_str())
    }

    pub fn label_for_id(&self, id: &str) -> Option<&str> {
        self.by_id
            .get(id)
            .map(|&index| self.entries[index].label.as_str())
    }

    /// Maps user input that may be either an id or a label onto a label.
    ///
    /// Unknown input is returned unchanged so that resolution failures are
    /// reported by the conversion itself.
    pub fn label_for_input<'a>(&'a self, input: &'a str) -> &'a str {
        let trimmed = input.trim();
        if self.by_label.contains_key(trimmed) {
            return trimmed;
        }
        self.label_for_id(&trimmed.to_lowercase()).unwrap_or(input)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

/// The crypto and fiat tables used for a conversion.
#[derive(Debug, Clone)]
pub struct CurrencyCatalog {
    crypto: CurrencyTable,
    fiat: CurrencyTable,
}

impl CurrencyCatalog {
    pub fn new(crypto: Vec<CatalogEntry>, fiat: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        Ok(Self {
            crypto: CurrencyTable::new("crypto", crypto)?,
            fiat: CurrencyTable::new("fiat", fiat)?,
        })
    }

    pub fn crypto(&self) -> &CurrencyTable {
        &self.crypto
    }

    pub fn fiat(&self) -> &CurrencyTable {
        &self.fiat
    }

    pub fn builtin_crypto() -> Vec<CatalogEntry> {
        BUILTIN_CRYPTO
            .iter()
            .map(|(id, label)| CatalogEntry::new(id, label))
            .collect()
    }

    pub fn builtin_fiat() -> Vec<CatalogEntry> {
        BUILTIN_FIAT
            .iter()
            .map(|(id, label)| CatalogEntry::new(id, label))
            .collect()
    }
}

impl Default for CurrencyCatalog {
    fn default() -> Self {
        // The built-in tables are checked by `test_builtin_catalog_is_valid`.
        Self {
            crypto: CurrencyTable::new("crypto", Self::builtin_crypto())
                .expect("built-in crypto catalog is valid"),
            fiat: CurrencyTable::new("fiat", Self::builtin_fiat())
                .expect("built-in fiat catalog is valid"),
        }
    }
}

const BUILTIN_CRYPTO: &[(&str, &str)] = &[
    ("bitcoin", "Bitcoin (BTC)"),
    ("ethereum", "Ethereum (ETH)"),
    ("tether", "Tether (USDT)"),
    ("solana", "Solana (SOL)"),
    ("ripple", "Ripple (XRP)"),
    ("cardano", "Cardano (ADA)"),
    ("dogecoin", "Dogecoin (DOGE)"),
    ("polkadot", "Polkadot (DOT)"),
    ("tron", "Tron (TRX)"),
    ("chainlink", "Chainlink (LINK)"),
    ("polygon", "Polygon (MATIC)"),
    ("wrapped-bitcoin", "Wrapped Bitcoin (WBTC)"),
    ("litecoin", "Litecoin (LTC)"),
    ("bitcoin-cash", "Bitcoin Cash (BCH)"),
    ("dai", "Dai (DAI)"),
    ("uniswap", "Uniswap (UNI)"),
    ("cosmos", "Cosmos (ATOM)"),
];

const BUILTIN_FIAT: &[(&str, &str)] = &[
    ("usd", "Доллар США (USD)"),
    ("eur", "Евро (EUR)"),
    ("gbp", "Фунт стерлингов (GBP)"),
    ("jpy", "Японская иена (JPY)"),
    ("cny", "Китайский юань (CNY)"),
    ("aud", "Австралийский доллар (AUD)"),
    ("cad", "Канадский доллар (CAD)"),
    ("chf", "Швейцарский франк (CHF)"),
    ("hkd", "Гонконгский доллар (HKD)"),
    ("sgd", "Сингапурский доллар (SGD)"),
    ("sek", "Шведская крона (SEK)"),
    ("nok", "Норвежская крона (NOK)"),
    ("krw", "Южнокорейская вона (KRW)"),
    ("inr", "Индийская рупия (INR)"),
    ("brl", "Бразильский реал (BRL)"),
    ("rub", "Российский рубль (RUB)"),
    ("try", "Турецкая лира (TRY)"),
];
