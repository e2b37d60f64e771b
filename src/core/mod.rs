//! Core business logic abstractions

pub mod catalog;
pub mod config;
pub mod convert;
pub mod format;
pub mod log;
pub mod price;

// Re-export main types for cleaner imports
pub use catalog::{CatalogEntry, CatalogError, CurrencyCatalog, CurrencyTable};
pub use convert::{ConversionEngine, ConversionError, ConversionResult, Selection};
pub use price::{FetchError, PriceFetcher, PriceQuote};
