pub mod cli;
pub mod core;
pub mod providers;

use crate::core::ConversionEngine;
use crate::core::config::AppConfig;
use crate::providers::coingecko::CoinGeckoFetcher;
use anyhow::{Context, Result};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Convert {
        amount: String,
        fiat: String,
        crypto: String,
    },
    List,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("coinconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let catalog = config.currency_catalog()?;

    match command {
        AppCommand::List => {
            cli::list::run(&catalog);
            Ok(())
        }
        AppCommand::Convert {
            amount,
            fiat,
            crypto,
        } => {
            let coingecko = &config.providers.coingecko;
            let fetcher = CoinGeckoFetcher::new(&coingecko.base_url, coingecko.timeout())
                .context("Failed to create CoinGecko client")?;
            let engine = ConversionEngine::new(catalog, fetcher);
            cli::convert::run(&engine, &amount, &fiat, &crypto).await
        }
    }
}
