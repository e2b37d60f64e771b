use super::ui;
use crate::core::format::format_grouped;
use crate::core::{ConversionEngine, ConversionError, ConversionResult, FetchError, PriceFetcher};
use anyhow::Result;
use comfy_table::Cell;

/// Converts and prints the result, or a message describing why it failed.
///
/// `fiat` and `crypto` may be display labels or canonical ids.
pub async fn run<F: PriceFetcher>(
    engine: &ConversionEngine<F>,
    amount: &str,
    fiat: &str,
    crypto: &str,
) -> Result<()> {
    let fiat_label = engine.catalog().fiat().label_for_input(fiat);
    let crypto_label = engine.catalog().crypto().label_for_input(crypto);

    let spinner = ui::new_spinner("Fetching price...");
    let result = engine.convert(amount, fiat_label, crypto_label).await;
    spinner.finish_and_clear();

    match result {
        Ok(conversion) => {
            println!("{}", render_result(&conversion));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", ui::style_text(&user_message(&e), ui::StyleType::Error));
            Err(e.into())
        }
    }
}

pub fn render_result(result: &ConversionResult) -> String {
    let headline = format!(
        "{} {} = {} {}",
        format_grouped(result.amount, 2),
        result.fiat_label,
        format_grouped(result.crypto_amount, 8),
        result.crypto_label
    );

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Statistic"),
        ui::header_cell(&format!("Value ({})", result.fiat_code.to_uppercase())),
    ]);
    table.add_row(vec![
        Cell::new(format!("Price of 1 {}", result.crypto_label)),
        ui::value_cell(&format_grouped(result.unit_price, 2)),
    ]);
    table.add_row(vec![
        Cell::new("Market cap"),
        ui::value_cell(&format_grouped(result.market_cap, 0)),
    ]);
    table.add_row(vec![
        Cell::new("24h volume"),
        ui::value_cell(&format_grouped(result.volume_24h, 0)),
    ]);
    table.add_row(vec![Cell::new("24h change"), ui::change_cell(result.change_24h)]);

    let as_of = format!(
        "Quoted at {}",
        result.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    format!(
        "{}\n{table}\n{}",
        ui::style_text(&headline, ui::StyleType::Result),
        ui::style_text(&as_of, ui::StyleType::Subtle)
    )
}

/// Whether `run` has already shown the user a message for this error.
pub fn is_reported(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ConversionError>().is_some()
}

/// Message shown to the user for each kind of failure.
pub fn user_message(err: &ConversionError) -> String {
    match err {
        ConversionError::InvalidAmount { input } => {
            format!("Enter an amount greater than zero (got '{input}')")
        }
        ConversionError::MissingSelection { selection, label } => format!(
            "Choose a {selection}: '{label}' is not supported. Run `coinconv list` to see the options"
        ),
        ConversionError::PriceUnavailable(cause) if cause.is_rate_limited() => {
            "CoinGecko rate limit reached, try again in a minute".to_string()
        }
        ConversionError::PriceUnavailable(FetchError::Timeout(_)) => {
            "The price service did not respond in time".to_string()
        }
        ConversionError::PriceUnavailable(cause) => {
            format!("Could not get the price: {cause}")
        }
        ConversionError::DivisionError { price } => {
            format!("Received an unusable price ({price}), cannot convert")
        }
    }
}
