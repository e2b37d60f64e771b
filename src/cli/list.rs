use super::ui;
use crate::core::{CurrencyCatalog, CurrencyTable};
use comfy_table::{Cell, Table};

pub fn run(catalog: &CurrencyCatalog) {
    println!("{}", render_catalog(catalog));
}

/// Renders both tables; either the id or the label can be passed to `convert`.
pub fn render_catalog(catalog: &CurrencyCatalog) -> String {
    format!(
        "{}\n{}\n\n{}\n{}",
        ui::style_text("Cryptocurrencies", ui::StyleType::Title),
        table_for(catalog.crypto()),
        ui::style_text("Fiat currencies", ui::StyleType::Title),
        table_for(catalog.fiat()),
    )
}

fn table_for(currencies: &CurrencyTable) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Id"), ui::header_cell("Name")]);
    for entry in currencies.entries() {
        table.add_row(vec![Cell::new(&entry.id), Cell::new(&entry.label)]);
    }
    table
}
