use super::ui;
use crate::core::format::format_amount;
use crate::core::{Theme, Transaction};
use crate::service::ConversionService;
use anyhow::Result;
use comfy_table::Cell;

pub fn display_as_table(transactions: &[Transaction], theme: Theme) -> String {
    if transactions.is_empty() {
        return ui::style_text("No conversions yet", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Time", theme),
        ui::header_cell("From", theme),
        ui::header_cell("To", theme),
        ui::header_cell("Amount", theme),
        ui::header_cell("Result", theme),
        ui::header_cell("Rate", theme),
    ]);

    for tx in transactions {
        table.add_row(vec![
            Cell::new(tx.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(&tx.from_currency),
            Cell::new(&tx.to_currency),
            ui::number_cell(format_amount(tx.amount)),
            ui::number_cell(format_amount(tx.result)),
            ui::number_cell(format!("{:.4}", tx.rate)),
        ]);
    }

    table.to_string()
}

pub fn run(service: &mut ConversionService, clear: bool) -> Result<()> {
    if clear {
        service.clear_history();
        println!("{}", ui::style_text("History cleared", ui::StyleType::Subtle));
        return Ok(());
    }

    println!("{}", display_as_table(service.history(), service.theme()));
    Ok(())
}
