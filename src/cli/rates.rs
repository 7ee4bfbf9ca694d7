use super::{load_data, ui};
use crate::core::{ConversionError, Rate, Theme};
use crate::service::ConversionService;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

/// Keeps only `codes` (case-insensitive); an empty filter keeps everything.
fn filter_rates<'a>(rates: Vec<&'a Rate>, codes: &[String]) -> Vec<&'a Rate> {
    if codes.is_empty() {
        return rates;
    }
    rates
        .into_iter()
        .filter(|r| codes.iter().any(|c| c.eq_ignore_ascii_case(r.code())))
        .collect()
}

pub fn display_as_table(title: &str, rates: &[&Rate], theme: Theme) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code", theme),
        ui::header_cell("Name", theme),
        ui::header_cell("Rate", theme),
        ui::header_cell("Last Update", theme),
    ]);

    for rate in rates {
        let last_update = rate.last_update().map_or_else(ui::na_cell, |ts| {
            Cell::new(ts.format("%Y-%m-%d %H:%M UTC").to_string())
        });
        table.add_row(vec![
            Cell::new(rate.code()),
            Cell::new(rate.name()),
            ui::number_cell(format!("{:.4}", rate.rate())),
            last_update,
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text(title, ui::StyleType::Title),
        table
    )
}

fn no_matching_rates(message: String) -> anyhow::Error {
    ConversionError::Validation(message).into()
}

pub async fn run(
    service: &mut ConversionService,
    date: Option<NaiveDate>,
    codes: &[String],
) -> Result<()> {
    load_data(service).await?;
    let theme = service.theme();

    let output = match date {
        Some(date) => {
            let historical = service.historical_rates(date).await?;
            let rates = filter_rates(historical.rates.iter().collect(), codes);
            if rates.is_empty() {
                return Err(no_matching_rates(format!("No matching rates for {date}")));
            }
            let base = historical.base.as_deref().unwrap_or("USD");
            display_as_table(&format!("Rates on {date} (base {base})"), &rates, theme)
        }
        None => {
            let rates = filter_rates(service.all_rates(), codes);
            if rates.is_empty() {
                return Err(no_matching_rates("No matching rates".to_string()));
            }
            let base = service.base_currency().unwrap_or("USD");
            display_as_table(&format!("Latest rates (base {base})"), &rates, theme)
        }
    };

    println!("{output}");
    Ok(())
}
