use super::{load_data, ui};
use crate::service::{Conversion, ConversionService};
use anyhow::Result;

pub fn display_conversion(
    service: &ConversionService,
    from: &str,
    to: &str,
    amount: f64,
    conversion: &Conversion,
) -> String {
    let display = service.conversion_display(from, to, amount, conversion.converted_amount);
    format!(
        "{}\n\n{}",
        ui::style_text(&display, ui::StyleType::Result),
        ui::style_text(&conversion.rate_info, ui::StyleType::Subtle)
    )
}

/// Converts `amount`, using the saved default currencies when `from` or
/// `to` are not given.
pub async fn run(
    service: &mut ConversionService,
    amount: f64,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    load_data(service).await?;

    let (default_from, default_to) = service.default_currencies();
    let from = from.unwrap_or(default_from).to_uppercase();
    let to = to.unwrap_or(default_to).to_uppercase();

    let conversion = service.convert(&from, &to, amount)?;
    println!(
        "{}",
        display_conversion(service, &from, &to, amount, &conversion)
    );
    Ok(())
}
