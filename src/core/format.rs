//! Display helpers for conversion results

use super::model::Currency;

/// Renders `value` with two decimals and comma thousands separators.
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// One-line description of the effective rate, e.g. `1 USD = 0.9000 EUR`.
pub fn format_rate_info(from_code: &str, to_code: &str, rate: f64) -> String {
    format!("1 {from_code} = {rate:.4} {to_code}")
}

/// Two-line "amount code (name)" rendering of a conversion.
pub fn format_conversion(from: &Currency, amount: f64, to: &Currency, result: f64) -> String {
    format!(
        "{} {} ({})\n=\n{} {} ({})",
        format_amount(amount),
        from.code(),
        from.name(),
        format_amount(result),
        to.code(),
        to.name()
    )
}
