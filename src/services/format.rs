// src/services/format.rs
use crate::currency::CurrencyCode;

/// Insert comma thousands separators into a plain decimal string.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Render a converted amount for `code`: no decimals for the zero-decimal
/// currencies, two for everything else.
pub fn format_amount(code: CurrencyCode, value: f64) -> String {
    let plain = if code.is_zero_decimal() {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    };
    group_thousands(&plain)
}

/// Rates are always shown with six decimal places.
pub fn format_rate(rate: f64) -> String {
    group_thousands(&format!("{:.6}", rate))
}

/// The result string stored in history and returned to clients.
pub fn format_result(code: CurrencyCode, value: f64) -> String {
    format!("{} {}", format_amount(code, value), code.name())
}
