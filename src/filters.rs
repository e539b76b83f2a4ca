//! Money formatting utilities for displaying monetary amounts.
//!
//! Format: sign + currency symbol + number with thousands separator and two
//! decimals. Only negative amounts carry a sign.

/// Format an amount for display, e.g. `₹1,234.50` or `-$12.00`.
///
/// Works on the float's own decimal expansion, so amounts far beyond the
/// range of an integer cent count keep every digit.
pub fn format_money(amount: f64, symbol: &str) -> String {
    let digits = format!("{:.2}", amount.abs());
    let (whole, fractional) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let whole = format_with_thousands(whole, ',');
    // Amounts that round to zero never show a sign.
    let is_negative = amount < 0.0 && digits != "0.00";

    if is_negative {
        format!("-{}{}.{}", symbol, whole, fractional)
    } else {
        format!("{}{}.{}", symbol, whole, fractional)
    }
}

/// Format an optional amount, rendering a missing value as `–`.
pub fn format_money_opt(amount: Option<f64>, symbol: &str) -> String {
    amount
        .map(|a| format_money(a, symbol))
        .unwrap_or_else(|| "–".to_string())
}

/// Format a percentage with one decimal, e.g. `42.5%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format a plain number with two decimals for tables, `–` when missing.
pub fn format_number(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "–".to_string())
}

/// Insert thousands separators into a string of ASCII digits.
fn format_with_thousands(digits: &str, sep: char) -> String {
    let chars: Vec<char> = digits.chars().rev().collect();
    let mut result = Vec::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(sep);
        }
        result.push(*c);
    }

    result.iter().rev().collect()
}
