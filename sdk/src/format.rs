//! Display strings for figures. Every helper renders a missing or non-finite
//! value as [`MISSING`] rather than zero.

use crate::currency::Currency;

pub const MISSING: &str = "—";

/// At most this many fraction digits on prices.
const PRICE_DECIMALS: usize = 6;

/// Price with the currency sign, grouped thousands and up to six fraction
/// digits with trailing zeros trimmed, e.g. `$64,000.5`.
pub fn format_price(value: Option<f64>, currency: Currency) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return MISSING.to_string();
    };

    let fixed = format!("{:.*}", PRICE_DECIMALS, value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut out = signed(value, &fixed, currency);
    out.push_str(&group_thousands(int));

    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }

    out
}

/// Market cap or volume rounded to a whole amount, e.g. `$1,234,567`.
pub fn format_amount(value: Option<f64>, currency: Currency) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return MISSING.to_string();
    };

    let rounded = format!("{:.0}", value.abs().round());

    let mut out = signed(value, &rounded, currency);
    out.push_str(&group_thousands(&rounded));

    out
}

/// Two decimals and a `%` suffix, e.g. `-1.25%`.
pub fn format_percent(value: Option<f64>) -> String {
    match value.filter(|value| value.is_finite()) {
        Some(value) => {
            let fixed = format!("{:.2}", value.abs());

            format!("{}{fixed}%", if is_negative(value, &fixed) { "-" } else { "" })
        }
        None => MISSING.to_string(),
    }
}

pub fn format_count(value: Option<u64>) -> String {
    match value {
        Some(value) => group_thousands(&value.to_string()),
        None => MISSING.to_string(),
    }
}

/// `rendered` is the magnitude as it will be printed.
fn signed(value: f64, rendered: &str, currency: Currency) -> String {
    let minus = if is_negative(value, rendered) { "-" } else { "" };

    format!("{minus}{}", currency.sign())
}

/// Values that round to zero are printed without a sign.
fn is_negative(value: f64, rendered: &str) -> bool {
    value < 0.0 && rendered.bytes().any(|digit| matches!(digit, b'1'..=b'9'))
}

/// Inserts `,` every three digits from the right of a digit string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }

        out.push(digit);
    }

    out
}
