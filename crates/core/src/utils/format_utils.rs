//! Number formatting for report text.

use rust_decimal::{Decimal, RoundingStrategy};

/// Marker for rising figures.
pub const TREND_UP: &str = "🔺";
/// Marker for falling figures.
pub const TREND_DOWN: &str = "🔻";
/// Marker for unchanged figures.
pub const TREND_FLAT: &str = "➖";

/// Number of decimals conventionally shown for a currency.
pub fn currency_decimals(currency: &str) -> u32 {
    match currency.to_ascii_uppercase().as_str() {
        "KRW" | "JPY" => 0,
        _ => 2,
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats `value` with `dp` decimals and comma thousands separators.
///
/// `format_amount(dec!(1234567.891), 2)` gives `"1,234,567.89"`.
pub fn format_amount(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.*}", dp as usize, rounded.abs());

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (plain.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Like [`format_amount`] but always carries a sign (`+0` for zero).
pub fn format_signed_amount(value: Decimal, dp: u32) -> String {
    let formatted = format_amount(value, dp);
    if formatted.starts_with('-') {
        formatted
    } else {
        format!("+{}", formatted)
    }
}

/// Signed percentage, or `n/a` when undefined.
pub fn format_percent(value: Option<Decimal>, dp: u32) -> String {
    match value {
        Some(v) => format!("{}%", format_signed_amount(v, dp)),
        None => "n/a".to_string(),
    }
}

/// Unsigned percentage used for weights.
pub fn format_weight(value: Decimal, dp: u32) -> String {
    format!("{}%", format_amount(value, dp))
}

pub fn trend_marker(value: Decimal) -> &'static str {
    if value.is_sign_positive() && !value.is_zero() {
        TREND_UP
    } else if value.is_sign_negative() && !value.is_zero() {
        TREND_DOWN
    } else {
        TREND_FLAT
    }
}
