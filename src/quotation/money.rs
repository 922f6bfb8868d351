//! Locale-invariant money formatting.

use rust_decimal::{Decimal, RoundingStrategy};

use super::models::Currency;

/// Round to cents, midpoint away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Format as `1,234,567.89`: comma thousands separators, exactly two decimals.
pub fn format_grouped(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}{grouped}.{frac_part}")
}

/// Currency prefix followed by the grouped amount, e.g. `$1,200.00` or `INR 99.50`.
pub fn format_money(currency: Currency, amount: Decimal) -> String {
    format!("{}{}", currency.symbol(), format_grouped(amount))
}

/// Tax rate as written in the totals label, in shortest float form with at
/// least one decimal: `10.0`, `7.5`, `18.25`.
pub fn format_rate(rate: Decimal) -> String {
    let normalized = rate.normalize();
    if normalized.scale() == 0 {
        format!("{}.0", normalized)
    } else {
        normalized.to_string()
    }
}
