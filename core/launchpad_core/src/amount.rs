//! Token amount conversion and display formatting.

use rust_decimal::Decimal;
use thiserror::Error;

/// Largest scale a [`Decimal`] can carry.
pub const MAX_DECIMALS: u32 = 28;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("raw amount {0} does not fit a decimal")]
    Overflow(u128),

    #[error("token decimals {0} exceed the supported maximum of {MAX_DECIMALS}")]
    ScaleTooLarge(u32),
}

/// Convert raw integer units into a human amount: `raw / 10^decimals`.
pub fn to_display_amount(raw: u128, decimals: u32) -> Result<Decimal, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::ScaleTooLarge(decimals));
    }
    let value = i128::try_from(raw).map_err(|_| AmountError::Overflow(raw))?;
    Decimal::try_from_i128_with_scale(value, decimals)
        .map(|d| d.normalize())
        .map_err(|_| AmountError::Overflow(raw))
}

/// USD value of `amount`; an unknown price values it at zero.
pub fn usd_value(amount: Decimal, price: Option<Decimal>) -> Decimal {
    amount.saturating_mul(price.unwrap_or(Decimal::ZERO))
}

/// Shorten large values with a K/M/B suffix, rounded to `dp` places.
pub fn format_compact(value: Decimal, dp: u32) -> String {
    let billion = Decimal::from(1_000_000_000);
    let million = Decimal::from(1_000_000);
    let thousand = Decimal::from(1_000);

    let abs = value.abs();
    if abs >= billion {
        return format!("{}B", (value / billion).round_dp(dp).normalize());
    }
    if abs >= million {
        return format!("{}M", (value / million).round_dp(dp).normalize());
    }
    if abs >= thousand {
        return format!("{}K", (value / thousand).round_dp(dp).normalize());
    }
    value.round_dp(dp).normalize().to_string()
}

/// Render a USD value as `$1,234.56`.
pub fn format_usd(value: Decimal) -> String {
    let rounded = format!("{:.2}", value.round_dp(2).abs());
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !value.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac}")
}
