//! Conversion between human-readable token amounts and base units

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::types::*;

/// Digits in `u128::MAX`
const MAX_AMOUNT_DIGITS: usize = 39;

/// Parse a decimal string such as `"1000"` or `"0.25"` into base units
///
/// Only plain decimal notation is accepted. The value is scaled by
/// `10^decimals` exactly. Negative values, exponent notation, values with
/// more fractional digits than `decimals`, and values that do not fit in an
/// [`Amount`] are rejected.
pub fn parse_units(text: &str, decimals: u8) -> TokenResult<Amount> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TokenError::InvalidArgument(
            "Amount cannot be empty".to_string(),
        ));
    }

    if trimmed.starts_with('-') {
        return Err(TokenError::InvalidArgument(format!(
            "Amount cannot be negative: {trimmed}"
        )));
    }

    // Shape checks run on the text so oversized input never reaches BigDecimal
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let (whole_part, fraction_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if (whole_part.is_empty() && fraction_part.is_empty())
        || !is_digits(whole_part)
        || !is_digits(fraction_part)
    {
        return Err(TokenError::InvalidArgument(format!(
            "Invalid amount '{trimmed}': expected plain decimal notation"
        )));
    }

    if fraction_part.trim_end_matches('0').len() > usize::from(decimals) {
        return Err(TokenError::InvalidArgument(format!(
            "Amount '{trimmed}' has more than {decimals} decimal places"
        )));
    }

    if whole_part.trim_start_matches('0').len() > MAX_AMOUNT_DIGITS {
        return Err(TokenError::InvalidArgument(format!(
            "Amount '{trimmed}' is too large"
        )));
    }

    let whole_part = if whole_part.is_empty() { "0" } else { whole_part };
    let normalized = if fraction_part.is_empty() {
        whole_part.to_string()
    } else {
        format!("{whole_part}.{fraction_part}")
    };
    let value = BigDecimal::from_str(&normalized).map_err(|e| {
        TokenError::InvalidArgument(format!("Invalid amount '{trimmed}': {e}"))
    })?;

    // digits * 10^-scale with a negative scale is a power of ten
    let scale = BigDecimal::new(1.into(), -i64::from(decimals));
    let scaled = value * scale;
    let whole = scaled.with_scale(0);
    if whole != scaled {
        return Err(TokenError::InvalidArgument(format!(
            "Amount '{trimmed}' has more than {decimals} decimal places"
        )));
    }

    let (digits, _) = whole.into_bigint_and_exponent();
    Amount::try_from(digits).map_err(|_| {
        TokenError::InvalidArgument(format!("Amount '{trimmed}' is too large"))
    })
}

/// Render base units as a decimal string, dropping trailing fractional zeros
pub fn format_units(amount: Amount, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}
