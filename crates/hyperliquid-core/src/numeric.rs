//! Decimal formatting and rounding rules shared by every wire type.
//!
//! Prices and sizes travel as decimal strings with at most 8 fractional
//! digits. Amounts that the venue expects as integers (USD micro-units,
//! margin deltas) are scaled and rejected when the float cannot be
//! represented at the requested precision.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::{Error, Result};

/// Number of fractional digits carried by wire decimals.
pub const WIRE_DECIMALS: usize = 8;

/// Maximum drift tolerated between a float and its 8-digit rendering.
const WIRE_TOLERANCE: f64 = 1e-12;

/// Maximum drift tolerated when scaling a float to an integer.
const INT_TOLERANCE: f64 = 1e-3;

/// Decimal places of USD micro-units.
pub const USD_DECIMALS: u32 = 6;

/// Render a float as a canonical wire decimal.
///
/// The value is rounded to 8 decimal places; trailing zeros and a trailing
/// decimal point are stripped and `-0` becomes `0`.
///
/// # Errors
///
/// `InvalidNumber` for NaN or infinities, `PrecisionLoss` when the value
/// needs more than 8 decimal digits.
pub fn encode_wire(x: f64) -> Result<String> {
    if !x.is_finite() {
        return Err(Error::InvalidNumber(x.to_string()));
    }

    let rounded = format!("{:.*}", WIRE_DECIMALS, x);
    let parsed: f64 = rounded
        .parse()
        .map_err(|_| Error::InvalidNumber(rounded.clone()))?;

    if (parsed - x).abs() > WIRE_TOLERANCE {
        return Err(Error::PrecisionLoss {
            value: x,
            detail: format!("with {} decimal places", WIRE_DECIMALS),
        });
    }

    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    let wire = if trimmed == "-0" { "0" } else { trimmed };
    Ok(wire.to_string())
}

/// Scale a float by `10^decimals` and return the nearest integer.
///
/// # Errors
///
/// `PrecisionLoss` when the scaled value is `1e-3` or more away from an
/// integer, `InvalidNumber` for non-finite or out-of-range values.
pub fn scale_to_int(x: f64, decimals: u32) -> Result<i64> {
    if !x.is_finite() {
        return Err(Error::InvalidNumber(x.to_string()));
    }

    let scaled = x * 10f64.powi(decimals as i32);
    let rounded = scaled.round();
    if (rounded - scaled).abs() >= INT_TOLERANCE {
        return Err(Error::PrecisionLoss {
            value: x,
            detail: format!("as an integer with {} decimals", decimals),
        });
    }
    if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err(Error::InvalidNumber(format!("{} overflows i64", scaled)));
    }

    Ok(rounded as i64)
}

/// Convert a USD amount to micro-units.
pub fn usd_to_int(x: f64) -> Result<i64> {
    scale_to_int(x, USD_DECIMALS)
}

/// Round to `figures` significant figures.
///
/// Values whose scale factor leaves the f64 range (subnormals, very
/// large `figures`) come back unchanged.
pub fn round_to_significant_figures(x: f64, figures: u32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }

    let magnitude = x.abs().log10().ceil() as i32;
    let power = i32::try_from(figures)
        .unwrap_or(i32::MAX)
        .saturating_sub(magnitude);

    // Keep the multiplier an exact power of ten in both directions.
    let rounded = if power >= 0 {
        let factor = 10f64.powi(power);
        (x * factor).round() / factor
    } else {
        let factor = 10f64.powi(-power);
        (x / factor).round() * factor
    };

    if rounded.is_finite() {
        rounded
    } else {
        x
    }
}

/// Banker's rounding to `digits` decimal places.
///
/// Negative `digits` round to tens, hundreds and so on. The exact binary
/// value of `x` is rounded, so `-1.2345` (stored just above `-1.2345`)
/// rounds to `-1.234`.
pub fn round_half_to_even(x: f64, digits: i32) -> Result<f64> {
    if !x.is_finite() {
        return Err(Error::InvalidNumber(x.to_string()));
    }

    // Every f64 at or above 2^52 is already an integer.
    if digits >= 0 && x.abs() >= 4_503_599_627_370_496.0 {
        return Ok(x);
    }

    let rounded = Decimal::from_f64_retain(x).and_then(|value| {
        if digits >= 0 {
            Some(value.round_dp_with_strategy(digits as u32, RoundingStrategy::MidpointNearestEven))
        } else {
            let factor = pow10(digits.unsigned_abs())?;
            value
                .checked_div(factor)?
                .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
                .checked_mul(factor)
        }
    });

    match rounded {
        Some(rounded) => rounded
            .normalize()
            .to_string()
            .parse()
            .map_err(|_| Error::InvalidNumber(rounded.to_string())),
        None => Ok(round_half_to_even_binary(x, digits)),
    }
}

/// Ties-to-even on the f64 itself, for magnitudes outside `Decimal` range.
fn round_half_to_even_binary(x: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits.saturating_abs());
    if !factor.is_finite() {
        return if digits >= 0 { x } else { 0.0 };
    }

    let rounded = if digits >= 0 {
        (x * factor).round_ties_even() / factor
    } else {
        (x / factor).round_ties_even() * factor
    };

    if rounded.is_finite() {
        rounded
    } else {
        x
    }
}

fn pow10(exponent: u32) -> Option<Decimal> {
    let mut factor = Decimal::ONE;
    for _ in 0..exponent {
        factor = factor.checked_mul(Decimal::TEN)?;
    }
    Some(factor)
}

/// Return the dex prefix of a symbol such as `xyz:BTC`, or `""` for the
/// default perp dex.
pub fn extract_dex_prefix(symbol: &str) -> &str {
    symbol.split_once(':').map(|(dex, _)| dex).unwrap_or("")
}

/// Parse a wire decimal back into a float.
pub fn parse_wire(wire: &str) -> Result<f64> {
    Decimal::from_str(wire).map_err(|e| Error::InvalidNumber(format!("{}: {}", wire, e)))?;
    wire.parse().map_err(|_| Error::InvalidNumber(wire.to_string()))
}
