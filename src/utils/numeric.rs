//! Rounding helpers shared by the layout planner and the accessory rules.
//!
//! Every quantity in an estimate is a whole unit that was rounded *up*, so
//! these helpers all saturate at zero instead of going negative. Counts that
//! would not fit a `u32` are rejected as invalid input.

use crate::utils::error::{CalcError, Result};

fn too_large(what: &str) -> CalcError {
    CalcError::InvalidInput {
        message: format!("the deck is too large to count {}", what),
    }
}

/// `ceil(value)` as a count. Negative and NaN inputs count as zero.
pub fn ceil_count(value: f64) -> Result<u32> {
    let rounded = value.ceil();
    if rounded.is_nan() || rounded <= 0.0 {
        Ok(0)
    } else if rounded > u32::MAX as f64 {
        Err(too_large("in whole units"))
    } else {
        Ok(rounded as u32)
    }
}

pub fn add_counts(a: u32, b: u32) -> Result<u32> {
    a.checked_add(b).ok_or_else(|| too_large("the sum"))
}

pub fn mul_counts(a: u32, b: u32) -> Result<u32> {
    a.checked_mul(b).ok_or_else(|| too_large("the product"))
}

/// Integer `ceil(numerator / denominator)`; a zero denominator yields zero.
pub fn ceil_div(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    numerator.div_ceil(denominator)
}

/// Rounds half away from zero to two decimals, the way prices and areas are shown.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds `value` up to the next multiple of `step` (95 -> 100, 110 -> 110).
pub fn round_up_to(value: u32, step: u32) -> u32 {
    ceil_div(value, step) * step
}

/// Metres to whole millimetres, rounding to the nearest millimetre.
pub fn metres_to_mm(metres: f64) -> u32 {
    let mm = (metres * 1000.0).round();
    if mm.is_nan() || mm <= 0.0 {
        0
    } else {
        mm as u32
    }
}
