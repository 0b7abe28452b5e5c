//! Numeric policy: parsing raw input text, rounding and display

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ConversionError;

/// How raw input text that is not a finite number is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Unparseable input counts as zero
    #[default]
    ZeroFallback,
    /// Unparseable input is rejected with `ConversionError::InvalidNumber`
    Strict,
}

impl InputPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            InputPolicy::Strict
        } else {
            InputPolicy::ZeroFallback
        }
    }
}

/// Parse raw input text into a finite `f64` according to `policy`.
///
/// Surrounding whitespace is ignored. `NaN` and infinities are treated the
/// same as text that does not parse at all.
pub fn parse_input(raw: &str, policy: InputPolicy) -> Result<f64, ConversionError> {
    if let Some(value) = parse_finite(raw) {
        return Ok(value);
    }

    match policy {
        InputPolicy::ZeroFallback => {
            debug!(input = raw, "input is not a number, using 0");
            Ok(0.0)
        }
        InputPolicy::Strict => Err(ConversionError::InvalidNumber(raw.to_string())),
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Values at or above this magnitude have no fractional part
const INTEGRAL_THRESHOLD: f64 = 4_503_599_627_370_496.0; // 2^52

/// Round to two decimal places, half away from zero.
pub fn round2(x: f64) -> f64 {
    if !x.is_finite() || x.abs() >= INTEGRAL_THRESHOLD {
        return x;
    }
    // adding 0.0 turns -0.0 into 0.0
    (x * 100.0).round() / 100.0 + 0.0
}

/// Shortest decimal form that reads back to the same value, always with a
/// fractional part ("1.0", "3.28").
pub fn display_decimal(x: f64) -> String {
    let mut out = format!("{}", x);
    if x.is_finite() && !out.contains('.') {
        out.push_str(".0");
    }
    out
}

/// Validate a conversion factor. Factors must be finite and positive.
pub fn check_factor(factor: f64) -> Result<(), ConversionError> {
    if factor == 0.0 {
        return Err(ConversionError::DivisionByZero);
    }
    if !factor.is_finite() || factor < 0.0 {
        return Err(ConversionError::InvalidFactor(factor));
    }
    Ok(())
}
