//! Unit conversion functions for Ruler

use serde::Serialize;
use tracing::trace;
use ruler_core::{check_factor, display_decimal, parse_input, round2, ConversionError, InputPolicy};
use crate::UnitEntry;
use crate::units::UNITS;

/// Convert raw input text from one factor to another, rounded to 2 decimals.
///
/// Text that is not a number converts as 0.
///
/// ```
/// assert_eq!(ruler_units::convert("100", 0.01, 1.00), Ok(1.0));
/// assert_eq!(ruler_units::convert("abc", 0.01, 1.00), Ok(0.0));
/// ```
pub fn convert(raw_input: &str, input_factor: f64, output_factor: f64) -> Result<f64, ConversionError> {
    convert_with(InputPolicy::ZeroFallback, raw_input, input_factor, output_factor)
}

/// Like [`convert`], with an explicit policy for unparseable input
pub fn convert_with(
    policy: InputPolicy,
    raw_input: &str,
    input_factor: f64,
    output_factor: f64,
) -> Result<f64, ConversionError> {
    let value = parse_input(raw_input, policy)?;
    convert_value(value, input_factor, output_factor)
}

/// Convert an already parsed value
pub fn convert_value(value: f64, input_factor: f64, output_factor: f64) -> Result<f64, ConversionError> {
    check_factor(output_factor)?;
    if input_factor == 0.0 {
        return Err(ConversionError::InvalidFactor(input_factor));
    }
    check_factor(input_factor)?;

    let exact = value * input_factor / output_factor;
    if !exact.is_finite() {
        return Err(ConversionError::OutOfRange);
    }
    let result = round2(exact);

    trace!(value, input_factor, output_factor, result, "converted");
    Ok(result)
}

/// A resolved conversion between two registered units
#[derive(Debug, Clone, Serialize)]
pub struct Conversion<'a> {
    pub value: f64,
    pub from: &'a UnitEntry,
    pub to: &'a UnitEntry,
    pub result: f64,
}

impl Conversion<'_> {
    /// Display label, e.g. "Result: 3.28 Feet"
    pub fn label(&self) -> String {
        format_result(self.result, self.to)
    }
}

/// Convert between two unit names known to the registry
pub fn convert_units(raw_input: &str, from: &str, to: &str) -> Result<Conversion<'static>, ConversionError> {
    convert_units_with(InputPolicy::ZeroFallback, raw_input, from, to)
}

pub fn convert_units_with(
    policy: InputPolicy,
    raw_input: &str,
    from: &str,
    to: &str,
) -> Result<Conversion<'static>, ConversionError> {
    let from_unit = UNITS.resolve(from)?;
    let to_unit = UNITS.resolve(to)?;

    let value = parse_input(raw_input, policy)?;
    let result = convert_value(value, from_unit.factor, to_unit.factor)?;

    Ok(Conversion {
        value,
        from: from_unit,
        to: to_unit,
        result,
    })
}

/// Format a result the way the converter screen shows it
pub fn format_result(value: f64, unit: &UnitEntry) -> String {
    format!("Result: {} {}", display_decimal(value), unit.name)
}
