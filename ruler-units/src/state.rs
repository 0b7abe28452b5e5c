//! Converter screen state
//!
//! Owned by whatever front end drives the converter. Every edit or unit
//! selection recomputes the output, the same way the converter screen does
//! on each keystroke.

use ruler_core::{display_decimal, parse_input, ConversionError, InputPolicy};
use crate::convert::convert_value;
use crate::units::UNITS;
use crate::UnitEntry;

#[derive(Debug, Clone)]
pub struct ConverterState {
    input: String,
    input_unit: &'static UnitEntry,
    output_unit: &'static UnitEntry,
    output: Option<f64>,
    policy: InputPolicy,
}

impl ConverterState {
    /// Empty input, both units set to meters, nothing converted yet
    pub fn new() -> Self {
        let base = UNITS.base();
        ConverterState {
            input: String::new(),
            input_unit: base,
            output_unit: base,
            output: None,
            policy: InputPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: InputPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_unit(&self) -> &'static UnitEntry {
        self.input_unit
    }

    pub fn output_unit(&self) -> &'static UnitEntry {
        self.output_unit
    }

    /// Last computed result, `None` before the first edit or after a
    /// rejected edit under the strict policy
    pub fn output(&self) -> Option<f64> {
        self.output
    }

    /// Replace the input text and recompute
    pub fn set_input(&mut self, text: &str) -> Result<f64, ConversionError> {
        self.input = text.to_string();
        self.refresh()
    }

    /// Select the unit the input is expressed in and recompute.
    ///
    /// Unknown names leave the state untouched.
    pub fn select_input_unit(&mut self, name: &str) -> Result<f64, ConversionError> {
        self.input_unit = UNITS.resolve(name)?;
        self.refresh()
    }

    /// Select the unit to convert into and recompute
    pub fn select_output_unit(&mut self, name: &str) -> Result<f64, ConversionError> {
        self.output_unit = UNITS.resolve(name)?;
        self.refresh()
    }

    /// "Result: {output} {output unit}", with an empty output before the
    /// first conversion
    pub fn label(&self) -> String {
        let output = self.output.map(display_decimal).unwrap_or_default();
        format!("Result: {} {}", output, self.output_unit.name)
    }

    fn refresh(&mut self) -> Result<f64, ConversionError> {
        self.output = None;
        let value = parse_input(&self.input, self.policy)?;
        let result = convert_value(value, self.input_unit.factor, self.output_unit.factor)?;
        self.output = Some(result);
        Ok(result)
    }
}

impl Default for ConverterState {
    fn default() -> Self {
        Self::new()
    }
}
