//! Ruler Core - Fundamental types
//!
//! This crate provides the pieces shared by the converter and its front ends:
//! - `InputPolicy`, `parse_input`, `round2`: how raw text becomes a number and
//!   how results are rounded
//! - `ConversionError`: failures of the conversion core
//! - `RulerError`: structured errors for CLI and MCP consumers

mod number;
mod error;

pub use number::{InputPolicy, parse_input, round2, display_decimal, check_factor};
pub use error::{ConversionError, RulerError, codes};
