//! Ruler Units - Length unit registry and conversion
//!
//! Units are expressed as a factor relative to the meter. The registry is
//! fixed at four entries:
//! - Centimeters (0.01)
//! - Meters (1.00)
//! - Feet (0.3048)
//! - Millimeters (0.001)

mod unit;
mod units;
mod convert;
mod state;

pub use unit::UnitEntry;
pub use units::{UnitRegistry, UNITS, list_units, factor_of};
pub use convert::{Conversion, convert, convert_with, convert_value, convert_units, convert_units_with, format_result};
pub use state::ConverterState;

pub use ruler_core::{ConversionError, InputPolicy};
