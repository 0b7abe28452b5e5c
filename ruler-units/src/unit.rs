//! Unit representation with its conversion factor

use std::fmt;
use serde::{Deserialize, Serialize};

/// A length unit and its size in meters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitEntry {
    /// Display label (e.g., "Centimeters")
    pub name: String,
    /// Short symbol (e.g., "cm")
    pub symbol: String,
    /// One of this unit equals `factor` meters
    pub factor: f64,
}

impl UnitEntry {
    pub fn new(name: &str, symbol: &str, factor: f64) -> Self {
        UnitEntry {
            name: name.to_string(),
            symbol: symbol.to_string(),
            factor,
        }
    }

    /// Check if this is the base unit (meters)
    pub fn is_base(&self) -> bool {
        self.factor == 1.0
    }

    /// Convert a value in this unit to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        value * self.factor
    }

    /// Convert a value in meters to this unit
    pub fn from_meters(&self, meters: f64) -> f64 {
        meters / self.factor
    }
}

impl fmt::Display for UnitEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
