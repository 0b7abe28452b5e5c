//! Unit definitions - the four supported length units

use std::collections::HashMap;
use std::sync::LazyLock;
use ruler_core::ConversionError;
use crate::UnitEntry;

/// Global unit registry
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// All registered units, in display order
pub fn list_units() -> &'static [UnitEntry] {
    UNITS.list()
}

/// Factor of the named unit, relative to meters
pub fn factor_of(name: &str) -> Result<f64, ConversionError> {
    UNITS.factor_of(name)
}

/// Ordered registry of length units.
///
/// Lookup accepts the display name, the symbol, or an alias, ignoring case
/// and surrounding whitespace.
pub struct UnitRegistry {
    units: Vec<UnitEntry>,
    aliases: HashMap<String, usize>,
    base: usize,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut registry = UnitRegistry {
            units: Vec::new(),
            aliases: HashMap::new(),
            base: 0,
        };
        registry.register_length_units();
        registry
    }

    /// Units in display order
    pub fn list(&self) -> &[UnitEntry] {
        &self.units
    }

    /// Get a unit by name, symbol or alias
    pub fn get(&self, name: &str) -> Option<&UnitEntry> {
        let key = name.trim().to_lowercase();
        self.aliases.get(&key).map(|&idx| &self.units[idx])
    }

    pub fn factor_of(&self, name: &str) -> Result<f64, ConversionError> {
        self.get(name)
            .map(|unit| unit.factor)
            .ok_or_else(|| ConversionError::UnknownUnit(name.to_string()))
    }

    /// Resolve a name or fail with `UnknownUnit`
    pub fn resolve(&self, name: &str) -> Result<&UnitEntry, ConversionError> {
        self.get(name)
            .ok_or_else(|| ConversionError::UnknownUnit(name.to_string()))
    }

    /// Display names in order
    pub fn names(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.name.as_str()).collect()
    }

    /// The base unit (meters)
    pub fn base(&self) -> &UnitEntry {
        &self.units[self.base]
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn register(&mut self, unit: UnitEntry) {
        let idx = self.units.len();
        if unit.is_base() {
            self.base = idx;
        }
        self.aliases.insert(unit.name.to_lowercase(), idx);
        self.aliases.insert(unit.symbol.to_lowercase(), idx);
        self.units.push(unit);
    }

    fn alias(&mut self, alias: &str, symbol: &str) {
        if let Some(&idx) = self.aliases.get(symbol) {
            self.aliases.insert(alias.to_lowercase(), idx);
        }
    }

    fn register_length_units(&mut self) {
        self.register(UnitEntry::new("Centimeters", "cm", 0.01));
        self.register(UnitEntry::new("Meters", "m", 1.00));
        self.register(UnitEntry::new("Feet", "ft", 0.3048));
        self.register(UnitEntry::new("Millimeters", "mm", 0.001));

        // Aliases
        self.alias("centimeter", "cm");
        self.alias("centimetre", "cm");
        self.alias("centimetres", "cm");
        self.alias("meter", "m");
        self.alias("metre", "m");
        self.alias("metres", "m");
        self.alias("foot", "ft");
        self.alias("millimeter", "mm");
        self.alias("millimetre", "mm");
        self.alias("millimetres", "mm");
        // spelling used by older dropdown labels
        self.alias("milimeters", "mm");
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
