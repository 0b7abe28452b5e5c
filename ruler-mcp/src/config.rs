//! Environment configuration
//!
//! - `RULER_STRICT`: reject input that is not a number instead of using 0
//! - `RULER_DEFAULT_FROM` / `RULER_DEFAULT_TO`: units used when a
//!   conversion does not name one
//!
//! Logging is configured separately through `RUST_LOG`.

use std::env;

pub const DEFAULT_UNIT: &str = "Meters";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub strict: bool,
    pub default_from: String,
    pub default_to: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let unit = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_UNIT.to_string())
        };

        Config {
            strict: lookup("RULER_STRICT").is_some_and(|v| parse_flag(&v)),
            default_from: unit("RULER_DEFAULT_FROM"),
            default_to: unit("RULER_DEFAULT_TO"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            strict: false,
            default_from: DEFAULT_UNIT.to_string(),
            default_to: DEFAULT_UNIT.to_string(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn test_strict_flag() {
        assert!(config_from(&[("RULER_STRICT", "1")]).strict);
        assert!(config_from(&[("RULER_STRICT", "TRUE")]).strict);
        assert!(!config_from(&[("RULER_STRICT", "0")]).strict);
        assert!(!config_from(&[("RULER_STRICT", "nope")]).strict);
    }

    #[test]
    fn test_default_units() {
        let config = config_from(&[("RULER_DEFAULT_FROM", " ft "), ("RULER_DEFAULT_TO", "")]);
        assert_eq!(config.default_from, "ft");
        assert_eq!(config.default_to, DEFAULT_UNIT);
    }
}
