//! Errors
//!
//! `ConversionError` is what the conversion core returns. `RulerError` is the
//! structured, serializable form handed to CLI and MCP consumers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const INVALID_FACTOR: &str = "INVALID_FACTOR";
    pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const ARG_MISSING: &str = "ARG_MISSING";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error type for conversions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid conversion factor: {0}")]
    InvalidFactor(f64),

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("result out of range")]
    OutOfRange,
}

/// Structured error for CLI and MCP consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulerError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl RulerError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn unknown_unit(name: &str) -> Self {
        Self::new(codes::UNKNOWN_UNIT, format!("unknown unit: {}", name))
            .with_suggestion("Use list_units to see the supported units")
    }

    pub fn div_zero() -> Self {
        Self::new(codes::DIV_ZERO, "division by zero")
            .with_suggestion("Output factor must be positive")
    }

    pub fn arg_missing(arg: &str) -> Self {
        Self::new(codes::ARG_MISSING, format!("missing argument '{}'", arg))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("internal error: {}", details.into()))
    }
}

impl std::fmt::Display for RulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for RulerError {}

impl From<ConversionError> for RulerError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::UnknownUnit(name) => Self::unknown_unit(&name),
            ConversionError::DivisionByZero => Self::div_zero(),
            ConversionError::InvalidFactor(f) => Self::new(
                codes::INVALID_FACTOR,
                format!("invalid conversion factor: {}", f),
            ),
            ConversionError::OutOfRange => Self::new(codes::OUT_OF_RANGE, "result out of range")
                .with_suggestion("Use a smaller value"),
            ConversionError::InvalidNumber(raw) => {
                Self::new(codes::PARSE_ERROR, format!("invalid number: {:?}", raw))
                    .with_suggestion("Enter a decimal number such as 12.5")
            }
        }
    }
}
