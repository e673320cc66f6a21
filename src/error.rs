// =============================================================================
// Engine Errors
// =============================================================================
//
// Every failure the engine can report is a deterministic input-shape problem:
// bad candle rows, bad indicator parameters, an unknown indicator key, or a
// conflicting projection.  Numeric edge cases (division by zero, warm-up) are
// never errors; they surface as undefined values.

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A candle row is missing a field or carries an unparsable value.
    #[error("invalid candle row {row}: field `{field}` {reason}")]
    Validation {
        row: usize,
        field: String,
        reason: String,
    },

    /// Malformed indicator parameter (period, MACD triple, flag value, column).
    #[error("invalid parameter: {0}")]
    Parameter(String),

    /// The request named an indicator key outside the closed set.
    #[error("unknown indicator `{0}`")]
    UnknownIndicator(String),

    #[error("You can only provide either drop_columns or only_columns, not both.")]
    ConflictingProjection,
}

impl EngineError {
    pub(crate) fn validation(row: usize, field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            row,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable tag for the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "ValidationError",
            Self::Parameter(_) => "ParameterError",
            Self::UnknownIndicator(_) => "UnknownIndicatorError",
            Self::ConflictingProjection => "ConflictingProjectionError",
        }
    }
}
