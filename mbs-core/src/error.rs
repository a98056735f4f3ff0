use std::fmt;

/// Errors raised by the trip-data pipelines.
///
/// Load and parse failures abort the affected pipeline entirely: a partial
/// table would silently corrupt every scale computed from it downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// A data file could not be retrieved, or its structure is wrong
    /// (missing column, wrong row count, duplicate station id).
    Load(String),
    /// A field that must be numeric failed to parse.
    Parse { field: String, value: String },
    /// A slot index outside the valid range was passed to a selection or
    /// label lookup.
    OutOfRange { index: i64, limit: usize },
    /// A scale was requested over zero values.
    EmptyInput,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Load(msg) => write!(f, "load failed: {}", msg),
            DataError::Parse { field, value } => {
                write!(f, "field {} is not numeric: {:?}", field, value)
            }
            DataError::OutOfRange { index, limit } => {
                write!(f, "slot index {} outside 0..{}", index, limit)
            }
            DataError::EmptyInput => write!(f, "scale requested over empty input"),
        }
    }
}

impl std::error::Error for DataError {}
