use thiserror::Error;

use crate::schema::Feature;

/// A raw input value outside its feature's declared domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: {value} is outside the valid range {min}..={max}")]
    OutOfRange {
        field: Feature,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field}: {value} must be a whole number")]
    NotIntegral { field: Feature, value: f64 },

    #[error("{field}: value must be a finite number")]
    NotFinite { field: Feature },

    #[error("{field}: unrecognized label {label:?}")]
    UnknownLabel { field: Feature, label: String },

    #[error("{field}: {code} is not a valid code, expected one of {expected:?}")]
    UnknownCode {
        field: Feature,
        code: i64,
        expected: Vec<i64>,
    },
}

impl ValidationError {
    /// The feature whose value was rejected.
    pub fn field(&self) -> Feature {
        match self {
            Self::OutOfRange { field, .. }
            | Self::NotIntegral { field, .. }
            | Self::NotFinite { field }
            | Self::UnknownLabel { field, .. }
            | Self::UnknownCode { field, .. } => *field,
        }
    }
}
