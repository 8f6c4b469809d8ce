//! Error types for query building.

use sift_core::Operator;
use thiserror::Error;

use crate::schema::CastType;

/// A specialized Result type for query building.
pub type QueryResult<T> = Result<T, QueryError>;

/// A condition value could not be converted to its field's type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CastError {
    /// The value is not a valid representation of the target type.
    #[error("cannot cast '{value}' to {target} for field '{field}'")]
    Invalid {
        /// The condition's field.
        field: String,
        /// The rejected value.
        value: String,
        /// The target type.
        target: CastType,
    },

    /// A custom schema rejected the conditions.
    #[error("{0}")]
    Rejected(String),
}

impl CastError {
    /// Creates an invalid value error.
    pub fn invalid(field: impl Into<String>, value: impl Into<String>, target: CastType) -> Self {
        CastError::Invalid {
            field: field.into(),
            value: value.into(),
            target,
        }
    }
}

/// Errors that can occur while applying filters to a query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Raw parameters were given without field configurations to parse them.
    #[error("raw parameters require field configurations")]
    MissingConfig,

    /// A condition value failed schema casting.
    #[error(transparent)]
    Cast(#[from] CastError),

    /// The adapter does not implement a condition's operator.
    #[error("adapter '{adapter}' does not support operator '{operator}' (field '{field}')")]
    UnsupportedOperator {
        /// The adapter's name.
        adapter: &'static str,
        /// The unsupported operator.
        operator: Operator,
        /// The condition's field.
        field: String,
    },
}
