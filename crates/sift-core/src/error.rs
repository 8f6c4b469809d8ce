//! Error types for field configuration and filter validation.

use thiserror::Error;

use crate::models::FieldType;
use crate::operator::Operator;

/// Errors raised while building a [`FieldConfig`](crate::models::FieldConfig).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The field name is empty.
    #[error("field name must not be empty")]
    EmptyField,

    /// No operators were allowed for the field.
    #[error("field '{field}' must allow at least one operator")]
    NoOperators {
        /// The offending field.
        field: String,
    },

    /// The default operator is not one of the allowed operators.
    #[error("default operator '{operator}' is not allowed for field '{field}'")]
    DefaultOperatorNotAllowed {
        /// The offending field.
        field: String,
        /// The configured default operator.
        operator: Operator,
    },

    /// A choice field was declared without an options source.
    #[error("{field_type} field '{field}' requires an options source")]
    MissingOptions {
        /// The offending field.
        field: String,
        /// The field's type.
        field_type: FieldType,
    },

    /// An operator symbol in a serialized configuration is not recognized.
    #[error("unknown operator '{symbol}' on field '{field}'")]
    UnknownOperator {
        /// The offending field.
        field: String,
        /// The unrecognized symbol.
        symbol: String,
    },

    /// Two configurations share the same field name.
    #[error("field '{field}' is configured more than once")]
    DuplicateField {
        /// The duplicated field.
        field: String,
    },
}

impl ConfigError {
    /// Creates a no-operators error.
    pub fn no_operators(field: impl Into<String>) -> Self {
        ConfigError::NoOperators {
            field: field.into(),
        }
    }

    /// Creates an unknown operator error.
    pub fn unknown_operator(field: impl Into<String>, symbol: impl Into<String>) -> Self {
        ConfigError::UnknownOperator {
            field: field.into(),
            symbol: symbol.into(),
        }
    }
}

/// The first violation found by the [`Validator`](crate::validator::Validator).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The filter uses an operator its field does not allow.
    #[error("operator '{operator}' is not allowed for field '{field}'")]
    InvalidOperator {
        /// The rejected operator.
        operator: Operator,
        /// The filter's field.
        field: String,
    },

    /// A text value exceeds the maximum length (in characters).
    #[error("value too long: {actual} characters (max {max})")]
    ValueTooLong {
        /// Actual length in characters.
        actual: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A list value has too many elements.
    #[error("list too large: {actual} items (max {max})")]
    ListTooLarge {
        /// Actual number of items.
        actual: usize,
        /// Configured maximum.
        max: usize,
    },
}

impl ValidationError {
    /// Returns a stable machine-readable code for this violation.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidOperator { .. } => "INVALID_OPERATOR",
            ValidationError::ValueTooLong { .. } => "VALUE_TOO_LONG",
            ValidationError::ListTooLarge { .. } => "LIST_TOO_LARGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::ValueTooLong {
            actual: 501,
            max: 500,
        };
        assert_eq!(err.to_string(), "value too long: 501 characters (max 500)");

        let err = ValidationError::InvalidOperator {
            operator: Operator::Gt,
            field: "status".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "operator 'gt' is not allowed for field 'status'"
        );
    }

    #[test]
    fn test_validation_error_codes() {
        assert_eq!(
            ValidationError::ListTooLarge { actual: 101, max: 100 }.code(),
            "LIST_TOO_LARGE"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingOptions {
            field: "status".to_string(),
            field_type: FieldType::Select,
        };
        assert_eq!(
            err.to_string(),
            "select field 'status' requires an options source"
        );
        assert_eq!(
            ConfigError::unknown_operator("total", "between").to_string(),
            "unknown operator 'between' on field 'total'"
        );
    }
}
