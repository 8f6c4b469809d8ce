//! Strict validation of active filters.
//!
//! The parser accepts anything; the validator is the gate that rejects
//! operators a field does not allow and values that are too large.

use crate::error::ValidationError;
use crate::models::{Filter, FilterValue};

/// Default maximum text value length, in characters.
pub const MAX_VALUE_LENGTH: usize = 500;

/// Default maximum number of list items.
pub const MAX_LIST_SIZE: usize = 100;

/// Validates `filters` with the default limits.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, in filter order.
pub fn validate(filters: &[Filter<'_>]) -> Result<(), ValidationError> {
    Validator::new().validate(filters)
}

/// Filter validator with configurable limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_value_length: usize,
    max_list_size: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Creates a validator with the default limits.
    pub fn new() -> Self {
        Self {
            max_value_length: MAX_VALUE_LENGTH,
            max_list_size: MAX_LIST_SIZE,
        }
    }

    /// Sets the maximum text value length, in characters.
    pub fn max_value_length(mut self, max: usize) -> Self {
        self.max_value_length = max;
        self
    }

    /// Sets the maximum number of list items.
    pub fn max_list_size(mut self, max: usize) -> Self {
        self.max_list_size = max;
        self
    }

    /// Checks every filter in order, stopping at the first violation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidOperator`] if a filter's operator
    /// is not allowed by its configuration, [`ValidationError::ValueTooLong`]
    /// for oversized text and [`ValidationError::ListTooLarge`] for oversized
    /// lists.
    pub fn validate(&self, filters: &[Filter<'_>]) -> Result<(), ValidationError> {
        filters.iter().try_for_each(|filter| self.check(filter))
    }

    fn check(&self, filter: &Filter<'_>) -> Result<(), ValidationError> {
        if !filter.config().allows(filter.operator) {
            return Err(ValidationError::InvalidOperator {
                operator: filter.operator,
                field: filter.field.clone(),
            });
        }

        match &filter.value {
            FilterValue::Text(text) => {
                let actual = text.chars().count();
                if actual > self.max_value_length {
                    return Err(ValidationError::ValueTooLong {
                        actual,
                        max: self.max_value_length,
                    });
                }
            }
            FilterValue::List(items) => {
                if items.len() > self.max_list_size {
                    return Err(ValidationError::ListTooLarge {
                        actual: items.len(),
                        max: self.max_list_size,
                    });
                }
            }
            FilterValue::Null
            | FilterValue::Bool(_)
            | FilterValue::Number(_)
            | FilterValue::Range(..) => {}
        }
        Ok(())
    }
}
