//! Active filter instances.

use serde::Serialize;
use uuid::Uuid;

use super::field::FieldConfig;
use super::value::FilterValue;
use crate::operator::Operator;

/// One active filter: a field, the chosen operator and its value.
///
/// A filter borrows the [`FieldConfig`] it was created from; both are scoped
/// to one request. Equality compares `field`, `operator` and `value` only.
#[derive(Debug, Clone, Serialize)]
pub struct Filter<'a> {
    /// Opaque identifier, unique within an active filter list.
    pub id: String,
    /// The filtered field.
    pub field: String,
    /// The chosen operator.
    pub operator: Operator,
    /// The current value.
    pub value: FilterValue,
    #[serde(skip)]
    config: &'a FieldConfig,
}

impl<'a> Filter<'a> {
    /// Creates a filter with the configuration's default operator and value.
    pub fn new(config: &'a FieldConfig) -> Self {
        Self::with(
            config,
            config.default_operator(),
            config.default_value().clone(),
        )
    }

    /// Creates a filter with an explicit operator and value.
    pub fn with(
        config: &'a FieldConfig,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            field: config.field().to_string(),
            operator,
            value: value.into(),
            config,
        }
    }

    /// The owning configuration.
    pub fn config(&self) -> &'a FieldConfig {
        self.config
    }

    /// Replaces the operator.
    pub fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
    }

    /// Replaces the value.
    pub fn set_value(&mut self, value: impl Into<FilterValue>) {
        self.value = value.into();
    }

    /// Restores the default operator and value.
    pub fn reset(&mut self) {
        self.operator = self.config.default_operator();
        self.value = self.config.default_value().clone();
    }

    /// Returns true if the value carries nothing to filter on.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl PartialEq for Filter<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.operator == other.operator && self.value == other.value
    }
}
