//! Field configuration.
//!
//! A [`FieldConfig`] is the static description of one filterable field. It
//! is built once at application start and shared read-only by every request.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::value::FilterValue;
use crate::error::ConfigError;
use crate::operator::Operator;
use crate::parser::decode_value;

/// The kind of a filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Select,
    MultiSelect,
    Date,
    Datetime,
    DateRange,
    DatetimeRange,
    Boolean,
    RadioGroup,
}

impl FieldType {
    /// Returns the snake_case name of this type.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multi_select",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::DateRange => "date_range",
            FieldType::DatetimeRange => "datetime_range",
            FieldType::Boolean => "boolean",
            FieldType::RadioGroup => "radio_group",
        }
    }

    /// Returns true for types whose values come from an options list.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::MultiSelect | FieldType::RadioGroup
        )
    }

    /// Returns true for the two range types.
    pub fn is_range(self) -> bool {
        matches!(self, FieldType::DateRange | FieldType::DatetimeRange)
    }

    /// Operators allowed when a configuration does not list its own.
    /// The first entry is the default operator.
    pub fn default_operators(self) -> &'static [Operator] {
        match self {
            FieldType::Text => &[Operator::Ilike, Operator::Eq, Operator::Neq, Operator::Like],
            FieldType::Number => &[
                Operator::Eq,
                Operator::Neq,
                Operator::Gt,
                Operator::Gte,
                Operator::Lt,
                Operator::Lte,
            ],
            FieldType::Select | FieldType::RadioGroup => {
                &[Operator::Eq, Operator::Neq, Operator::In]
            }
            FieldType::MultiSelect => &[
                Operator::In,
                Operator::NotIn,
                Operator::Ov,
                Operator::Cs,
                Operator::Cd,
            ],
            FieldType::Date | FieldType::Datetime => &[
                Operator::Eq,
                Operator::Gt,
                Operator::Gte,
                Operator::Lt,
                Operator::Lte,
            ],
            FieldType::DateRange | FieldType::DatetimeRange => &[Operator::GteLte],
            FieldType::Boolean => &[Operator::Is],
        }
    }

    /// The neutral value a new filter of this type starts with.
    pub fn empty_value(self) -> FilterValue {
        match self {
            FieldType::DateRange | FieldType::DatetimeRange => FilterValue::Range(None, None),
            FieldType::MultiSelect => FilterValue::List(Vec::new()),
            FieldType::Text
            | FieldType::Number
            | FieldType::Select
            | FieldType::Date
            | FieldType::Datetime
            | FieldType::Boolean
            | FieldType::RadioGroup => FilterValue::Null,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// The encoded value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl SelectOption {
    /// Creates an option whose label equals its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

type OptionsSupplier = Arc<dyn Fn() -> Vec<SelectOption> + Send + Sync>;

/// Where a choice field gets its options from.
///
/// Lazy suppliers are only invoked by [`OptionsSource::resolve`]; nothing in
/// the parse/serialize/query pipeline resolves them.
#[derive(Clone)]
pub enum OptionsSource {
    /// A fixed list.
    Static(Vec<SelectOption>),
    /// A supplier called on demand.
    Lazy(OptionsSupplier),
}

impl OptionsSource {
    /// Creates a static source from plain values.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OptionsSource::Static(values.into_iter().map(SelectOption::plain).collect())
    }

    /// Creates a lazy source.
    pub fn lazy<F>(supplier: F) -> Self
    where
        F: Fn() -> Vec<SelectOption> + Send + Sync + 'static,
    {
        OptionsSource::Lazy(Arc::new(supplier))
    }

    /// Returns the options, invoking the supplier for lazy sources.
    pub fn resolve(&self) -> Vec<SelectOption> {
        match self {
            OptionsSource::Static(options) => options.clone(),
            OptionsSource::Lazy(supplier) => supplier(),
        }
    }
}

impl fmt::Debug for OptionsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsSource::Static(options) => f.debug_tuple("Static").field(options).finish(),
            OptionsSource::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Static description of one filterable field.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    field: String,
    field_type: FieldType,
    label: Option<String>,
    operators: Vec<Operator>,
    default_operator: Operator,
    default_value: FilterValue,
    query_field: Option<String>,
    custom_param: Option<String>,
    always_on: bool,
    options: Option<OptionsSource>,
}

impl FieldConfig {
    /// Starts building a configuration for `field` of the given type.
    pub fn builder(field: impl Into<String>, field_type: FieldType) -> FieldConfigBuilder {
        FieldConfigBuilder {
            field: field.into(),
            field_type,
            label: None,
            operators: None,
            default_operator: None,
            default_value: None,
            query_field: None,
            custom_param: None,
            always_on: false,
            options: None,
        }
    }

    /// The field identifier.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The field's type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Display label, falling back to the field name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field)
    }

    /// Allowed operators, in preference order.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Returns true if `operator` is allowed on this field.
    pub fn allows(&self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }

    /// The operator new filters start with.
    pub fn default_operator(&self) -> Operator {
        self.default_operator
    }

    /// The value new (and reset) filters start with.
    pub fn default_value(&self) -> &FilterValue {
        &self.default_value
    }

    /// The underlying column or attribute name.
    pub fn query_field(&self) -> &str {
        self.query_field.as_deref().unwrap_or(&self.field)
    }

    /// The bespoke parameter key, if any.
    pub fn custom_param(&self) -> Option<&str> {
        self.custom_param.as_deref()
    }

    /// The key this field is encoded under.
    pub fn param_key(&self) -> &str {
        self.custom_param.as_deref().unwrap_or(&self.field)
    }

    /// Whether the field is always present in the active filter set.
    pub fn always_on(&self) -> bool {
        self.always_on
    }

    /// The options source of a choice field.
    pub fn options(&self) -> Option<&OptionsSource> {
        self.options.as_ref()
    }
}

/// Builder for [`FieldConfig`].
#[derive(Debug, Clone)]
pub struct FieldConfigBuilder {
    field: String,
    field_type: FieldType,
    label: Option<String>,
    operators: Option<Vec<Operator>>,
    default_operator: Option<Operator>,
    default_value: Option<FilterValue>,
    query_field: Option<String>,
    custom_param: Option<String>,
    always_on: bool,
    options: Option<OptionsSource>,
}

impl FieldConfigBuilder {
    /// Sets the display label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the allowed operators. Defaults to the type's operators.
    pub fn operators(mut self, operators: impl IntoIterator<Item = Operator>) -> Self {
        let mut list: Vec<Operator> = Vec::new();
        for op in operators {
            if !list.contains(&op) {
                list.push(op);
            }
        }
        self.operators = Some(list);
        self
    }

    /// Sets the default operator. Defaults to the first allowed operator.
    pub fn default_operator(mut self, operator: Operator) -> Self {
        self.default_operator = Some(operator);
        self
    }

    /// Sets the default value. Defaults to the type's empty value.
    pub fn default_value(mut self, value: impl Into<FilterValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the underlying column name.
    pub fn query_field(mut self, query_field: impl Into<String>) -> Self {
        self.query_field = Some(query_field.into());
        self
    }

    /// Encodes this field under a bespoke key with no operator prefix.
    pub fn custom_param(mut self, key: impl Into<String>) -> Self {
        self.custom_param = Some(key.into());
        self
    }

    /// Keeps the field in the active filter set even without input.
    pub fn always_on(mut self, always_on: bool) -> Self {
        self.always_on = always_on;
        self
    }

    /// Sets the options source.
    pub fn options(mut self, options: OptionsSource) -> Self {
        self.options = Some(options);
        self
    }

    /// Checks the invariants and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the field name is empty, no operator is
    /// allowed, the default operator is not allowed, or a choice field has
    /// no options source.
    pub fn build(self) -> Result<FieldConfig, ConfigError> {
        if self.field.trim().is_empty() {
            return Err(ConfigError::EmptyField);
        }

        let operators = self
            .operators
            .unwrap_or_else(|| self.field_type.default_operators().to_vec());
        let Some(&first) = operators.first() else {
            return Err(ConfigError::no_operators(self.field));
        };

        let default_operator = self.default_operator.unwrap_or(first);
        if !operators.contains(&default_operator) {
            return Err(ConfigError::DefaultOperatorNotAllowed {
                field: self.field,
                operator: default_operator,
            });
        }

        if self.field_type.is_choice() && self.options.is_none() {
            return Err(ConfigError::MissingOptions {
                field: self.field,
                field_type: self.field_type,
            });
        }

        let default_value = match self.default_value {
            Some(value) => wire_shaped(default_operator, value),
            None => self.field_type.empty_value(),
        };

        Ok(FieldConfig {
            default_value,
            field: self.field,
            field_type: self.field_type,
            label: self.label,
            operators,
            default_operator,
            query_field: self.query_field,
            custom_param: self.custom_param,
            always_on: self.always_on,
            options: self.options,
        })
    }
}

/// Reshapes a scalar default the way the parser would read it back, so an
/// always-on default survives serialization unchanged.
fn wire_shaped(operator: Operator, value: FilterValue) -> FilterValue {
    let rendered = match &value {
        FilterValue::Number(_) | FilterValue::Bool(_) => value.to_string(),
        FilterValue::Text(text) if !text.is_empty() => text.clone(),
        _ => return value,
    };
    match decode_value(operator, &rendered) {
        (decoded_operator, decoded) if decoded_operator == operator => decoded,
        _ => value,
    }
}

/// Serialized form of a [`FieldConfig`], as found in configuration files.
///
/// Operators are written as wire symbols; choice fields list their options
/// as plain values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfigSpec {
    /// Field identifier.
    pub field: String,

    /// Field type, text when omitted.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Allowed operator symbols.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operators: Vec<String>,

    /// Default operator symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_operator: Option<String>,

    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FilterValue>,

    /// Underlying column name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_field: Option<String>,

    /// Bespoke parameter key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_param: Option<String>,

    /// Always present in the active set.
    #[serde(default)]
    pub always_on: bool,

    /// Static option values for choice fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl TryFrom<FieldConfigSpec> for FieldConfig {
    type Error = ConfigError;

    fn try_from(spec: FieldConfigSpec) -> Result<Self, Self::Error> {
        let resolve = |symbol: &str| {
            Operator::from_symbol(symbol)
                .ok_or_else(|| ConfigError::unknown_operator(&spec.field, symbol))
        };

        let operators = spec
            .operators
            .iter()
            .map(|s| resolve(s.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let default_operator = spec.default_operator.as_deref().map(resolve).transpose()?;

        let mut builder =
            FieldConfig::builder(&spec.field, spec.field_type.unwrap_or(FieldType::Text))
                .always_on(spec.always_on);
        if !spec.operators.is_empty() {
            builder = builder.operators(operators);
        }
        if let Some(op) = default_operator {
            builder = builder.default_operator(op);
        }
        if let Some(value) = spec.default_value {
            builder = builder.default_value(value);
        }
        if let Some(label) = spec.label {
            builder = builder.label(label);
        }
        if let Some(query_field) = spec.query_field {
            builder = builder.query_field(query_field);
        }
        if let Some(key) = spec.custom_param {
            builder = builder.custom_param(key);
        }
        if !spec.options.is_empty() {
            builder = builder.options(OptionsSource::from_values(spec.options));
        }
        builder.build()
    }
}

/// Lookup helper over a slice of field configurations.
#[derive(Debug, Clone, Copy)]
pub struct FieldConfigSet<'a> {
    configs: &'a [FieldConfig],
}

impl<'a> FieldConfigSet<'a> {
    /// Wraps a slice of configurations.
    pub fn new(configs: &'a [FieldConfig]) -> Self {
        Self { configs }
    }

    /// Builds configurations from specs, rejecting duplicate field names.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn from_specs(specs: Vec<FieldConfigSpec>) -> Result<Vec<FieldConfig>, ConfigError> {
        let mut configs: Vec<FieldConfig> = Vec::with_capacity(specs.len());
        for spec in specs {
            let config = FieldConfig::try_from(spec)?;
            if configs.iter().any(|c| c.field() == config.field()) {
                return Err(ConfigError::DuplicateField {
                    field: config.field,
                });
            }
            configs.push(config);
        }
        Ok(configs)
    }

    /// The wrapped configurations.
    pub fn configs(&self) -> &'a [FieldConfig] {
        self.configs
    }

    /// Finds a configuration by field name.
    pub fn by_field(&self, field: &str) -> Option<&'a FieldConfig> {
        self.configs.iter().find(|c| c.field() == field)
    }

    /// Finds a configuration by its custom parameter key.
    pub fn by_param(&self, key: &str) -> Option<&'a FieldConfig> {
        self.configs.iter().find(|c| c.custom_param() == Some(key))
    }

    /// Returns the index of a field in configuration order.
    pub fn position(&self, field: &str) -> Option<usize> {
        self.configs.iter().position(|c| c.field() == field)
    }

    /// Suggests the closest configured field name for a misspelt one.
    pub fn suggest(&self, name: &str) -> Option<&'a str> {
        const THRESHOLD: f64 = 0.8;

        self.configs
            .iter()
            .map(|c| (c.field(), strsim::jaro_winkler(name, c.field())))
            .filter(|(_, score)| *score >= THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(field, _)| field)
    }
}
