//! Filter values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The value held by a [`Filter`](super::Filter).
///
/// The shape follows the operator's arity: scalars for single-value
/// operators, [`FilterValue::List`] for multi-value operators and
/// [`FilterValue::Range`] for `gte_lte`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// No value.
    #[default]
    Null,
    /// Boolean, used by `is` and `is_null`.
    Bool(bool),
    /// Number, only produced by configuration defaults.
    Number(f64),
    /// Text, the shape every parsed scalar has.
    Text(String),
    /// Ordered list of items.
    List(Vec<String>),
    /// Lower and upper bound, either side optional.
    Range(Option<String>, Option<String>),
}

impl FilterValue {
    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    /// Creates a list value.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Creates a range value.
    pub fn range(lower: Option<&str>, upper: Option<&str>) -> Self {
        FilterValue::Range(lower.map(str::to_string), upper.map(str::to_string))
    }

    /// Returns true for values that carry nothing to filter on: null, the
    /// empty string, the empty list and the `(nil, nil)` range.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Null => true,
            FilterValue::Text(s) => s.is_empty(),
            FilterValue::List(items) => items.is_empty(),
            FilterValue::Range(None, None) => true,
            FilterValue::Range(..) | FilterValue::Bool(_) | FilterValue::Number(_) => false,
        }
    }

    /// Returns the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list items, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FilterValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Null => f.write_str("null"),
            FilterValue::Bool(b) => write!(f, "{b}"),
            FilterValue::Number(n) if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FilterValue::Number(n) => write!(f, "{n}"),
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::List(items) => f.write_str(&items.join(",")),
            FilterValue::Range(lower, upper) => write!(
                f,
                "{}..{}",
                lower.as_deref().unwrap_or(""),
                upper.as_deref().unwrap_or("")
            ),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(value: Vec<String>) -> Self {
        FilterValue::List(value)
    }
}
