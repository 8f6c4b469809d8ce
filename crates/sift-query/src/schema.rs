//! Type casting of condition values.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sift_core::models::{FieldConfig, FieldType};
use sift_core::Operator;

use crate::condition::{Condition, Value};
use crate::error::CastError;

/// Converts condition values to the types the backend expects.
///
/// A failed cast is a hard error; the query builder does not retry or drop
/// the offending condition.
pub trait Schema {
    /// Casts every condition, returning the converted list.
    ///
    /// # Errors
    ///
    /// Returns a [`CastError`] for the first value that cannot be converted.
    fn cast(&self, conditions: Vec<Condition>) -> Result<Vec<Condition>, CastError>;
}

impl<F> Schema for F
where
    F: Fn(Vec<Condition>) -> Result<Vec<Condition>, CastError>,
{
    fn cast(&self, conditions: Vec<Condition>) -> Result<Vec<Condition>, CastError> {
        self(conditions)
    }
}

/// Target type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastType {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
}

impl CastType {
    /// The natural target type of a field type.
    pub fn for_field_type(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Number => CastType::Float,
            FieldType::Date | FieldType::DateRange => CastType::Date,
            FieldType::Datetime | FieldType::DatetimeRange => CastType::DateTime,
            FieldType::Boolean => CastType::Boolean,
            FieldType::Text
            | FieldType::Select
            | FieldType::MultiSelect
            | FieldType::RadioGroup => CastType::Text,
        }
    }

    /// Converts one value. Lists are converted item by item; null passes
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`CastError`] naming `field` if the value does not parse.
    pub fn cast(self, field: &str, value: Value) -> Result<Value, CastError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::List(items) => items
                .into_iter()
                .map(|item| self.cast(field, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            scalar => self.cast_scalar(field, scalar),
        }
    }

    fn cast_scalar(self, field: &str, value: Value) -> Result<Value, CastError> {
        let fail = |value: &Value| CastError::invalid(field, value.to_string(), self);

        match (self, value) {
            (CastType::Text, Value::Text(s)) => Ok(Value::Text(s)),
            (CastType::Text, other) => Ok(Value::Text(other.to_string())),

            (CastType::Integer, Value::Integer(n)) => Ok(Value::Integer(n)),
            (CastType::Integer, Value::Float(f)) if f.fract() == 0.0 => {
                Ok(Value::Integer(f as i64))
            }
            (CastType::Integer, Value::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| fail(&Value::Text(s))),

            (CastType::Float, Value::Float(f)) => Ok(Value::Float(f)),
            (CastType::Float, Value::Integer(n)) => Ok(Value::Float(n as f64)),
            (CastType::Float, Value::Text(s)) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f)),
                _ => Err(fail(&Value::Text(s))),
            },

            (CastType::Boolean, Value::Bool(b)) => Ok(Value::Bool(b)),
            (CastType::Boolean, Value::Text(s)) => parse_bool(&s)
                .map(Value::Bool)
                .ok_or_else(|| fail(&Value::Text(s))),

            (CastType::Date, Value::Date(d)) => Ok(Value::Date(d)),
            (CastType::Date, Value::DateTime(dt)) => Ok(Value::Date(dt.date_naive())),
            (CastType::Date, Value::Text(s)) => parse_date(&s)
                .map(Value::Date)
                .ok_or_else(|| fail(&Value::Text(s))),

            (CastType::DateTime, Value::DateTime(dt)) => Ok(Value::DateTime(dt)),
            (CastType::DateTime, Value::Date(d)) => Ok(Value::DateTime(midnight(d))),
            (CastType::DateTime, Value::Text(s)) => parse_datetime(&s)
                .map(Value::DateTime)
                .ok_or_else(|| fail(&Value::Text(s))),

            (_, other) => Err(fail(&other)),
        }
    }
}

impl fmt::Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CastType::Text => "text",
            CastType::Integer => "integer",
            CastType::Float => "float",
            CastType::Boolean => "boolean",
            CastType::Date => "date",
            CastType::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// Parses a boolean from common spellings.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "1" => Some(true),
        "false" | "f" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Parses an ISO 8601 calendar date, accepting a datetime and truncating it.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date_naive()))
}

/// Parses an RFC 3339 datetime. A naive datetime or a plain date is taken
/// as UTC.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(midnight)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Operators whose operand is not a value of the field's type.
fn skips_cast(operator: Operator) -> bool {
    matches!(
        operator,
        Operator::Like
            | Operator::Ilike
            | Operator::IsNull
            | Operator::Fts
            | Operator::Plfts
            | Operator::Phfts
    )
}

/// Schema mapping backend field names to cast types.
///
/// Fields without a mapping are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTypes {
    types: HashMap<String, CastType>,
}

impl FieldTypes {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping.
    pub fn with(mut self, field: impl Into<String>, cast: CastType) -> Self {
        self.types.insert(field.into(), cast);
        self
    }

    /// Derives mappings from field configurations, keyed by query field.
    pub fn from_configs(configs: &[FieldConfig]) -> Self {
        let types = configs
            .iter()
            .map(|c| {
                (
                    c.query_field().to_string(),
                    CastType::for_field_type(c.field_type()),
                )
            })
            .collect();
        Self { types }
    }

    /// The cast type of a field, if mapped.
    pub fn get(&self, field: &str) -> Option<CastType> {
        self.types.get(field).copied()
    }
}

impl Schema for FieldTypes {
    fn cast(&self, conditions: Vec<Condition>) -> Result<Vec<Condition>, CastError> {
        conditions
            .into_iter()
            .map(|mut cond| {
                if skips_cast(cond.operator) {
                    return Ok(cond);
                }
                if let Some(target) = self.get(&cond.field) {
                    let value = std::mem::replace(&mut cond.value, Value::Null);
                    cond.value = target.cast(&cond.field, value)?;
                }
                Ok(cond)
            })
            .collect()
    }
}
