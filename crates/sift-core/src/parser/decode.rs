//! Decoding of `operator.value` strings into typed filter values.

use super::lexer::{parse_list, strip_delimiters};
use crate::models::FilterValue;
use crate::operator::Operator;

/// One `field.operator.value` condition from a grouping parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCondition<'s> {
    /// Field name.
    pub field: &'s str,
    /// Recognized operator.
    pub operator: Operator,
    /// Raw value after the operator.
    pub value: &'s str,
}

/// Splits `operator.value` on the first `.`, returning `None` when the
/// prefix is not a known operator.
pub fn split_operator(raw: &str) -> Option<(Operator, &str)> {
    let (prefix, rest) = raw.split_once('.')?;
    Operator::from_symbol(prefix).map(|op| (op, rest))
}

/// Splits a grouped `field.operator.value` condition.
pub fn split_condition(raw: &str) -> Option<GroupCondition<'_>> {
    let (field, rest) = raw.trim().split_once('.')?;
    let (operator, value) = split_operator(rest)?;
    if field.is_empty() {
        return None;
    }
    Some(GroupCondition {
        field,
        operator,
        value,
    })
}

/// Shapes a raw value according to its operator.
///
/// The operator can change: `is.null` and `is.not_null` decode to
/// [`Operator::IsNull`] with a boolean value.
pub fn decode_value(operator: Operator, raw: &str) -> (Operator, FilterValue) {
    match operator {
        Operator::Like | Operator::Ilike => (
            operator,
            FilterValue::Text(raw.trim_start_matches('*').trim_end_matches('*').to_string()),
        ),
        Operator::In | Operator::NotIn => {
            let body = strip_delimiters(raw, '(', ')').unwrap_or(raw);
            (operator, FilterValue::List(parse_list(body)))
        }
        Operator::Cs | Operator::Cd | Operator::Ov => {
            let items = match strip_delimiters(raw, '{', '}') {
                Some(body) => parse_list(body),
                None if raw.is_empty() => Vec::new(),
                None => vec![raw.to_string()],
            };
            (operator, FilterValue::List(items))
        }
        Operator::Is => match raw {
            "true" => (operator, FilterValue::Bool(true)),
            "false" => (operator, FilterValue::Bool(false)),
            "null" => (Operator::IsNull, FilterValue::Bool(true)),
            "not_null" => (Operator::IsNull, FilterValue::Bool(false)),
            other => (operator, FilterValue::text(other)),
        },
        Operator::IsNull => match raw {
            "true" | "null" => (operator, FilterValue::Bool(true)),
            "false" | "not_null" => (operator, FilterValue::Bool(false)),
            other => (operator, FilterValue::text(other)),
        },
        Operator::GteLte => {
            let (lower, upper) = raw.split_once(',').unwrap_or((raw, ""));
            (operator, FilterValue::Range(non_empty(lower), non_empty(upper)))
        }
        Operator::Eq
        | Operator::Neq
        | Operator::Gt
        | Operator::Gte
        | Operator::Lt
        | Operator::Lte
        | Operator::Fts
        | Operator::Plfts
        | Operator::Phfts => (operator, FilterValue::text(raw)),
    }
}

/// Maps an empty bound to `None`.
pub(crate) fn non_empty(bound: &str) -> Option<String> {
    if bound.is_empty() {
        None
    } else {
        Some(bound.to_string())
    }
}
