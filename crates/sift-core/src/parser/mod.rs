//! Parser from query-string parameters to active filters.
//!
//! Parsing is lenient: malformed or unrecognized input is never an error.
//! Unknown keys pass through into [`ParseOutcome::remaining`], unknown
//! operator prefixes fall back to the field's default operator, and group
//! conditions the parser does not consume are written back under the
//! grouping key.
//!
//! # Wire format
//!
//! ```text
//! field=op.value                        single-value operator
//! field=in.(a,b) | field=not_in.(a,b)   membership list
//! field=cs.{a,b} | cd.{a,b} | ov.{a,b}  array containment and overlap
//! and=(field.gte.a,field.lte.b)         range bounds, grouped
//! and=(field.gte."a,b")                 bound with reserved characters, quoted
//! key=value                             custom parameter, no prefix
//! ```

mod decode;
mod lexer;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

pub use decode::{decode_value, split_condition, split_operator, GroupCondition};
pub use lexer::{
    format_list, parse_list, quote_item, split_top_level, strip_delimiters, unquote_item,
};

use crate::models::{FieldConfig, FieldConfigSet, Filter, FilterValue};
use crate::operator::Operator;
use crate::params::{Params, RESERVED_GROUP_KEY};
use decode::non_empty;

/// Result of [`parse`].
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome<'a> {
    /// Recognized filters, in configuration order, at most one per field.
    pub filters: Vec<Filter<'a>>,
    /// Parameters that did not belong to any configured field.
    pub remaining: Params,
}

/// Lower and upper bound collected for one range field.
#[derive(Debug, Default)]
struct Bounds {
    lower: Option<String>,
    upper: Option<String>,
}

impl Bounds {
    fn set(&mut self, operator: Operator, raw: &str) -> bool {
        match operator {
            Operator::Gte => self.lower = non_empty(&unquote_item(raw)),
            Operator::Lte => self.upper = non_empty(&unquote_item(raw)),
            Operator::GteLte => {
                if let (_, FilterValue::Range(lower, upper)) = decode_value(operator, raw) {
                    self.lower = lower;
                    self.upper = upper;
                }
            }
            _ => return false,
        }
        true
    }

    fn into_value(self) -> Option<FilterValue> {
        if self.lower.is_none() && self.upper.is_none() {
            None
        } else {
            Some(FilterValue::Range(self.lower, self.upper))
        }
    }
}

/// Parses `params` against `configs`.
///
/// Every filter in the outcome borrows its configuration from `configs`.
pub fn parse<'a>(params: &Params, configs: &'a [FieldConfig]) -> ParseOutcome<'a> {
    let set = FieldConfigSet::new(configs);
    let mut slots: BTreeMap<usize, Filter<'a>> = BTreeMap::new();
    let mut ranges: BTreeMap<usize, Bounds> = BTreeMap::new();
    let mut remaining = Params::new();

    for (key, values) in params.iter() {
        if key == RESERVED_GROUP_KEY {
            for value in values {
                let residual = parse_group(&set, value, &mut ranges);
                if !residual.is_empty() {
                    remaining.append(RESERVED_GROUP_KEY, format!("({})", residual.join(",")));
                }
            }
            continue;
        }

        let Some(config) = set.by_param(key).or_else(|| set.by_field(key)) else {
            tracing::trace!(key, "passing through unrecognized parameter");
            for value in values {
                remaining.append(key, value.as_str());
            }
            continue;
        };
        let Some(index) = set.position(config.field()) else {
            continue;
        };

        if config.field_type().is_range() {
            let bounds = ranges.entry(index).or_default();
            for value in values {
                let (operator, raw) = split_or_default(config, value);
                if !bounds.set(operator, raw) {
                    tracing::debug!(
                        field = config.field(),
                        operator = %operator,
                        "ignoring non-range operator on range field"
                    );
                }
            }
            continue;
        }

        if values.len() > 1 {
            tracing::trace!(key, count = values.len(), "repeated parameter, keeping last");
        }
        if let Some(value) = values.last() {
            let (operator, raw) = split_or_default(config, value);
            let (operator, value) = decode_value(operator, raw);
            slots.insert(index, Filter::with(config, operator, value));
        }
    }

    for (index, bounds) in ranges {
        match bounds.into_value() {
            Some(value) => {
                slots.insert(index, Filter::with(&configs[index], Operator::GteLte, value));
            }
            None => {
                tracing::debug!(field = configs[index].field(), "dropping range with no bounds");
            }
        }
    }

    for (index, config) in configs.iter().enumerate() {
        if config.always_on() && !slots.contains_key(&index) {
            slots.insert(index, Filter::new(config));
        }
    }

    ParseOutcome {
        filters: slots.into_values().collect(),
        remaining,
    }
}

/// Splits `op.value`, falling back to the default operator with the whole
/// string when the prefix is not a recognized operator.
fn split_or_default<'s>(config: &FieldConfig, raw: &'s str) -> (Operator, &'s str) {
    match split_operator(raw) {
        Some(split) => split,
        None => {
            if raw.contains('.') {
                tracing::debug!(
                    field = config.field(),
                    value = raw,
                    "unrecognized operator prefix, using default operator"
                );
            }
            (config.default_operator(), raw)
        }
    }
}

/// Consumes range bounds from one grouping value and returns the residual
/// conditions in their original order.
fn parse_group<'v>(
    set: &FieldConfigSet<'_>,
    value: &'v str,
    ranges: &mut BTreeMap<usize, Bounds>,
) -> Vec<&'v str> {
    let value = value.trim();
    let body = strip_delimiters(value, '(', ')').unwrap_or(value);
    let mut residual = Vec::new();

    for part in split_top_level(body, ',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let consumed = split_condition(part).is_some_and(|cond| {
            let Some(config) = set.by_field(cond.field) else {
                return false;
            };
            if !config.field_type().is_range() {
                return false;
            }
            match set.position(cond.field) {
                Some(index) => ranges.entry(index).or_default().set(cond.operator, cond.value),
                None => false,
            }
        });
        if !consumed {
            residual.push(part);
        }
    }
    residual
}
