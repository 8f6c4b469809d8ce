//! Serializer from active filters to query-string parameters.
//!
//! This is the inverse of [`parse`](crate::parser::parse): for every filter
//! the parser can produce, parsing the serialized form yields a filter with
//! the same field, operator and value.

use crate::models::{Filter, FilterValue};
use crate::operator::Operator;
use crate::params::{Params, RESERVED_GROUP_KEY};
use crate::parser::{format_list, quote_item, split_top_level, strip_delimiters};

/// Serializes `filters` into a fresh parameter set.
pub fn serialize(filters: &[Filter<'_>]) -> Params {
    serialize_into(&Params::new(), filters)
}

/// Serializes `filters` on top of `base`.
///
/// Filter keys replace existing values. Range conditions are appended to
/// any grouping parameter already in `base`, inside one parenthesis.
pub fn serialize_into(base: &Params, filters: &[Filter<'_>]) -> Params {
    let mut params = base.clone();
    let mut group: Vec<String> = Vec::new();

    for filter in filters {
        if is_blank(&filter.value) {
            tracing::trace!(field = %filter.field, "skipping blank filter");
            continue;
        }

        if let FilterValue::Range(lower, upper) = &filter.value {
            if let Some(lower) = lower {
                group.push(format!(
                    "{}.{}.{}",
                    filter.field,
                    Operator::Gte,
                    quote_item(lower)
                ));
            }
            if let Some(upper) = upper {
                group.push(format!(
                    "{}.{}.{}",
                    filter.field,
                    Operator::Lte,
                    quote_item(upper)
                ));
            }
            continue;
        }

        let config = filter.config();
        let encoded = if config.custom_param().is_some() {
            render_raw(filter.operator, &filter.value)
        } else {
            render(filter.operator, &filter.value)
        };
        params.insert(config.param_key(), encoded);
    }

    if !group.is_empty() {
        let mut conditions: Vec<String> = params
            .get_all(RESERVED_GROUP_KEY)
            .unwrap_or_default()
            .iter()
            .flat_map(|existing| {
                let existing = existing.trim();
                let body = strip_delimiters(existing, '(', ')').unwrap_or(existing);
                split_top_level(body, ',')
                    .into_iter()
                    .filter(|c| !c.trim().is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        conditions.extend(group);
        params.insert(RESERVED_GROUP_KEY, format!("({})", conditions.join(",")));
    }

    params
}

/// Values that never produce a parameter.
fn is_blank(value: &FilterValue) -> bool {
    match value {
        FilterValue::Null => true,
        FilterValue::Text(text) => text.is_empty(),
        FilterValue::Range(lower, upper) => lower.is_none() && upper.is_none(),
        FilterValue::Bool(_) | FilterValue::Number(_) | FilterValue::List(_) => false,
    }
}

/// Renders `op.value`.
fn render(operator: Operator, value: &FilterValue) -> String {
    match (operator, value) {
        (Operator::Ilike, FilterValue::Text(text)) => format!("{operator}.{}", wildcard(text)),
        (Operator::IsNull, FilterValue::Bool(_)) => {
            format!("{}.{}", Operator::Is, render_raw(operator, value))
        }
        _ => format!("{operator}.{}", render_raw(operator, value)),
    }
}

/// Renders the value alone, as used by custom parameters.
fn render_raw(operator: Operator, value: &FilterValue) -> String {
    match value {
        FilterValue::List(items) if operator.is_array() => format_list(items, '{', '}'),
        FilterValue::List(items) => format_list(items, '(', ')'),
        FilterValue::Bool(true) if operator == Operator::IsNull => "null".to_string(),
        FilterValue::Bool(false) if operator == Operator::IsNull => "not_null".to_string(),
        other => other.to_string(),
    }
}

/// Wraps text in `*` markers, leaving existing markers alone.
fn wildcard(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    if !text.starts_with('*') {
        out.push('*');
    }
    out.push_str(text);
    if !text.ends_with('*') {
        out.push('*');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldConfig, FieldType, OptionsSource};

    fn text(field: &str) -> FieldConfig {
        FieldConfig::builder(field, FieldType::Text).build().unwrap()
    }

    fn tags() -> FieldConfig {
        FieldConfig::builder("tags", FieldType::MultiSelect)
            .options(OptionsSource::from_values(["a", "b"]))
            .build()
            .unwrap()
    }

    fn created() -> FieldConfig {
        FieldConfig::builder("created", FieldType::DateRange)
            .build()
            .unwrap()
    }

    // ==================== Single Filter Tests ====================

    #[test]
    fn test_serialize_default_form() {
        let config = text("name");
        let params = serialize(&[Filter::with(&config, Operator::Eq, "bob")]);
        assert_eq!(params.get("name"), Some("eq.bob"));
    }

    #[test]
    fn test_serialize_ilike_is_idempotent() {
        let config = text("name");
        for value in ["foo", "*foo*", "*foo", "foo*"] {
            let params = serialize(&[Filter::with(&config, Operator::Ilike, value)]);
            assert_eq!(params.get("name"), Some("ilike.*foo*"), "value {value}");
        }
    }

    #[test]
    fn test_serialize_lists() {
        let config = tags();
        let params = serialize(&[Filter::with(
            &config,
            Operator::In,
            FilterValue::list(["a", "b"]),
        )]);
        assert_eq!(params.get("tags"), Some("in.(a,b)"));

        let params = serialize(&[Filter::with(
            &config,
            Operator::Cs,
            FilterValue::list(["a", "b"]),
        )]);
        assert_eq!(params.get("tags"), Some("cs.{a,b}"));
    }

    #[test]
    fn test_serialize_quotes_reserved_items() {
        let config = tags();
        let params = serialize(&[Filter::with(
            &config,
            Operator::In,
            FilterValue::list(["a,b", "c"]),
        )]);
        assert_eq!(params.get("tags"), Some(r#"in.("a,b",c)"#));
    }

    #[test]
    fn test_serialize_booleans_and_null() {
        let config = FieldConfig::builder("archived", FieldType::Boolean)
            .operators([Operator::Is, Operator::IsNull])
            .build()
            .unwrap();
        let params = serialize(&[Filter::with(&config, Operator::Is, true)]);
        assert_eq!(params.get("archived"), Some("is.true"));

        let params = serialize(&[Filter::with(&config, Operator::IsNull, true)]);
        assert_eq!(params.get("archived"), Some("is.null"));

        let params = serialize(&[Filter::with(&config, Operator::IsNull, false)]);
        assert_eq!(params.get("archived"), Some("is.not_null"));
    }

    #[test]
    fn test_serialize_custom_param() {
        let config = FieldConfig::builder("search", FieldType::Text)
            .custom_param("q")
            .build()
            .unwrap();
        let params = serialize(&[Filter::with(&config, Operator::Ilike, "hello")]);
        assert_eq!(params.get("q"), Some("hello"));
        assert!(!params.contains_key("search"));
    }

    // ==================== Empty Value Tests ====================

    #[test]
    fn test_serialize_drops_empty_values() {
        let name = text("name");
        let range = created();
        let params = serialize(&[
            Filter::with(&name, Operator::Eq, FilterValue::Null),
            Filter::with(&name, Operator::Eq, ""),
            Filter::with(&range, Operator::GteLte, FilterValue::Range(None, None)),
        ]);
        assert!(params.is_empty());
    }

    // ==================== Grouping Tests ====================

    #[test]
    fn test_serialize_range_group() {
        let range = created();
        let params = serialize(&[Filter::with(
            &range,
            Operator::GteLte,
            FilterValue::range(Some("2024-01-01"), Some("2024-02-01")),
        )]);
        assert_eq!(
            params.get("and"),
            Some("(created.gte.2024-01-01,created.lte.2024-02-01)")
        );
    }

    #[test]
    fn test_serialize_ranges_share_one_group() {
        let created = created();
        let updated = FieldConfig::builder("updated", FieldType::DatetimeRange)
            .build()
            .unwrap();
        let params = serialize(&[
            Filter::with(
                &created,
                Operator::GteLte,
                FilterValue::range(None, Some("2024-02-01")),
            ),
            Filter::with(
                &updated,
                Operator::GteLte,
                FilterValue::range(Some("2024-03-01T00:00:00Z"), None),
            ),
        ]);
        assert_eq!(params.get_all("and").map(<[String]>::len), Some(1));
        assert_eq!(
            params.get("and"),
            Some("(created.lte.2024-02-01,updated.gte.2024-03-01T00:00:00Z)")
        );
    }

    #[test]
    fn test_serialize_into_merges_group() {
        let range = created();
        let base: Params = [("and", "(status.in.(a,b))"), ("page", "2")]
            .into_iter()
            .collect();
        let params = serialize_into(
            &base,
            &[Filter::with(
                &range,
                Operator::GteLte,
                FilterValue::range(Some("2024-01-01"), None),
            )],
        );
        assert_eq!(
            params.get("and"),
            Some("(status.in.(a,b),created.gte.2024-01-01)")
        );
        assert_eq!(params.get("page"), Some("2"));
    }
}
