//! Tests for the parameter parser.

use super::*;
use crate::models::{FieldType, OptionsSource};

fn configs() -> Vec<FieldConfig> {
    vec![
        FieldConfig::builder("name", FieldType::Text).build().unwrap(),
        FieldConfig::builder("total", FieldType::Number).build().unwrap(),
        FieldConfig::builder("status", FieldType::Select)
            .options(OptionsSource::from_values(["open", "closed"]))
            .build()
            .unwrap(),
        FieldConfig::builder("tags", FieldType::MultiSelect)
            .options(OptionsSource::from_values(["urgent", "bug", "ui"]))
            .build()
            .unwrap(),
        FieldConfig::builder("created", FieldType::DateRange)
            .build()
            .unwrap(),
        FieldConfig::builder("archived", FieldType::Boolean)
            .operators([Operator::Is, Operator::IsNull])
            .build()
            .unwrap(),
        FieldConfig::builder("search", FieldType::Text)
            .custom_param("q")
            .build()
            .unwrap(),
    ]
}

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs.iter().copied().collect()
}

fn summary(outcome: &ParseOutcome<'_>) -> Vec<(String, Operator, FilterValue)> {
    outcome
        .filters
        .iter()
        .map(|f| (f.field.clone(), f.operator, f.value.clone()))
        .collect()
}

// ==================== Basic Tests ====================

#[test]
fn test_parse_empty_input() {
    let configs = configs();
    let outcome = parse(&Params::new(), &configs);
    assert!(outcome.filters.is_empty());
    assert!(outcome.remaining.is_empty());
}

#[test]
fn test_parse_simple_operator() {
    let configs = configs();
    let outcome = parse(&params(&[("status", "eq.open")]), &configs);
    assert_eq!(
        summary(&outcome),
        vec![("status".to_string(), Operator::Eq, FilterValue::text("open"))]
    );
    assert!(std::ptr::eq(outcome.filters[0].config(), &configs[2]));
}

#[test]
fn test_parse_value_with_dots() {
    let configs = configs();
    let outcome = parse(&params(&[("total", "gte.1.5")]), &configs);
    assert_eq!(outcome.filters[0].operator, Operator::Gte);
    assert_eq!(outcome.filters[0].value, FilterValue::text("1.5"));
}

#[test]
fn test_parse_orders_by_configuration() {
    let configs = configs();
    let outcome = parse(
        &params(&[("status", "eq.open"), ("name", "ilike.*bob*"), ("total", "gt.3")]),
        &configs,
    );
    let fields: Vec<&str> = outcome.filters.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "total", "status"]);
}

#[test]
fn test_parse_unknown_keys_pass_through() {
    let configs = configs();
    let outcome = parse(
        &params(&[("page", "2"), ("status", "eq.open"), ("sort", "name")]),
        &configs,
    );
    assert_eq!(outcome.filters.len(), 1);
    assert_eq!(outcome.remaining, params(&[("page", "2"), ("sort", "name")]));
}

#[test]
fn test_parse_repeated_key_last_wins() {
    let configs = configs();
    let outcome = parse(
        &params(&[("status", "eq.open"), ("status", "eq.closed")]),
        &configs,
    );
    assert_eq!(outcome.filters.len(), 1);
    assert_eq!(outcome.filters[0].value, FilterValue::text("closed"));
}

// ==================== Fallback Tests ====================

#[test]
fn test_parse_unknown_operator_falls_back_to_default() {
    let configs = configs();
    let outcome = parse(&params(&[("status", "between.1")]), &configs);
    assert_eq!(
        summary(&outcome),
        vec![("status".to_string(), Operator::Eq, FilterValue::text("between.1"))]
    );
}

#[test]
fn test_parse_bare_value_uses_default_operator() {
    let configs = configs();
    let outcome = parse(&params(&[("name", "bob")]), &configs);
    assert_eq!(outcome.filters[0].operator, Operator::Ilike);
    assert_eq!(outcome.filters[0].value, FilterValue::text("bob"));
}

#[test]
fn test_parse_custom_param() {
    let configs = configs();
    let outcome = parse(&params(&[("q", "hello world")]), &configs);
    assert_eq!(
        summary(&outcome),
        vec![("search".to_string(), Operator::Ilike, FilterValue::text("hello world"))]
    );
    assert!(outcome.remaining.is_empty());
}

// ==================== Value Shape Tests ====================

#[test]
fn test_parse_strips_wildcards() {
    let configs = configs();
    let outcome = parse(&params(&[("name", "ilike.*foo*")]), &configs);
    assert_eq!(outcome.filters[0].value, FilterValue::text("foo"));
}

#[test]
fn test_parse_membership_list() {
    let configs = configs();
    let outcome = parse(&params(&[("tags", "in.(urgent,bug)")]), &configs);
    assert_eq!(outcome.filters[0].operator, Operator::In);
    assert_eq!(outcome.filters[0].value, FilterValue::list(["urgent", "bug"]));
}

#[test]
fn test_parse_array_containment() {
    let configs = configs();
    let outcome = parse(&params(&[("tags", "cs.{a,b,c}")]), &configs);
    assert_eq!(outcome.filters[0].operator, Operator::Cs);
    assert_eq!(outcome.filters[0].value, FilterValue::list(["a", "b", "c"]));

    let outcome = parse(&params(&[("tags", "ov.single")]), &configs);
    assert_eq!(outcome.filters[0].value, FilterValue::list(["single"]));
}

#[test]
fn test_parse_boolean_and_null() {
    let configs = configs();
    let outcome = parse(&params(&[("archived", "is.true")]), &configs);
    assert_eq!(outcome.filters[0].operator, Operator::Is);
    assert_eq!(outcome.filters[0].value, FilterValue::Bool(true));

    let outcome = parse(&params(&[("archived", "is.not_null")]), &configs);
    assert_eq!(outcome.filters[0].operator, Operator::IsNull);
    assert_eq!(outcome.filters[0].value, FilterValue::Bool(false));
}

// ==================== Grouping Tests ====================

#[test]
fn test_parse_group_merges_range() {
    let configs = configs();
    let outcome = parse(
        &params(&[("and", "(created.gte.2024-01-01,created.lte.2024-02-01)")]),
        &configs,
    );
    assert_eq!(
        summary(&outcome),
        vec![(
            "created".to_string(),
            Operator::GteLte,
            FilterValue::range(Some("2024-01-01"), Some("2024-02-01")),
        )]
    );
    assert!(outcome.remaining.is_empty());
}

#[test]
fn test_parse_group_single_bound() {
    let configs = configs();
    let outcome = parse(&params(&[("and", "(created.lte.2024-02-01)")]), &configs);
    assert_eq!(
        outcome.filters[0].value,
        FilterValue::range(None, Some("2024-02-01"))
    );
}

#[test]
fn test_parse_group_keeps_residual() {
    let configs = configs();
    let outcome = parse(
        &params(&[(
            "and",
            "(status.in.(a,b,c),created.gte.2024-01-01,total.gte.5)",
        )]),
        &configs,
    );
    assert_eq!(outcome.filters.len(), 1);
    assert_eq!(outcome.filters[0].field, "created");
    assert_eq!(
        outcome.remaining.get("and"),
        Some("(status.in.(a,b,c),total.gte.5)")
    );
}

#[test]
fn test_parse_group_empty_bounds_dropped() {
    let configs = configs();
    let outcome = parse(&params(&[("and", "(created.gte.,created.lte.)")]), &configs);
    assert!(outcome.filters.is_empty());
    assert!(outcome.remaining.is_empty());
}

#[test]
fn test_parse_range_from_repeated_params() {
    let configs = configs();
    let outcome = parse(
        &params(&[("created", "gte.2024-01-01"), ("created", "lte.2024-02-01")]),
        &configs,
    );
    assert_eq!(
        outcome.filters[0].value,
        FilterValue::range(Some("2024-01-01"), Some("2024-02-01"))
    );
}

#[test]
fn test_parse_range_ignores_other_operators() {
    let configs = configs();
    let outcome = parse(&params(&[("created", "eq.2024-01-01")]), &configs);
    assert!(outcome.filters.is_empty());
}

// ==================== Always-On Tests ====================

#[test]
fn test_parse_synthesizes_always_on() {
    let configs = vec![
        FieldConfig::builder("name", FieldType::Text).build().unwrap(),
        FieldConfig::builder("priority", FieldType::Select)
            .options(OptionsSource::from_values(["low", "normal", "high"]))
            .default_value("normal")
            .always_on(true)
            .build()
            .unwrap(),
    ];

    let outcome = parse(&Params::new(), &configs);
    assert_eq!(
        summary(&outcome),
        vec![("priority".to_string(), Operator::Eq, FilterValue::text("normal"))]
    );

    let outcome = parse(&params(&[("priority", "eq.high")]), &configs);
    assert_eq!(outcome.filters.len(), 1);
    assert_eq!(outcome.filters[0].value, FilterValue::text("high"));
}
