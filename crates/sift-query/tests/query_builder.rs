//! Integration tests for the query builder.
//!
//! Run with: cargo test --package sift-query-rs --test query_builder

use serde_json::{json, Value as Json};
use sift_core::prelude::*;
use sift_query::{
    Adapter, ApplyOptions, CastError, CastType, Condition, FieldTypes, MemoryAdapter, QueryBuilder,
    QueryError, RecordQuery, Value,
};

// ============================================================================
// Fixtures
// ============================================================================

fn fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::builder("name", FieldType::Text).build().unwrap(),
        FieldConfig::builder("age", FieldType::Number).build().unwrap(),
        FieldConfig::builder("tags", FieldType::MultiSelect)
            .options(OptionsSource::from_values(["math", "music"]))
            .build()
            .unwrap(),
        FieldConfig::builder("created", FieldType::DateRange)
            .query_field("created_at")
            .build()
            .unwrap(),
        FieldConfig::builder("secret", FieldType::Text).build().unwrap(),
    ]
}

fn records() -> Vec<Json> {
    vec![
        json!({"id": 1, "name": "Ada", "age": 36, "tags": ["math"], "created_at": "2024-01-15", "secret": "x"}),
        json!({"id": 2, "name": "Bob", "age": 17, "tags": ["music"], "created_at": "2024-03-02", "secret": "y"}),
        json!({"id": 3, "name": "Adele", "age": 52, "tags": [], "created_at": "2023-12-31", "secret": "x"}),
    ]
}

fn ids(query: &RecordQuery<'_>) -> Vec<i64> {
    query
        .rows()
        .iter()
        .filter_map(|r| r["id"].as_i64())
        .collect()
}

/// Adapter that records applied conditions and supports only `eq`.
struct EqOnly;

impl Adapter for EqOnly {
    type Query = Vec<String>;

    fn name(&self) -> &'static str {
        "eq-only"
    }

    fn supported_operators(&self) -> &[Operator] {
        &[Operator::Eq]
    }

    fn apply_condition(
        &self,
        mut query: Vec<String>,
        field: &str,
        operator: Operator,
        value: &Value,
    ) -> Vec<String> {
        query.push(format!("{field} {operator} {value}"));
        query
    }

    fn paginate(&self, query: Vec<String>, _: Option<usize>, _: Option<usize>) -> Vec<String> {
        query
    }

    fn count(&self, query: &Vec<String>) -> usize {
        query.len()
    }
}

// ============================================================================
// Expansion
// ============================================================================

#[test]
fn test_range_expands_to_two_conditions() {
    let fields = fields();
    let filter = Filter::with(
        &fields[3],
        Operator::GteLte,
        FilterValue::range(Some("2024-01-01"), Some("2024-02-01")),
    );
    let builder = QueryBuilder::new(MemoryAdapter::new());
    let conditions = builder.conditions(&[filter], &ApplyOptions::new()).unwrap();
    assert_eq!(
        conditions,
        vec![
            Condition::new("created_at", Operator::Gte, "2024-01-01"),
            Condition::new("created_at", Operator::Lte, "2024-02-01"),
        ]
    );
}

#[test]
fn test_single_bound_range() {
    let fields = fields();
    let filter = Filter::with(
        &fields[3],
        Operator::GteLte,
        FilterValue::range(None, Some("2024-01-31")),
    );
    let builder = QueryBuilder::new(MemoryAdapter::new());
    let conditions = builder.conditions(&[filter], &ApplyOptions::new()).unwrap();
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].operator, Operator::Lte);
}

#[test]
fn test_pattern_values_wrapped_once() {
    let fields = fields();
    let builder = QueryBuilder::new(MemoryAdapter::new());
    for value in ["ada", "*ada*"] {
        let filter = Filter::with(&fields[0], Operator::Ilike, value);
        let conditions = builder.conditions(&[filter], &ApplyOptions::new()).unwrap();
        assert_eq!(conditions[0].value, Value::Text("%ada%".to_string()));
    }
}

#[test]
fn test_empty_filters_dropped() {
    let fields = fields();
    let builder = QueryBuilder::new(MemoryAdapter::new());
    let filters = vec![
        Filter::new(&fields[0]),
        Filter::with(&fields[2], Operator::In, FilterValue::List(vec![])),
        Filter::new(&fields[3]),
    ];
    let conditions = builder.conditions(&filters, &ApplyOptions::new()).unwrap();
    assert!(conditions.is_empty());
}

// ============================================================================
// Apply
// ============================================================================

#[test]
fn test_apply_filters() {
    let fields = fields();
    let records = records();
    let filters = vec![
        Filter::with(&fields[0], Operator::Ilike, "ad"),
        Filter::with(&fields[1], Operator::Gt, "40"),
    ];
    let builder = QueryBuilder::new(MemoryAdapter::new());
    let query = builder
        .apply(RecordQuery::new(&records), &filters, &ApplyOptions::new())
        .unwrap();
    assert_eq!(ids(&query), vec![3]);
}

#[test]
fn test_apply_params_requires_config() {
    let records = records();
    let params = Params::from_query_string("name=eq.Ada").unwrap();
    let builder = QueryBuilder::new(MemoryAdapter::new());
    let err = builder
        .apply(RecordQuery::new(&records), &params, &ApplyOptions::new())
        .unwrap_err();
    assert_eq!(err, QueryError::MissingConfig);
}

#[test]
fn test_apply_params_with_range_group() {
    let fields = fields();
    let records = records();
    let params = Params::from_query_string(
        "and=(created.gte.2024-01-01,created.lte.2024-02-01)&tags=ov.{math,music}",
    )
    .unwrap();
    let schema = FieldTypes::from_configs(&fields);
    let options = ApplyOptions::new().config(&fields).schema(&schema);
    let builder = QueryBuilder::new(MemoryAdapter::new());
    let query = builder
        .apply(RecordQuery::new(&records), &params, &options)
        .unwrap();
    assert_eq!(ids(&query), vec![1]);
}

#[test]
fn test_allowed_fields_drop_silently() {
    let fields = fields();
    let records = records();
    let params = Params::from_query_string("secret=eq.x&age=gt.30").unwrap();
    let allowed = vec!["age".to_string()];
    let options = ApplyOptions::new().config(&fields).allowed_fields(&allowed);
    let builder = QueryBuilder::new(MemoryAdapter::new());
    let query = builder
        .apply(RecordQuery::new(&records), &params, &options)
        .unwrap();
    assert_eq!(ids(&query), vec![1, 3]);
}

#[test]
fn test_cast_failure_is_an_error() {
    let fields = fields();
    let records = records();
    let filters = vec![Filter::with(&fields[1], Operator::Gt, "forty")];
    let schema = FieldTypes::from_configs(&fields);
    let options = ApplyOptions::new().schema(&schema);
    let builder = QueryBuilder::new(MemoryAdapter::new());
    let err = builder
        .apply(RecordQuery::new(&records), &filters, &options)
        .unwrap_err();
    assert_eq!(
        err,
        QueryError::Cast(CastError::invalid("age", "forty", CastType::Float))
    );
}

#[test]
fn test_unsupported_operator_is_an_error() {
    let fields = fields();
    let filters = vec![
        Filter::with(&fields[0], Operator::Eq, "Ada"),
        Filter::with(&fields[1], Operator::Gt, "3"),
    ];
    let builder = QueryBuilder::new(EqOnly);
    let err = builder
        .apply(Vec::new(), &filters, &ApplyOptions::new())
        .unwrap_err();
    assert_eq!(
        err,
        QueryError::UnsupportedOperator {
            adapter: "eq-only",
            operator: Operator::Gt,
            field: "age".to_string(),
        }
    );
}

// ============================================================================
// Raw parameters
// ============================================================================

#[test]
fn test_apply_raw_without_config() {
    let records = records();
    let params = Params::from_query_string(
        "name=ilike.*ad*&and=(age.gte.30,bogus)&page=2&sort=name.desc",
    )
    .unwrap();
    let builder = QueryBuilder::new(MemoryAdapter::new());
    let query = builder
        .apply_raw(RecordQuery::new(&records), &params, &ApplyOptions::new())
        .unwrap();
    assert_eq!(query.predicates().len(), 2);
    assert_eq!(ids(&query), vec![1, 3]);
}

#[test]
fn test_apply_raw_unsupported_operator_is_an_error() {
    let params = Params::from_query_string("name=eq.Ada&age=gt.3").unwrap();
    let builder = QueryBuilder::new(EqOnly);
    let err = builder
        .apply_raw(Vec::new(), &params, &ApplyOptions::new())
        .unwrap_err();
    assert_eq!(
        err,
        QueryError::UnsupportedOperator {
            adapter: "eq-only",
            operator: Operator::Gt,
            field: "age".to_string(),
        }
    );
}

#[test]
fn test_apply_raw_cast_failure_is_an_error() {
    let fields = fields();
    let records = records();
    let schema = FieldTypes::from_configs(&fields);
    let options = ApplyOptions::new().schema(&schema);
    let builder = QueryBuilder::new(MemoryAdapter::new());

    for query in ["age=gt.thirty", "and=(age.gt.thirty)"] {
        let params = Params::from_query_string(query).unwrap();
        let err = builder
            .apply_raw(RecordQuery::new(&records), &params, &options)
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::Cast(CastError::invalid("age", "thirty", CastType::Float)),
            "{query}"
        );
    }
}

#[test]
fn test_apply_raw_respects_allowed_fields() {
    let records = records();
    let allowed = vec!["name".to_string()];
    let options = ApplyOptions::new().allowed_fields(&allowed);
    let builder = QueryBuilder::new(MemoryAdapter::new());

    let params = Params::from_query_string("secret=eq.x&name=eq.Ada").unwrap();
    let query = builder
        .apply_raw(RecordQuery::new(&records), &params, &options)
        .unwrap();
    assert_eq!(query.predicates().len(), 1);
    assert_eq!(query.predicates()[0].field, "name");
    assert_eq!(ids(&query), vec![1]);

    let params = Params::from_query_string("and=(secret.eq.x,name.eq.Bob)").unwrap();
    let query = builder
        .apply_raw(RecordQuery::new(&records), &params, &options)
        .unwrap();
    assert_eq!(query.predicates().len(), 1);
    assert_eq!(ids(&query), vec![2]);
}

#[test]
fn test_apply_raw_unquotes_group_values() {
    let records = vec![
        json!({"id": 1, "name": "Ada, Countess"}),
        json!({"id": 2, "name": "Ada"}),
    ];
    let params = Params::from_query_string(r#"and=(name.eq."Ada, Countess")"#).unwrap();
    let builder = QueryBuilder::new(MemoryAdapter::new());
    let query = builder
        .apply_raw(RecordQuery::new(&records), &params, &ApplyOptions::new())
        .unwrap();
    assert_eq!(ids(&query), vec![1]);
}

#[test]
fn test_pattern_wildcards_in_values_match_literally() {
    let records = vec![
        json!({"id": 1, "name": "50% off"}),
        json!({"id": 2, "name": "500 items"}),
        json!({"id": 3, "name": "a_b"}),
        json!({"id": 4, "name": "axb"}),
    ];
    let builder = QueryBuilder::new(MemoryAdapter::new());

    let params = Params::from_query_string("name=ilike.50%25").unwrap();
    let query = builder
        .apply_raw(RecordQuery::new(&records), &params, &ApplyOptions::new())
        .unwrap();
    assert_eq!(ids(&query), vec![1]);

    let params = Params::from_query_string("name=like.a_b").unwrap();
    let query = builder
        .apply_raw(RecordQuery::new(&records), &params, &ApplyOptions::new())
        .unwrap();
    assert_eq!(ids(&query), vec![3]);
}

#[test]
fn test_pagination_and_count() {
    let records = records();
    let builder = QueryBuilder::new(MemoryAdapter::new());
    let query = RecordQuery::new(&records).order_by("age", false);
    let query = builder.apply_pagination(query, Some(1), Some(1));
    assert_eq!(ids(&query), vec![1]);
    assert_eq!(builder.count(&query), 3);
}
