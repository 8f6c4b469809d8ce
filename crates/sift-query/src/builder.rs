//! Query builder: filters in, backend queryable out.

use std::fmt;

use sift_core::models::{FieldConfig, Filter, FilterValue};
use sift_core::params::RESERVED_GROUP_KEY;
use sift_core::parser::{
    decode_value, split_condition, split_operator, split_top_level, strip_delimiters,
    unquote_item,
};
use sift_core::{parse, Operator, Params};

use crate::adapter::Adapter;
use crate::condition::{Condition, Value};
use crate::error::{QueryError, QueryResult};
use crate::schema::Schema;

/// What [`QueryBuilder::apply`] reads filters from.
#[derive(Debug, Clone, Copy)]
pub enum FilterSource<'s, 'a> {
    /// Already-parsed filters.
    Filters(&'s [Filter<'a>]),
    /// Raw parameters, parsed against [`ApplyOptions::config`].
    Params(&'s Params),
}

impl<'s, 'a> From<&'s [Filter<'a>]> for FilterSource<'s, 'a> {
    fn from(filters: &'s [Filter<'a>]) -> Self {
        FilterSource::Filters(filters)
    }
}

impl<'s, 'a> From<&'s Vec<Filter<'a>>> for FilterSource<'s, 'a> {
    fn from(filters: &'s Vec<Filter<'a>>) -> Self {
        FilterSource::Filters(filters)
    }
}

impl<'s> From<&'s Params> for FilterSource<'s, 'static> {
    fn from(params: &'s Params) -> Self {
        FilterSource::Params(params)
    }
}

/// Options for [`QueryBuilder::apply`] and friends.
#[derive(Clone, Copy, Default)]
pub struct ApplyOptions<'o> {
    /// When set, filters on other fields are dropped.
    pub allowed_fields: Option<&'o [String]>,
    /// Optional type casting applied to the expanded conditions.
    pub schema: Option<&'o dyn Schema>,
    /// Field configurations, required for raw parameter input.
    pub config: Option<&'o [FieldConfig]>,
}

impl<'o> ApplyOptions<'o> {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts filtering to `fields`.
    pub fn allowed_fields(mut self, fields: &'o [String]) -> Self {
        self.allowed_fields = Some(fields);
        self
    }

    /// Sets the casting schema.
    pub fn schema(mut self, schema: &'o dyn Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the field configurations used to parse raw parameters.
    pub fn config(mut self, config: &'o [FieldConfig]) -> Self {
        self.config = Some(config);
        self
    }

    fn allows(&self, field: &str) -> bool {
        self.allowed_fields
            .map_or(true, |allowed| allowed.iter().any(|f| f == field))
    }
}

impl fmt::Debug for ApplyOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplyOptions")
            .field("allowed_fields", &self.allowed_fields)
            .field("schema", &self.schema.map(|_| ".."))
            .field("config", &self.config.map(<[FieldConfig]>::len))
            .finish()
    }
}

/// Turns filters into conditions and applies them through an [`Adapter`].
#[derive(Debug, Clone)]
pub struct QueryBuilder<A> {
    adapter: A,
}

impl<A: Adapter> QueryBuilder<A> {
    /// Creates a builder over `adapter`.
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    /// The wrapped adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Applies filters (or raw parameters) to `query`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingConfig`] for raw parameters without
    /// configurations, [`QueryError::Cast`] if the schema rejects a value,
    /// and [`QueryError::UnsupportedOperator`] if the adapter cannot apply
    /// a condition.
    pub fn apply<'s, 'a>(
        &self,
        query: A::Query,
        source: impl Into<FilterSource<'s, 'a>>,
        options: &ApplyOptions<'_>,
    ) -> QueryResult<A::Query>
    where
        'a: 's,
    {
        let conditions = match source.into() {
            FilterSource::Filters(filters) => self.conditions(filters, options)?,
            FilterSource::Params(params) => {
                let config = options.config.ok_or(QueryError::MissingConfig)?;
                let outcome = parse(params, config);
                self.conditions(&outcome.filters, options)?
            }
        };
        self.apply_conditions(query, conditions)
    }

    /// Expands and casts filters without applying them.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Cast`] if the schema rejects a value.
    pub fn conditions(
        &self,
        filters: &[Filter<'_>],
        options: &ApplyOptions<'_>,
    ) -> QueryResult<Vec<Condition>> {
        let mut conditions = Vec::with_capacity(filters.len());
        for filter in filters {
            if !options.allows(&filter.field) {
                tracing::debug!(field = %filter.field, "dropping filter on disallowed field");
                continue;
            }
            if filter.is_empty() {
                tracing::trace!(field = %filter.field, "dropping empty filter");
                continue;
            }
            self.expand(
                filter.config().query_field(),
                filter.operator,
                &filter.value,
                &mut conditions,
            );
        }

        match options.schema {
            Some(schema) => Ok(schema.cast(conditions)?),
            None => Ok(conditions),
        }
    }

    /// Applies already-expanded conditions in order.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnsupportedOperator`] for the first condition
    /// the adapter cannot apply.
    pub fn apply_conditions(
        &self,
        query: A::Query,
        conditions: Vec<Condition>,
    ) -> QueryResult<A::Query> {
        conditions.into_iter().try_fold(query, |query, cond| {
            if !self.adapter.supports(cond.operator) {
                return Err(QueryError::UnsupportedOperator {
                    adapter: self.adapter.name(),
                    operator: cond.operator,
                    field: cond.field,
                });
            }
            tracing::trace!(condition = %cond, "applying condition");
            Ok(self
                .adapter
                .apply_condition(query, &cond.field, cond.operator, &cond.value))
        })
    }

    /// Applies raw `key=op.value` parameters without field configurations.
    ///
    /// Every parameter and every grouped condition is decoded on its own.
    /// Malformed or disallowed entries are dropped; a value the schema
    /// cannot cast or an operator the adapter lacks is an error, as in
    /// [`QueryBuilder::apply`].
    pub fn apply_raw(
        &self,
        query: A::Query,
        params: &Params,
        options: &ApplyOptions<'_>,
    ) -> QueryResult<A::Query> {
        let mut conditions = Vec::new();

        for (key, value) in params.pairs() {
            if key == RESERVED_GROUP_KEY {
                let value = value.trim();
                let body = strip_delimiters(value, '(', ')').unwrap_or(value);
                for part in split_top_level(body, ',') {
                    match split_condition(part) {
                        Some(cond) => self.push_raw(
                            cond.field,
                            cond.operator,
                            &unquote_item(cond.value),
                            options,
                            &mut conditions,
                        ),
                        None => {
                            tracing::debug!(condition = part, "dropping malformed group condition")
                        }
                    }
                }
                continue;
            }

            match split_operator(value) {
                Some((operator, raw)) => {
                    self.push_raw(key, operator, raw, options, &mut conditions)
                }
                None => tracing::debug!(key, value, "dropping parameter without operator"),
            }
        }

        let conditions = match options.schema {
            Some(schema) => schema.cast(conditions)?,
            None => conditions,
        };
        self.apply_conditions(query, conditions)
    }

    /// Limits the query to one page.
    pub fn apply_pagination(
        &self,
        query: A::Query,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> A::Query {
        self.adapter.paginate(query, limit, offset)
    }

    /// Counts the rows `query` matches.
    pub fn count(&self, query: &A::Query) -> usize {
        self.adapter.count(query)
    }

    fn push_raw(
        &self,
        field: &str,
        operator: Operator,
        raw: &str,
        options: &ApplyOptions<'_>,
        out: &mut Vec<Condition>,
    ) {
        if !options.allows(field) {
            tracing::debug!(field, "dropping raw condition on disallowed field");
            return;
        }
        let (operator, value) = decode_value(operator, raw);
        if value.is_empty() {
            return;
        }
        self.expand(field, operator, &value, out);
    }

    /// Converts one filter value into conditions.
    fn expand(
        &self,
        field: &str,
        operator: Operator,
        value: &FilterValue,
        out: &mut Vec<Condition>,
    ) {
        let value = match value {
            FilterValue::Range(lower, upper) => {
                if let Some(lower) = lower {
                    out.push(Condition::new(field, Operator::Gte, lower.as_str()));
                }
                if let Some(upper) = upper {
                    out.push(Condition::new(field, Operator::Lte, upper.as_str()));
                }
                return;
            }
            FilterValue::Text(text) if operator.is_pattern() => {
                Value::Text(self.adapter.wildcard(text.trim_matches('*')))
            }
            FilterValue::Text(text) => Value::Text(text.clone()),
            FilterValue::List(items) => {
                Value::List(items.iter().map(|item| Value::Text(item.clone())).collect())
            }
            FilterValue::Bool(b) => Value::Bool(*b),
            FilterValue::Number(n) => Value::Float(*n),
            FilterValue::Null => Value::Null,
        };
        out.push(Condition::new(field, operator, value));
    }
}
