//! Reference adapter over in-memory JSON records.
//!
//! [`MemoryAdapter`] builds a [`RecordQuery`]: a borrowed record slice plus
//! the predicates, ordering, page and projection applied to it. Nothing is
//! evaluated until [`RecordQuery::rows`] or [`Adapter::count`] is called.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sift_core::Operator;
//! use sift_query::{Adapter, MemoryAdapter, RecordQuery, Value};
//!
//! let records = vec![json!({"name": "Ada", "age": 36}), json!({"name": "Bob", "age": 17})];
//! let adapter = MemoryAdapter::new();
//! let query = adapter.apply_condition(RecordQuery::new(&records), "age", Operator::Gte, &Value::Integer(18));
//! assert_eq!(query.rows(), vec![json!({"name": "Ada", "age": 36})]);
//! ```

use std::cmp::Ordering;
use std::marker::PhantomData;

use serde_json::{Map, Value as Json};
use sift_core::Operator;

use crate::adapter::Adapter;
use crate::condition::{Condition, Value};
use crate::schema::{parse_bool, parse_date, parse_datetime};

/// Every operator except `gte_lte`, which the builder expands beforehand.
const SUPPORTED: [Operator; 18] = [
    Operator::Eq,
    Operator::Neq,
    Operator::Gt,
    Operator::Gte,
    Operator::Lt,
    Operator::Lte,
    Operator::Like,
    Operator::Ilike,
    Operator::In,
    Operator::NotIn,
    Operator::Is,
    Operator::IsNull,
    Operator::Cs,
    Operator::Cd,
    Operator::Ov,
    Operator::Fts,
    Operator::Plfts,
    Operator::Phfts,
];

/// A lazily evaluated query over borrowed JSON records.
#[derive(Debug, Clone)]
pub struct RecordQuery<'r> {
    records: &'r [Json],
    predicates: Vec<Condition>,
    order: Vec<(String, bool)>,
    limit: Option<usize>,
    offset: Option<usize>,
    fields: Option<Vec<String>>,
}

impl<'r> RecordQuery<'r> {
    /// Starts a query over every record.
    pub fn new(records: &'r [Json]) -> Self {
        Self {
            records,
            predicates: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
            fields: None,
        }
    }

    /// Adds a sort key. Earlier keys take precedence.
    pub fn order_by(mut self, field: impl Into<String>, descending: bool) -> Self {
        self.order.push((field.into(), descending));
        self
    }

    /// Restricts the returned rows to the given (dotted) fields.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// The predicates applied so far.
    pub fn predicates(&self) -> &[Condition] {
        &self.predicates
    }

    /// Returns true if `record` satisfies every predicate.
    pub fn matches(&self, record: &Json) -> bool {
        self.predicates.iter().all(|cond| {
            let actual = lookup(record, &cond.field);
            evaluate(actual, cond.operator, &cond.value)
        })
    }

    /// Records matching every predicate, in input order.
    pub fn matching(&self) -> Vec<&'r Json> {
        self.records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Materializes the result: filter, sort, page, then project.
    pub fn rows(&self) -> Vec<Json> {
        let mut rows = self.matching();

        if !self.order.is_empty() {
            rows.sort_by(|a, b| {
                self.order
                    .iter()
                    .map(|(field, descending)| {
                        let ord = compare_json(lookup(a, field), lookup(b, field));
                        if *descending {
                            ord.reverse()
                        } else {
                            ord
                        }
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        rows.into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|record| self.project(record))
            .collect()
    }

    fn project(&self, record: &Json) -> Json {
        let Some(fields) = &self.fields else {
            return record.clone();
        };
        let mut out = Map::new();
        for field in fields {
            out.insert(
                field.clone(),
                lookup(record, field).cloned().unwrap_or(Json::Null),
            );
        }
        Json::Object(out)
    }
}

/// Adapter evaluating conditions against in-memory JSON records.
///
/// The lifetime ties the adapter to the records its queries borrow.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryAdapter<'r> {
    _records: PhantomData<&'r [Json]>,
}

impl MemoryAdapter<'_> {
    /// Creates the adapter.
    pub fn new() -> Self {
        Self {
            _records: PhantomData,
        }
    }
}

impl<'r> Adapter for MemoryAdapter<'r> {
    type Query = RecordQuery<'r>;

    fn name(&self) -> &'static str {
        "memory"
    }

    fn supported_operators(&self) -> &[Operator] {
        &SUPPORTED
    }

    fn apply_condition(
        &self,
        mut query: RecordQuery<'r>,
        field: &str,
        operator: Operator,
        value: &Value,
    ) -> RecordQuery<'r> {
        query
            .predicates
            .push(Condition::new(field, operator, value.clone()));
        query
    }

    fn paginate(
        &self,
        mut query: RecordQuery<'r>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> RecordQuery<'r> {
        query.limit = limit;
        query.offset = offset;
        query
    }

    fn count(&self, query: &RecordQuery<'r>) -> usize {
        query.records.iter().filter(|r| query.matches(r)).count()
    }
}

// ==================== Evaluation ====================

/// Follows a dotted path through nested objects.
fn lookup<'j>(record: &'j Json, path: &str) -> Option<&'j Json> {
    if let Some(value) = record.get(path) {
        return Some(value);
    }
    path.split('.').try_fold(record, |current, key| current.get(key))
}

fn evaluate(actual: Option<&Json>, operator: Operator, expected: &Value) -> bool {
    let actual = actual.filter(|v| !v.is_null());

    match operator {
        Operator::IsNull => match expected {
            Value::Bool(false) => actual.is_some(),
            _ => actual.is_none(),
        },
        Operator::Is => match (actual, expected) {
            (None, Value::Null) => true,
            (Some(Json::Bool(a)), Value::Bool(b)) => a == b,
            (Some(json), Value::Text(s)) => parse_bool(s)
                .zip(json.as_bool())
                .is_some_and(|(b, a)| a == b),
            _ => false,
        },
        _ => {
            let Some(actual) = actual else {
                return false;
            };
            evaluate_present(actual, operator, expected)
        }
    }
}

fn evaluate_present(actual: &Json, operator: Operator, expected: &Value) -> bool {
    match operator {
        Operator::Eq => compare(actual, expected) == Some(Ordering::Equal),
        Operator::Neq => compare(actual, expected).is_some_and(|o| o != Ordering::Equal),
        Operator::Gt => compare(actual, expected) == Some(Ordering::Greater),
        Operator::Gte => matches!(
            compare(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Lt => compare(actual, expected) == Some(Ordering::Less),
        Operator::Lte => matches!(
            compare(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Operator::Like | Operator::Ilike => {
            let (Some(text), Some(pattern)) = (json_text(actual), expected.as_text()) else {
                return false;
            };
            if operator == Operator::Ilike {
                like(&text.to_lowercase(), &pattern.to_lowercase())
            } else {
                like(&text, pattern)
            }
        }
        Operator::In => items(expected).iter().any(|item| equal(actual, item)),
        Operator::NotIn => !items(expected).iter().any(|item| equal(actual, item)),
        Operator::Cs => {
            let have = elements(actual);
            items(expected)
                .iter()
                .all(|want| have.iter().any(|h| equal(h, want)))
        }
        Operator::Cd => {
            let allowed = items(expected);
            elements(actual)
                .iter()
                .all(|h| allowed.iter().any(|want| equal(h, want)))
        }
        Operator::Ov => {
            let have = elements(actual);
            items(expected)
                .iter()
                .any(|want| have.iter().any(|h| equal(h, want)))
        }
        Operator::Fts | Operator::Plfts => {
            let (Some(text), Some(query)) = (json_text(actual), expected.as_text()) else {
                return false;
            };
            let words = terms(&text);
            let wanted = terms(query);
            !wanted.is_empty() && wanted.iter().all(|w| words.contains(w))
        }
        Operator::Phfts => {
            let (Some(text), Some(phrase)) = (json_text(actual), expected.as_text()) else {
                return false;
            };
            let phrase = terms(phrase).join(" ");
            !phrase.is_empty() && terms(&text).join(" ").contains(&phrase)
        }
        Operator::Is | Operator::IsNull | Operator::GteLte => false,
    }
}

fn equal(actual: &Json, expected: &Value) -> bool {
    compare(actual, expected) == Some(Ordering::Equal)
}

/// The list operand, or the scalar as a one-element list.
fn items(value: &Value) -> Vec<Value> {
    match value {
        Value::List(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// The elements of a JSON array, or the value itself.
fn elements(json: &Json) -> Vec<&Json> {
    match json {
        Json::Array(values) => values.iter().collect(),
        other => vec![other],
    }
}

fn json_text(json: &Json) -> Option<String> {
    match json {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Lowercased alphanumeric words.
fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Compares a JSON value against a typed operand.
///
/// Text operands compare numerically against numbers, and as dates or
/// datetimes when both sides parse as such.
fn compare(actual: &Json, expected: &Value) -> Option<Ordering> {
    match expected {
        Value::Null | Value::List(_) => None,
        Value::Integer(n) => json_number(actual)?.partial_cmp(&(*n as f64)),
        Value::Float(f) => json_number(actual)?.partial_cmp(f),
        Value::Bool(b) => match actual {
            Json::Bool(a) => Some(a.cmp(b)),
            Json::String(s) => parse_bool(s).map(|a| a.cmp(b)),
            _ => None,
        },
        Value::Date(d) => actual
            .as_str()
            .and_then(parse_date)
            .map(|a| a.cmp(d)),
        Value::DateTime(dt) => actual
            .as_str()
            .and_then(parse_datetime)
            .map(|a| a.cmp(dt)),
        Value::Text(s) => match actual {
            Json::Number(_) => {
                let expected: f64 = s.trim().parse().ok()?;
                json_number(actual)?.partial_cmp(&expected)
            }
            Json::Bool(a) => parse_bool(s).map(|b| a.cmp(&b)),
            Json::String(a) => Some(compare_text(a, s)),
            _ => None,
        },
    }
}

fn json_number(json: &Json) -> Option<f64> {
    match json {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    match (parse_datetime(a), parse_datetime(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Orders strings for sorting. Datetimes come first in time order, then
/// every other string lexically, so mixed columns still sort totally.
fn sort_text(a: &str, b: &str) -> Ordering {
    match (parse_datetime(a), parse_datetime(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Orders JSON values for sorting: nulls first, then booleans, numbers and
/// strings.
fn compare_json(a: Option<&Json>, b: Option<&Json>) -> Ordering {
    fn rank(v: Option<&Json>) -> u8 {
        match v {
            None | Some(Json::Null) => 0,
            Some(Json::Bool(_)) => 1,
            Some(Json::Number(_)) => 2,
            Some(Json::String(_)) => 3,
            Some(Json::Array(_)) => 4,
            Some(Json::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Json::Bool(x)), Some(Json::Bool(y))) => x.cmp(y),
        (Some(Json::Number(x)), Some(Json::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Json::String(x)), Some(Json::String(y))) => sort_text(x, y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// One element of a compiled `LIKE` pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Any,
    One,
    Literal(char),
}

/// Compiles a pattern; a backslash makes the next character literal.
fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => Token::Any,
            '_' => Token::One,
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            c => Token::Literal(c),
        });
    }
    tokens
}

/// SQL `LIKE`: `%` matches any run of characters, `_` exactly one, and a
/// backslash escapes either.
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern = tokenize(pattern);

    // Greedy matching with backtracking to the last `%`.
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some(Token::One) => {
                t += 1;
                p += 1;
                continue;
            }
            Some(Token::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
                continue;
            }
            Some(Token::Any) => {
                star = Some((p, t));
                p += 1;
                continue;
            }
            _ => {}
        }
        match star {
            Some((sp, st)) => {
                p = sp + 1;
                t = st + 1;
                star = Some((sp, st + 1));
            }
            None => return false,
        }
    }
    pattern[p..].iter().all(|token| *token == Token::Any)
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
