//! The backend seam.

use sift_core::Operator;

use crate::condition::Value;

/// Applies conditions to a backend-specific queryable.
///
/// An adapter is stateless configuration; the queryable it builds is
/// passed by value and returned with the condition applied, so callers can
/// keep chaining.
pub trait Adapter {
    /// The backend's queryable type.
    type Query;

    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Operators [`Adapter::apply_condition`] understands.
    fn supported_operators(&self) -> &[Operator];

    /// Returns the query narrowed by `field operator value`.
    fn apply_condition(
        &self,
        query: Self::Query,
        field: &str,
        operator: Operator,
        value: &Value,
    ) -> Self::Query;

    /// Wraps a pattern operand for substring matching.
    ///
    /// `%` and `_` in the operand are escaped, so user input never acts
    /// as a pattern.
    fn wildcard(&self, value: &str) -> String {
        format!("%{}%", escape_like(value))
    }

    /// Returns the query limited to one page.
    fn paginate(&self, query: Self::Query, limit: Option<usize>, offset: Option<usize>)
        -> Self::Query;

    /// Counts matching rows, ignoring ordering, pagination and projection.
    fn count(&self, query: &Self::Query) -> usize;

    /// Returns true if `operator` is supported.
    fn supports(&self, operator: Operator) -> bool {
        self.supported_operators().contains(&operator)
    }
}

/// Escapes `LIKE` metacharacters with a backslash, the default escape
/// character of SQL backends.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
