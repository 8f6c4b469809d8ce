//! The operator catalogue.
//!
//! Every operator has a wire symbol (the prefix in `field=op.value`), a human
//! label, and an [`Arity`] that decides whether its value is a scalar or a
//! list. The catalogue is static and read-only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value arity of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// The value is a single scalar (or a range tuple for `gte_lte`).
    Single,
    /// The value is an ordered list.
    Multi,
}

/// A filter operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Equality.
    Eq,
    /// Inequality.
    Neq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Case-sensitive pattern match.
    Like,
    /// Case-insensitive substring match.
    Ilike,
    /// Membership in a list.
    In,
    /// Exclusion from a list.
    NotIn,
    /// Tri-state comparison (`true`, `false`, `null`).
    Is,
    /// Null check; the value is `true` for "is null", `false` for "is not null".
    IsNull,
    /// Array contains all of the given values.
    Cs,
    /// Array is contained by the given values.
    Cd,
    /// Array overlaps the given values.
    Ov,
    /// Full-text search.
    Fts,
    /// Plain full-text search.
    Plfts,
    /// Phrase full-text search.
    Phfts,
    /// Compound range: lower and upper bound, either optional.
    GteLte,
}

impl Operator {
    /// Every operator, in catalogue order.
    pub const ALL: [Operator; 19] = [
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
        Operator::GteLte,
    ];

    /// Returns the wire symbol for this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Like => "like",
            Operator::Ilike => "ilike",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Is => "is",
            Operator::IsNull => "is_null",
            Operator::Cs => "cs",
            Operator::Cd => "cd",
            Operator::Ov => "ov",
            Operator::Fts => "fts",
            Operator::Plfts => "plfts",
            Operator::Phfts => "phfts",
            Operator::GteLte => "gte_lte",
        }
    }

    /// Looks up an operator by its wire symbol.
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Returns the human-readable label for this operator.
    pub fn label(self) -> &'static str {
        match self {
            Operator::Eq => "equals",
            Operator::Neq => "does not equal",
            Operator::Gt => "greater than",
            Operator::Gte => "greater than or equal",
            Operator::Lt => "less than",
            Operator::Lte => "less than or equal",
            Operator::Like => "matches",
            Operator::Ilike => "contains",
            Operator::In => "is any of",
            Operator::NotIn => "is none of",
            Operator::Is => "is",
            Operator::IsNull => "is empty",
            Operator::Cs => "contains all of",
            Operator::Cd => "is contained by",
            Operator::Ov => "overlaps",
            Operator::Fts => "full-text search",
            Operator::Plfts => "plain full-text search",
            Operator::Phfts => "phrase search",
            Operator::GteLte => "between",
        }
    }

    /// Returns the value arity of this operator.
    pub fn arity(self) -> Arity {
        match self {
            Operator::In | Operator::NotIn | Operator::Ov | Operator::Cs | Operator::Cd => {
                Arity::Multi
            }
            _ => Arity::Single,
        }
    }

    /// Returns true for the array operators rendered with curly braces.
    pub fn is_array(self) -> bool {
        matches!(self, Operator::Cs | Operator::Cd | Operator::Ov)
    }

    /// Returns true for the pattern-matching operators.
    pub fn is_pattern(self) -> bool {
        matches!(self, Operator::Like | Operator::Ilike)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Returns the label for an operator symbol, or the symbol itself when it
/// is not part of the catalogue.
pub fn label_for(symbol: &str) -> &str {
    match Operator::from_symbol(symbol) {
        Some(op) => op.label(),
        None => symbol,
    }
}
