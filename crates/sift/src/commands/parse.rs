//! Parse command implementation.
//!
//! Decodes a query string against the configured fields and shows the
//! resulting filters along with any parameters that matched no field.

use serde::Serialize;
use sift_core::models::{FieldConfig, FieldConfigSet};
use sift_core::params::RESERVED_GROUP_KEY;
use sift_core::{parse, Params};

use super::{CommandContext, Result};
use crate::output::{format_parse_json, format_parse_table};

/// A passed-through parameter that looks like a misspelt field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownParam {
    /// The parameter key.
    pub key: String,
    /// Closest configured field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Lists the keys of `remaining` that no field claims.
///
/// The grouping key is skipped; leftover group conditions are not field
/// parameters of their own.
pub fn unknown_params(remaining: &Params, fields: &[FieldConfig]) -> Vec<UnknownParam> {
    let set = FieldConfigSet::new(fields);
    remaining
        .iter()
        .filter(|(key, _)| *key != RESERVED_GROUP_KEY)
        .map(|(key, _)| UnknownParam {
            key: key.to_string(),
            suggestion: set.suggest(key).map(str::to_string),
        })
        .collect()
}

/// Executes the parse command.
///
/// # Errors
///
/// Returns an error if the query string is malformed.
pub fn execute(ctx: &CommandContext, fields: &[FieldConfig], query: &str) -> Result<()> {
    let params = Params::from_query_string(query)?;
    let outcome = parse(&params, fields);
    let unknown = unknown_params(&outcome.remaining, fields);

    if ctx.verbose {
        eprintln!(
            "Parsed {} filter(s), {} parameter(s) passed through",
            outcome.filters.len(),
            outcome.remaining.len()
        );
    }

    if ctx.json_output {
        let output = format_parse_json(&outcome.filters, &outcome.remaining, &unknown)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_parse_table(
            &outcome.filters,
            &outcome.remaining,
            &unknown,
            ctx.use_colors,
        );
        print!("{output}");
    }

    Ok(())
}
