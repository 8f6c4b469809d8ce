//! Normalize command implementation.
//!
//! Parses a query string and serializes the filters back, producing the
//! canonical encoding. Unrecognized parameters are kept.

use sift_core::models::FieldConfig;
use sift_core::{parse, serialize_into, Params};

use super::{CommandContext, Result};
use crate::output::format_normalize_json;

/// Parses and re-serializes `query`.
///
/// # Errors
///
/// Returns an error if the query string is malformed or cannot be encoded.
pub fn normalize(query: &str, fields: &[FieldConfig]) -> Result<(Params, usize)> {
    let params = Params::from_query_string(query)?;
    let outcome = parse(&params, fields);
    let normalized = serialize_into(&outcome.remaining, &outcome.filters);
    Ok((normalized, outcome.filters.len()))
}

/// Executes the normalize command.
///
/// # Errors
///
/// Returns an error if the query string is malformed or cannot be encoded.
pub fn execute(ctx: &CommandContext, fields: &[FieldConfig], query: &str) -> Result<()> {
    let (params, filters) = normalize(query, fields)?;
    let encoded = params.to_query_string()?;

    if ctx.json_output {
        let output = format_normalize_json(&encoded, &params, filters)?;
        println!("{output}");
    } else if !ctx.quiet {
        println!("{encoded}");
    }

    Ok(())
}
