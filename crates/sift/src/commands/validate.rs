//! Validate command implementation.
//!
//! Parses a query string and checks every filter against the validator
//! limits from the config.

use sift_core::models::FieldConfig;
use sift_core::{parse, Params, Validator};

use super::parse::unknown_params;
use super::{CommandContext, CommandError, Result};
use crate::output::{format_valid_json, format_valid_text};

/// Options for the validate command.
#[derive(Debug)]
pub struct ValidateOptions {
    /// The query string.
    pub query: String,
    /// Fail on parameters that match no field.
    pub strict: bool,
}

/// Parses and validates a query string, returning the number of filters.
///
/// # Errors
///
/// Returns the first validation failure, or in strict mode the first
/// parameter that matches no field.
pub fn check(
    opts: &ValidateOptions,
    fields: &[FieldConfig],
    validator: &Validator,
) -> Result<usize> {
    let params = Params::from_query_string(&opts.query)?;
    let outcome = parse(&params, fields);

    if opts.strict {
        if let Some(unknown) = unknown_params(&outcome.remaining, fields).into_iter().next() {
            return Err(CommandError::UnknownField {
                key: unknown.key,
                suggestion: unknown.suggestion,
            });
        }
    }

    validator.validate(&outcome.filters)?;
    Ok(outcome.filters.len())
}

/// Executes the validate command.
///
/// # Errors
///
/// Returns an error if the query string is malformed or a filter is invalid.
pub fn execute(
    ctx: &CommandContext,
    fields: &[FieldConfig],
    validator: &Validator,
    opts: &ValidateOptions,
) -> Result<()> {
    let count = check(opts, fields, validator)?;

    if ctx.json_output {
        let output = format_valid_json(count)?;
        println!("{output}");
    } else if !ctx.quiet {
        print!("{}", format_valid_text(count, ctx.use_colors));
    }

    Ok(())
}
