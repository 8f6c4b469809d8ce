//! Operators command implementation.
//!
//! Lists the operator catalogue: wire symbol, arity and label.

use sift_core::Operator;

use super::{CommandContext, Result};
use crate::output::{format_operators_json, format_operators_table};

/// Executes the operators command.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    if ctx.json_output {
        let output = format_operators_json(&Operator::ALL)?;
        println!("{output}");
    } else if !ctx.quiet {
        print!("{}", format_operators_table(&Operator::ALL, ctx.use_colors));
    }

    Ok(())
}
