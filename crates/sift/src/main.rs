use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::load_config;
use commands::fields::resolve_fields;
use commands::{CommandContext, CommandError};
use dispatch::{FieldsCommand, FieldsDispatch, StandaloneCommand, StandaloneDispatch};
use sift_query::QueryError;

/// Environment variable holding the log filter.
const ENV_LOG: &str = "SIFT_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, !cli.no_color);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs the stderr subscriber. `SIFT_LOG` wins over `RUST_LOG`.
fn init_logging(verbose: bool, use_colors: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };

    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_filter.to_string());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(use_colors)
        .compact()
        .with_env_filter(filter)
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    let mut ctx = CommandContext::from_cli(cli);

    if let Some(dispatch) = StandaloneDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    let Some(dispatch) = FieldsDispatch::from_cli(cli) else {
        return Err(CommandError::Config(format!(
            "unhandled command: {:?}",
            cli.command
        )));
    };

    let config = load_config()?;
    if config.output.color == Some(false) {
        ctx.use_colors = false;
    }

    let fields = if dispatch.needs_fields() {
        resolve_fields(cli.fields.as_deref(), &config)?
    } else {
        Vec::new()
    };

    dispatch.execute(&ctx, &config, &fields)
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::FieldConfig(_) => "FIELD_CONFIG_ERROR",
        CommandError::Validation(err) => err.code(),
        CommandError::Query(QueryError::Cast(_)) => "CAST_ERROR",
        CommandError::Query(QueryError::UnsupportedOperator { .. }) => "UNSUPPORTED_OPERATOR",
        CommandError::Query(QueryError::MissingConfig) => "QUERY_ERROR",
        CommandError::Decode(_) => "INVALID_QUERY",
        CommandError::Encode(_) => "ENCODE_ERROR",
        CommandError::UnknownField { .. } => "UNKNOWN_FIELD",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Config(_) | CommandError::FieldConfig(_) => 5,
        CommandError::Validation(_)
        | CommandError::UnknownField { .. }
        | CommandError::Decode(_)
        | CommandError::Encode(_)
        | CommandError::Query(QueryError::Cast(_)) => 1,
        CommandError::Query(_) => 2,
        CommandError::Io(_) => 3,
        CommandError::Json(_) => 1,
    }
}
