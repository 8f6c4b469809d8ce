//! Command implementations for the sift CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod apply;
pub mod completions;
pub mod config;
pub mod fields;
pub mod normalize;
pub mod operators;
pub mod parse;
pub mod validate;

use sift_core::{ConfigError, ValidationError};
use sift_query::QueryError;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Invalid field configuration.
    #[error("field configuration error: {0}")]
    FieldConfig(#[from] ConfigError),

    /// A filter failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Query building error.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Malformed query string.
    #[error("invalid query string: {0}")]
    Decode(#[from] serde_urlencoded::de::Error),

    /// Parameters could not be encoded.
    #[error("could not encode parameters: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    /// A parameter matched no configured field.
    #[error(
        "unknown parameter '{key}'{}",
        .suggestion.as_ref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default()
    )]
    UnknownField {
        /// The unmatched parameter key.
        key: String,
        /// Closest configured field, if any.
        suggestion: Option<String>,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are also disabled when `NO_COLOR` is set.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}
