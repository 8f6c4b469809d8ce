//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the sift CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// sift - parse, normalize, validate and apply URL filter parameters
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Field configuration file (default: from config)
    #[arg(long, global = true, env = "SIFT_FIELDS", value_name = "PATH")]
    pub fields: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a query string into filters
    #[command(alias = "p")]
    Parse {
        /// Query string (e.g., "status=in.(open,closed)&name=ilike.*ada*")
        query: String,
    },

    /// Re-serialize a query string into its canonical form
    #[command(alias = "n")]
    Normalize {
        /// Query string to normalize
        query: String,
    },

    /// Validate the filters in a query string
    Validate {
        /// Query string to validate
        query: String,

        /// Treat parameters that match no field as errors
        #[arg(long)]
        strict: bool,
    },

    /// Apply a query string to a JSON array of records
    #[command(alias = "a")]
    Apply {
        /// Query string to apply
        query: String,

        /// JSON file holding an array of records ("-" for stdin)
        #[arg(short, long, value_name = "FILE")]
        data: PathBuf,

        /// Maximum number of rows to return
        #[arg(long)]
        limit: Option<usize>,

        /// Number of rows to skip
        #[arg(long)]
        offset: Option<usize>,

        /// Only filter on this field (repeatable)
        #[arg(long, action = clap::ArgAction::Append)]
        allow: Vec<String>,

        /// Decode parameters without field configurations
        #[arg(long)]
        raw: bool,

        /// Sort by field (dotted paths allowed)
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Only return these fields (comma-separated)
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,
    },

    /// List configured fields
    #[command(alias = "f")]
    Fields,

    /// List the operator catalogue
    #[command(alias = "ops")]
    Operators,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Supported shells for completion generation
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Write a commented default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Show config file path
    Path,
}
