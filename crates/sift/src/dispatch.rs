//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands split into those that run on their own and those that need
//! the loaded config and resolved field configurations.

use sift_core::models::FieldConfig;

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::apply::ApplyOptions;
use crate::commands::config::Config;
use crate::commands::validate::ValidateOptions;
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that need neither config nor fields.
pub trait StandaloneCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that work on field configurations.
pub trait FieldsCommand {
    /// Execute the command with the loaded config and fields.
    fn execute(&self, ctx: &CommandContext, config: &Config, fields: &[FieldConfig])
        -> Result<()>;
}

/// Commands that run without field configurations.
pub enum StandaloneDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(Shell),
    Operators,
    Help,
}

impl<'a> StandaloneDispatch<'a> {
    /// Try to create a standalone dispatch from the CLI command.
    /// Returns None if the command needs field configurations.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(*shell)),
            Some(Commands::Operators) => Some(Self::Operators),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl StandaloneCommand for StandaloneDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(*shell).map_err(CommandError::Io)
            }
            Self::Operators => commands::operators::execute(ctx),
            Self::Help => {
                if !ctx.quiet {
                    println!("sift - URL filter toolkit");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Init { force }) => commands::config::execute_init(ctx, *force),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that need field configurations.
pub enum FieldsDispatch<'a> {
    Parse { query: &'a str },
    Normalize { query: &'a str },
    Validate(ValidateOptions),
    Apply(ApplyOptions),
    Fields,
}

impl<'a> FieldsDispatch<'a> {
    /// Creates a dispatch from the CLI command.
    /// Returns None for standalone commands.
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Parse { query }) => Some(Self::Parse {
                query: query.as_str(),
            }),
            Some(Commands::Normalize { query }) => Some(Self::Normalize {
                query: query.as_str(),
            }),
            Some(Commands::Validate { query, strict }) => Some(Self::Validate(ValidateOptions {
                query: query.clone(),
                strict: *strict,
            })),
            Some(Commands::Apply {
                query,
                data,
                limit,
                offset,
                allow,
                raw,
                sort,
                desc,
                select,
            }) => Some(Self::Apply(ApplyOptions {
                query: query.clone(),
                data: data.clone(),
                limit: *limit,
                offset: *offset,
                allow: allow.clone(),
                raw: *raw,
                sort: sort.clone(),
                desc: *desc,
                select: select.clone(),
            })),
            Some(Commands::Fields) => Some(Self::Fields),
            _ => None,
        }
    }

    /// Raw `apply` decodes parameters without field configurations.
    pub fn needs_fields(&self) -> bool {
        !matches!(self, Self::Apply(opts) if opts.raw)
    }
}

impl FieldsCommand for FieldsDispatch<'_> {
    fn execute(
        &self,
        ctx: &CommandContext,
        config: &Config,
        fields: &[FieldConfig],
    ) -> Result<()> {
        match self {
            Self::Parse { query } => commands::parse::execute(ctx, fields, query),
            Self::Normalize { query } => commands::normalize::execute(ctx, fields, query),
            Self::Validate(opts) => {
                commands::validate::execute(ctx, fields, &config.validator(), opts)
            }
            Self::Apply(opts) => commands::apply::execute(ctx, fields, config, opts),
            Self::Fields => commands::fields::execute(ctx, fields),
        }
    }
}
