//! Config file handling and the `sift config` subcommands.
//!
//! The file lives at `$SIFT_CONFIG`, else `$XDG_CONFIG_HOME/sift/config.toml`,
//! else `~/.config/sift/config.toml`.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use sift_core::models::FieldConfigSpec;
use sift_core::Validator;

use super::{CommandContext, CommandError, Result};

/// Schema version written to new files.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SIFT_CONFIG";

/// Keys accepted by `sift config set`.
const SETTABLE_KEYS: &[&str] = &[
    "fields_file",
    "output.color",
    "limits.max_value_length",
    "limits.max_list_size",
    "query.allowed_fields",
    "query.default_limit",
];

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# sift - URL filter configuration

# Config schema version (do not modify)
version = 1

# Field definitions file (TOML or JSON with a top-level `fields` array).
# Relative paths are resolved against this file's directory.
# fields_file = "fields.toml"

# Output preferences
[output]
# color = true              # Enable colors (respects NO_COLOR env)

# Validator limits
[limits]
# max_value_length = 500    # Characters per text value
# max_list_size = 100       # Items per list value

# Query defaults for `sift apply`
[query]
# allowed_fields = ["status", "created"]
# default_limit = 50

# Fields can also be declared inline:
#
# [[fields]]
# field = "status"
# type = "select"
# options = ["open", "closed"]
#
# [[fields]]
# field = "created"
# type = "date_range"
# query_field = "created_at"
"#;

/// Contents of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version; files without one are treated as current.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Path to a field definitions file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields_file: Option<PathBuf>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Validator limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Query defaults.
    #[serde(default)]
    pub query: QueryConfig,

    /// Inline field definitions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldConfigSpec>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            fields_file: None,
            output: OutputConfig::default(),
            limits: LimitsConfig::default(),
            query: QueryConfig::default(),
            fields: Vec::new(),
        }
    }
}

impl Config {
    /// Builds a validator honouring the configured limits.
    pub fn validator(&self) -> Validator {
        let mut validator = Validator::new();
        if let Some(max) = self.limits.max_value_length {
            validator = validator.max_value_length(max);
        }
        if let Some(max) = self.limits.max_list_size {
            validator = validator.max_list_size(max);
        }
        validator
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Validator limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum characters per text value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value_length: Option<usize>,

    /// Maximum items per list value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_list_size: Option<usize>,
}

/// Query defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Fields `sift apply` may filter on when `--allow` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_fields: Option<Vec<String>>,

    /// Page size when `--limit` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<usize>,
}

/// Directory holding the config file. Relative `fields_file` entries
/// resolve against it.
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(parent) = env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .and_then(|path| path.parent().map(Path::to_path_buf))
    {
        return Ok(parent);
    }

    if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("sift"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("sift"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Path of `config.toml`.
pub fn get_config_path() -> Result<PathBuf> {
    match env::var_os(CONFIG_ENV) {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(get_config_dir()?.join("config.toml")),
    }
}

/// Where the config file lives and whether it is there yet.
#[derive(Debug, Serialize)]
struct ConfigLocation {
    path: String,
    exists: bool,
}

impl ConfigLocation {
    fn of(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            exists: path.exists(),
        }
    }
}

/// Wraps an I/O or codec failure as a config error.
fn config_failure<E: fmt::Display>(action: &'static str) -> impl FnOnce(E) -> CommandError {
    move |e| CommandError::Config(format!("{action}: {e}"))
}

/// Loads the configuration from disk, or defaults when there is no file.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).map_err(config_failure("Failed to read config"))?;
    let config: Config =
        toml::from_str(&content).map_err(config_failure("Failed to parse config"))?;

    tracing::debug!(path = %path.display(), fields = config.fields.len(), "loaded config");
    migrate_config(config)
}

/// Brings an older config up to [`CONFIG_VERSION`].
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Writes `content` to `path`, creating parent directories.
fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(config_failure("Failed to create config directory"))?;
    }
    fs::write(path, content).map_err(config_failure("Failed to write config"))
}

fn save_config(config: &Config) -> Result<()> {
    let content =
        toml::to_string_pretty(config).map_err(config_failure("Failed to serialize config"))?;
    write_config_file(&get_config_path()?, &content)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        #[derive(Serialize)]
        struct ShowOutput<'a> {
            #[serde(flatten)]
            location: ConfigLocation,
            config: &'a Config,
        }

        let output = ShowOutput {
            location: ConfigLocation::of(&path),
            config: &config,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    let title = format!("Config: {}", path.display());
    if ctx.use_colors {
        println!("{}", title.bold());
    } else {
        println!("{title}");
    }

    if !path.exists() {
        println!("No config file yet; defaults apply. Run 'sift config init' to create one.");
        return Ok(());
    }

    for key in SETTABLE_KEYS {
        let value = setting(&config, key).unwrap_or_else(|| "-".to_string());
        println!("  {key:<24} {value}");
    }
    if !config.fields.is_empty() {
        println!("  {:<24} {} inline", "fields", config.fields.len());
    }

    Ok(())
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "{} already exists; pass --force to replace it",
            path.display()
        )));
    }

    write_config_file(&path, DEFAULT_CONFIG)?;
    tracing::debug!(path = %path.display(), force, "wrote config template");

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&ConfigLocation::of(&path))?);
    } else if !ctx.quiet {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Dotted key, one of [`SETTABLE_KEYS`].
    pub key: String,
    /// New value; empty clears optional settings.
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    let current = setting(&config, &opts.key);
    if ctx.json_output {
        let output = serde_json::json!({
            "key": opts.key,
            "value": current,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        match current {
            Some(value) => println!("{} = {}", opts.key, value),
            None => println!("{} cleared", opts.key),
        }
    }

    Ok(())
}

/// Renders the current value of a settable key.
fn setting(config: &Config, key: &str) -> Option<String> {
    match key {
        "fields_file" => config.fields_file.as_ref().map(|p| p.display().to_string()),
        "output.color" => config.output.color.map(|c| c.to_string()),
        "limits.max_value_length" => config.limits.max_value_length.map(|n| n.to_string()),
        "limits.max_list_size" => config.limits.max_list_size.map(|n| n.to_string()),
        "query.allowed_fields" => config.query.allowed_fields.as_ref().map(|f| f.join(",")),
        "query.default_limit" => config.query.default_limit.map(|n| n.to_string()),
        _ => None,
    }
}

/// Sets one dotted key on `config`.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "fields_file" => config.fields_file = non_empty(value).map(PathBuf::from),
        "output.color" => config.output.color = Some(parse_switch(value)?),
        "limits.max_value_length" => {
            config.limits.max_value_length = Some(parse_count(key, value)?)
        }
        "limits.max_list_size" => config.limits.max_list_size = Some(parse_count(key, value)?),
        "query.allowed_fields" => {
            config.query.allowed_fields = non_empty(value).map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string)
                    .collect()
            })
        }
        "query.default_limit" => config.query.default_limit = Some(parse_count(key, value)?),
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: {}",
                key,
                SETTABLE_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&ConfigLocation::of(&path))?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

const ON: &[&str] = &["true", "yes", "on", "1"];
const OFF: &[&str] = &["false", "no", "off", "0"];

/// Parses an on/off switch, case-insensitively.
fn parse_switch(s: &str) -> Result<bool> {
    let lower = s.trim().to_ascii_lowercase();
    if ON.contains(&lower.as_str()) {
        Ok(true)
    } else if OFF.contains(&lower.as_str()) {
        Ok(false)
    } else {
        Err(CommandError::Config(format!(
            "'{}' is not a switch; expected one of {} or {}",
            s,
            ON.join("/"),
            OFF.join("/")
        )))
    }
}

/// Parses a positive count.
fn parse_count(key: &str, s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::Config(format!(
            "{key} must be a positive integer, got '{s}'"
        ))),
    }
}
