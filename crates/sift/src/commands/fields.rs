//! Field configuration loading and the fields command.
//!
//! Fields come from, in order of precedence: the `--fields` flag (or
//! `SIFT_FIELDS`), the config's `fields_file`, then inline `[[fields]]`
//! tables in the config itself.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sift_core::models::{FieldConfig, FieldConfigSet, FieldConfigSpec};

use super::config::{get_config_dir, Config};
use super::{CommandContext, CommandError, Result};
use crate::output::{format_fields_json, format_fields_table};

/// On-disk shape of a field definitions file.
#[derive(Debug, Default, Deserialize)]
struct FieldsFile {
    #[serde(default)]
    fields: Vec<FieldConfigSpec>,
}

/// Resolves the active field configurations.
///
/// # Errors
///
/// Returns an error if the field file cannot be read or parsed, if a field
/// definition is invalid, or if no fields are configured at all.
pub fn resolve_fields(flag: Option<&Path>, config: &Config) -> Result<Vec<FieldConfig>> {
    let specs = match (flag, config.fields_file.as_deref()) {
        (Some(path), _) => load_field_specs(path)?,
        (None, Some(path)) => load_field_specs(&relative_to_config(path)?)?,
        (None, None) => config.fields.clone(),
    };

    if specs.is_empty() {
        return Err(CommandError::Config(
            "No fields configured. Pass --fields <file> or add [[fields]] to the config"
                .to_string(),
        ));
    }

    let fields = FieldConfigSet::from_specs(specs)?;
    tracing::debug!(count = fields.len(), "resolved field configurations");
    Ok(fields)
}

/// Reads field specs from a TOML or JSON file.
pub fn load_field_specs(path: &Path) -> Result<Vec<FieldConfigSpec>> {
    let content = fs::read_to_string(path).map_err(|e| {
        CommandError::Config(format!("Failed to read fields file {}: {}", path.display(), e))
    })?;

    let file: FieldsFile = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content).map_err(|e| {
            CommandError::Config(format!(
                "Failed to parse fields file {}: {}",
                path.display(),
                e
            ))
        })?
    };

    tracing::debug!(path = %path.display(), count = file.fields.len(), "loaded fields file");
    Ok(file.fields)
}

/// Relative `fields_file` entries are resolved against the config directory.
fn relative_to_config(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(get_config_dir()?.join(path))
}

/// Executes the fields command.
pub fn execute(ctx: &CommandContext, fields: &[FieldConfig]) -> Result<()> {
    if ctx.json_output {
        let output = format_fields_json(fields)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_fields_table(fields, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}
