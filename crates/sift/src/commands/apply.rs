//! Apply command implementation.
//!
//! Runs a query string against a JSON array of records through the
//! in-memory adapter and prints the matching page.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::Value as Json;
use sift_core::models::FieldConfig;
use sift_core::{parse, Params};
use sift_query::{
    ApplyOptions as QueryOptions, Condition, FieldTypes, MemoryAdapter, QueryBuilder, RecordQuery,
};

use super::config::Config;
use super::{CommandContext, Result};
use crate::output::{format_records_json, format_records_table, ApplyResult};

/// Options for the apply command.
#[derive(Debug, Default)]
pub struct ApplyOptions {
    /// The query string.
    pub query: String,
    /// Records file, or "-" for stdin.
    pub data: PathBuf,
    /// Page size.
    pub limit: Option<usize>,
    /// Rows to skip.
    pub offset: Option<usize>,
    /// Fields that may be filtered on.
    pub allow: Vec<String>,
    /// Decode parameters without field configurations.
    pub raw: bool,
    /// Sort field.
    pub sort: Option<String>,
    /// Sort descending.
    pub desc: bool,
    /// Projected fields.
    pub select: Vec<String>,
}

/// The page produced by [`apply`].
#[derive(Debug)]
pub struct Applied {
    /// Conditions that reached the adapter.
    pub conditions: Vec<Condition>,
    /// Matching records before pagination.
    pub total: usize,
    /// Effective page size.
    pub limit: Option<usize>,
    /// Rows skipped.
    pub offset: Option<usize>,
    /// The page of rows.
    pub rows: Vec<Json>,
}

/// Reads a JSON array of records.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array.
pub fn load_records(path: &Path) -> Result<Vec<Json>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };

    let records: Vec<Json> = serde_json::from_str(&content)?;
    tracing::debug!(count = records.len(), "loaded records");
    Ok(records)
}

/// Filters, sorts and pages `records`.
///
/// In raw mode `fields` is ignored and every well-formed `key=op.value`
/// parameter is applied; malformed ones are skipped. Otherwise the query is parsed against `fields`,
/// validated with the config's limits and cast by field type.
///
/// # Errors
///
/// Returns an error if the query string is malformed, a filter fails
/// validation, or a value cannot be cast to its field's type.
pub fn apply(
    records: &[Json],
    fields: &[FieldConfig],
    config: &Config,
    opts: &ApplyOptions,
) -> Result<Applied> {
    let params = Params::from_query_string(&opts.query)?;

    let allowed = if opts.allow.is_empty() {
        config.query.allowed_fields.clone()
    } else {
        Some(opts.allow.clone())
    };
    let mut options = QueryOptions::new();
    if let Some(allowed) = allowed.as_deref() {
        options = options.allowed_fields(allowed);
    }

    let builder = QueryBuilder::new(MemoryAdapter::new());
    let mut query = RecordQuery::new(records);
    if let Some(sort) = &opts.sort {
        query = query.order_by(sort.as_str(), opts.desc);
    }
    if !opts.select.is_empty() {
        query = query.select(&opts.select);
    }

    let query = if opts.raw {
        builder.apply_raw(query, &params, &options)?
    } else {
        let outcome = parse(&params, fields);
        config.validator().validate(&outcome.filters)?;
        let schema = FieldTypes::from_configs(fields);
        builder.apply(query, &outcome.filters, &options.schema(&schema))?
    };

    let limit = opts.limit.or(config.query.default_limit);
    let query = builder.apply_pagination(query, limit, opts.offset);
    tracing::debug!(conditions = query.predicates().len(), ?limit, "query built");

    Ok(Applied {
        conditions: query.predicates().to_vec(),
        total: builder.count(&query),
        limit,
        offset: opts.offset,
        rows: query.rows(),
    })
}

/// Executes the apply command.
///
/// # Errors
///
/// Returns an error if the records cannot be loaded or the query fails.
pub fn execute(
    ctx: &CommandContext,
    fields: &[FieldConfig],
    config: &Config,
    opts: &ApplyOptions,
) -> Result<()> {
    let records = load_records(&opts.data)?;
    let applied = apply(&records, fields, config, opts)?;

    if ctx.verbose {
        for condition in &applied.conditions {
            eprintln!("Condition: {condition}");
        }
    }

    let result = ApplyResult {
        conditions: &applied.conditions,
        total: applied.total,
        limit: applied.limit,
        offset: applied.offset,
        rows: &applied.rows,
    };

    if ctx.json_output {
        let output = format_records_json(&result)?;
        println!("{output}");
    } else if !ctx.quiet {
        print!("{}", format_records_table(&result, ctx.use_colors));
    }

    Ok(())
}
