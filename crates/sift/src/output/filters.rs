//! Filter output formatting (parse, normalize, validate).

use owo_colors::OwoColorize;
use serde::Serialize;
use sift_core::models::{Filter, FilterValue};
use sift_core::{Operator, Params};

use crate::commands::parse::UnknownParam;

use super::helpers::{format_filter_value, header_line, truncate_str};

/// JSON output structure for a single parsed filter.
#[derive(Serialize)]
pub struct FilterOutput<'a> {
    pub field: &'a str,
    pub operator: Operator,
    pub label: &'static str,
    pub value: &'a FilterValue,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub always_on: bool,
}

impl<'a> FilterOutput<'a> {
    fn new(filter: &'a Filter<'_>) -> Self {
        Self {
            field: &filter.field,
            operator: filter.operator,
            label: filter.operator.label(),
            value: &filter.value,
            always_on: filter.config().always_on(),
        }
    }
}

/// JSON output structure for the parse command.
#[derive(Serialize)]
pub struct ParseOutput<'a> {
    pub filters: Vec<FilterOutput<'a>>,
    pub remaining: &'a Params,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub unknown: &'a [UnknownParam],
}

/// Formats parsed filters as JSON.
pub fn format_parse_json(
    filters: &[Filter<'_>],
    remaining: &Params,
    unknown: &[UnknownParam],
) -> Result<String, serde_json::Error> {
    let output = ParseOutput {
        filters: filters.iter().map(FilterOutput::new).collect(),
        remaining,
        unknown,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats parsed filters as a table.
pub fn format_parse_table(
    filters: &[Filter<'_>],
    remaining: &Params,
    unknown: &[UnknownParam],
    use_colors: bool,
) -> String {
    let mut output = String::new();

    if filters.is_empty() {
        output.push_str("No filters matched.\n");
    } else {
        let header = format!("{:<20} {:<10} {}", "Field", "Operator", "Value");
        output.push_str(&header_line(&header, use_colors));

        for filter in filters {
            let field = truncate_str(&filter.field, 20);
            let value = truncate_str(&format_filter_value(&filter.value), 50);
            let operator = if use_colors {
                format!("{:<10}", filter.operator.symbol()).cyan().to_string()
            } else {
                format!("{:<10}", filter.operator.symbol())
            };
            output.push_str(&format!("{:<20} {} {}\n", field, operator, value));
        }
    }

    let passthrough: Vec<_> = remaining
        .pairs()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    if !passthrough.is_empty() {
        output.push_str(&format!("\nPassed through: {}\n", passthrough.join("&")));
    }

    for param in unknown {
        let line = match &param.suggestion {
            Some(s) => format!("Unrecognized: {} (did you mean '{}'?)", param.key, s),
            None => format!("Unrecognized: {}", param.key),
        };
        if use_colors {
            output.push_str(&format!("{}\n", line.yellow()));
        } else {
            output.push_str(&line);
            output.push('\n');
        }
    }

    output
}

/// JSON output structure for the normalize command.
#[derive(Serialize)]
pub struct NormalizeOutput<'a> {
    pub query: &'a str,
    pub params: &'a Params,
    pub filters: usize,
}

/// Formats a normalized query string as JSON.
pub fn format_normalize_json(
    query: &str,
    params: &Params,
    filters: usize,
) -> Result<String, serde_json::Error> {
    let output = NormalizeOutput {
        query,
        params,
        filters,
    };

    serde_json::to_string_pretty(&output)
}

/// JSON output structure for a successful validation.
#[derive(Serialize)]
pub struct ValidOutput {
    pub valid: bool,
    pub filters: usize,
}

/// Formats a successful validation as JSON.
pub fn format_valid_json(filters: usize) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ValidOutput {
        valid: true,
        filters,
    })
}

/// Formats a successful validation for humans.
pub fn format_valid_text(filters: usize, use_colors: bool) -> String {
    let noun = if filters == 1 { "filter" } else { "filters" };
    let status = if use_colors {
        "valid".green().to_string()
    } else {
        "valid".to_string()
    };
    format!("{filters} {noun} {status}\n")
}
