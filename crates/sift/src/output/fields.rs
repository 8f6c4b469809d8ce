//! Field and operator catalogue output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use sift_core::models::{FieldConfig, FieldType, FilterValue, SelectOption};
use sift_core::{Arity, Operator};

use super::helpers::{format_filter_value, format_flag, header_line, truncate_str};

/// JSON output structure for fields list command.
#[derive(Serialize)]
pub struct FieldsListOutput<'a> {
    pub fields: Vec<FieldOutput<'a>>,
}

/// JSON output structure for a single field.
#[derive(Serialize)]
pub struct FieldOutput<'a> {
    pub field: &'a str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: &'a str,
    pub param: &'a str,
    pub query_field: &'a str,
    pub operators: &'a [Operator],
    pub default_operator: Operator,
    #[serde(skip_serializing_if = "FilterValue::is_empty")]
    pub default_value: &'a FilterValue,
    pub always_on: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

/// Formats fields as JSON.
pub fn format_fields_json(fields: &[FieldConfig]) -> Result<String, serde_json::Error> {
    let fields_output: Vec<FieldOutput> = fields
        .iter()
        .map(|f| FieldOutput {
            field: f.field(),
            field_type: f.field_type(),
            label: f.label(),
            param: f.param_key(),
            query_field: f.query_field(),
            operators: f.operators(),
            default_operator: f.default_operator(),
            default_value: f.default_value(),
            always_on: f.always_on(),
            options: f.options().map(|o| o.resolve()),
        })
        .collect();

    let output = FieldsListOutput {
        fields: fields_output,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats fields as a table.
pub fn format_fields_table(fields: &[FieldConfig], use_colors: bool) -> String {
    if fields.is_empty() {
        return "No fields configured.\n".to_string();
    }

    let mut output = String::new();

    let header = format!(
        "{:<16} {:<14} {:<16} {:<7} {}",
        "Field", "Type", "Param", "Always", "Operators"
    );
    output.push_str(&header_line(&header, use_colors));

    for field in fields {
        let name = truncate_str(field.field(), 16);
        let param = truncate_str(field.param_key(), 16);
        let operators: Vec<String> = field
            .operators()
            .iter()
            .map(|op| {
                if *op == field.default_operator() {
                    format!("{op}*")
                } else {
                    op.to_string()
                }
            })
            .collect();
        let always = format!("{:<7}", format_flag(field.always_on(), false));
        let always = if use_colors && field.always_on() {
            always.green().to_string()
        } else {
            always
        };

        output.push_str(&format!(
            "{:<16} {:<14} {:<16} {} {}\n",
            name,
            field.field_type().name(),
            param,
            always,
            operators.join(" ")
        ));

        if !field.default_value().is_empty() {
            output.push_str(&format!(
                "{:<16} default: {}\n",
                "",
                format_filter_value(field.default_value())
            ));
        }
    }

    output
}

/// JSON output structure for one operator.
#[derive(Serialize)]
pub struct OperatorOutput {
    pub symbol: &'static str,
    pub label: &'static str,
    pub arity: Arity,
    pub array: bool,
    pub pattern: bool,
}

/// Formats the operator catalogue as JSON.
pub fn format_operators_json(operators: &[Operator]) -> Result<String, serde_json::Error> {
    let output: Vec<OperatorOutput> = operators
        .iter()
        .map(|op| OperatorOutput {
            symbol: op.symbol(),
            label: op.label(),
            arity: op.arity(),
            array: op.is_array(),
            pattern: op.is_pattern(),
        })
        .collect();

    serde_json::to_string_pretty(&serde_json::json!({ "operators": output }))
}

/// Formats the operator catalogue as a table.
pub fn format_operators_table(operators: &[Operator], use_colors: bool) -> String {
    let mut output = String::new();

    let header = format!("{:<10} {:<8} {}", "Symbol", "Arity", "Label");
    output.push_str(&header_line(&header, use_colors));

    for op in operators {
        let arity = match op.arity() {
            Arity::Single => "single",
            Arity::Multi => "multi",
        };
        let symbol = format!("{:<10}", op.symbol());
        let symbol = if use_colors {
            symbol.cyan().to_string()
        } else {
            symbol
        };
        output.push_str(&format!("{} {:<8} {}\n", symbol, arity, op.label()));
    }

    output
}
