//! Record output formatting (apply command).

use serde::Serialize;
use serde_json::Value as Json;
use sift_query::Condition;

use super::helpers::{format_json_cell, header_line, truncate_str};

/// Widest a record table column gets.
const MAX_COLUMN_WIDTH: usize = 30;

/// Result of applying a query to a record set.
pub struct ApplyResult<'a> {
    /// Conditions that reached the adapter.
    pub conditions: &'a [Condition],
    /// Matching records before pagination.
    pub total: usize,
    /// Page size, if any.
    pub limit: Option<usize>,
    /// Rows skipped, if any.
    pub offset: Option<usize>,
    /// The page of rows.
    pub rows: &'a [Json],
}

/// JSON output structure for the apply command.
#[derive(Serialize)]
pub struct ApplyOutput<'a> {
    pub total: usize,
    pub returned: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    pub conditions: &'a [Condition],
    pub rows: &'a [Json],
}

/// Formats an apply result as JSON.
pub fn format_records_json(result: &ApplyResult<'_>) -> Result<String, serde_json::Error> {
    let output = ApplyOutput {
        total: result.total,
        returned: result.rows.len(),
        limit: result.limit,
        offset: result.offset,
        conditions: result.conditions,
        rows: result.rows,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats an apply result as a table, one column per record key.
pub fn format_records_table(result: &ApplyResult<'_>, use_colors: bool) -> String {
    if result.rows.is_empty() {
        return format!("No records matched ({} total).\n", result.total);
    }

    let columns = columns(result.rows);
    let mut output = String::new();

    if columns.is_empty() {
        // Not objects: one value per line.
        for row in result.rows {
            output.push_str(&format!("{row}\n"));
        }
    } else {
        let cells: Vec<Vec<String>> = result
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| truncate_str(&format_json_cell(row.get(col)), MAX_COLUMN_WIDTH))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(col.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect();

        let header = join_padded(columns.iter().map(String::as_str), &widths);
        output.push_str(&header_line(&header, use_colors));
        for row in &cells {
            output.push_str(&join_padded(row.iter().map(String::as_str), &widths));
            output.push('\n');
        }
    }

    output.push_str(&format!(
        "\nShowing {} of {} records\n",
        result.rows.len(),
        result.total
    ));
    output
}

/// Object keys across all rows, in first-seen order.
fn columns(rows: &[Json]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        if let Json::Object(map) = row {
            for key in map.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

fn join_padded<'s>(cells: impl Iterator<Item = &'s str>, widths: &[usize]) -> String {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    line.join("  ").trim_end().to_string()
}
