//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use serde_json::Value as Json;
use sift_core::models::FilterValue;

/// Truncates a string to a maximum length in characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Renders a table header line, dimmed when colors are on.
pub fn header_line(header: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", header.dimmed())
    } else {
        format!("{header}\n")
    }
}

/// Formats a filter value for display.
pub fn format_filter_value(value: &FilterValue) -> String {
    match value {
        FilterValue::Null => "-".to_string(),
        FilterValue::List(items) if items.is_empty() => "[]".to_string(),
        FilterValue::List(items) => items.join(", "),
        FilterValue::Range(lower, upper) => format!(
            "{} .. {}",
            lower.as_deref().unwrap_or("*"),
            upper.as_deref().unwrap_or("*")
        ),
        other => other.to_string(),
    }
}

/// Formats a JSON cell: strings bare, everything else compact JSON.
pub fn format_json_cell(value: Option<&Json>) -> String {
    match value {
        None | Some(Json::Null) => String::new(),
        Some(Json::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Formats a yes/no flag, highlighted when set.
pub fn format_flag(set: bool, use_colors: bool) -> String {
    match (set, use_colors) {
        (true, true) => "yes".green().to_string(),
        (true, false) => "yes".to_string(),
        (false, _) => String::new(),
    }
}
