//! Output formatting utilities for the sift CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by what is being shown:
//!
//! - [`filters`] - Parsed filters (parse, normalize, validate)
//! - [`fields`] - Field configurations and the operator catalogue
//! - [`records`] - Records returned by `apply`
//! - [`helpers`] - Common formatting utilities (truncation, cells, headers)

mod fields;
mod filters;
pub mod helpers;
mod records;

// Filters
pub use filters::{
    format_normalize_json, format_parse_json, format_parse_table, format_valid_json,
    format_valid_text,
};

// Fields and operators
pub use fields::{
    format_fields_json, format_fields_table, format_operators_json, format_operators_table,
};

// Records
pub use records::{format_records_json, format_records_table, ApplyResult};
