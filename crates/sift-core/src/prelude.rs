//! Prelude module for convenient imports.
//!
//! Re-exports the types most callers need to describe fields, parse and
//! serialize parameters, and validate filters.
//!
//! # Example
//!
//! ```
//! use sift_core::prelude::*;
//!
//! // Now you have access to:
//! // - FieldConfig, FieldType, OptionsSource (field descriptions)
//! // - Filter, FilterValue (active filters)
//! // - Operator, Params (grammar and wire format)
//! // - parse, serialize, validate (the pipeline stages)
//! ```

// Field configuration
pub use crate::models::{FieldConfig, FieldConfigSet, FieldType, OptionsSource, SelectOption};

// Active filters
pub use crate::models::{Filter, FilterValue};

// Grammar and wire format
pub use crate::operator::{Arity, Operator};
pub use crate::params::Params;

// Pipeline stages
pub use crate::parser::{parse, ParseOutcome};
pub use crate::serializer::{serialize, serialize_into};
pub use crate::validator::{validate, Validator};

// Error types
pub use crate::error::{ConfigError, ValidationError};
