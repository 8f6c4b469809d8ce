//! Filter grammar and codecs for URL-encoded filters.
//!
//! This crate moves user-entered filter criteria between a compact
//! query-string encoding and structured [`Filter`](models::Filter) values
//! bound to static [`FieldConfig`](models::FieldConfig) descriptions.
//!
//! # Quick Start
//!
//! ```
//! use sift_core::prelude::*;
//!
//! let fields = vec![
//!     FieldConfig::builder("status", FieldType::Select)
//!         .operators([Operator::Eq, Operator::In])
//!         .options(OptionsSource::from_values(["open", "closed"]))
//!         .build()
//!         .unwrap(),
//! ];
//!
//! let params = Params::from_query_string("status=in.(open,closed)&page=2").unwrap();
//! let outcome = parse(&params, &fields);
//! assert_eq!(outcome.filters.len(), 1);
//! assert_eq!(outcome.remaining.get("page"), Some("2"));
//!
//! validate(&outcome.filters).unwrap();
//! let encoded = serialize(&outcome.filters);
//! assert_eq!(encoded.get("status"), Some("in.(open,closed)"));
//! ```

pub mod error;
pub mod models;
pub mod operator;
pub mod params;
pub mod parser;
pub mod prelude;
pub mod serializer;
pub mod validator;

pub use error::{ConfigError, ValidationError};
pub use operator::{Arity, Operator};
pub use params::Params;
pub use parser::{parse, ParseOutcome};
pub use serializer::{serialize, serialize_into};
pub use validator::{validate, Validator};
