//! Query building for sift filters.
//!
//! A [`QueryBuilder`] turns active filters (or raw parameters) into
//! backend-neutral [`Condition`]s, optionally casts them through a
//! [`Schema`], and applies them to a backend queryable through an
//! [`Adapter`]. [`MemoryAdapter`] is the reference adapter over in-memory
//! JSON records.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sift_core::prelude::*;
//! use sift_query::{ApplyOptions, FieldTypes, MemoryAdapter, QueryBuilder, RecordQuery};
//!
//! let fields = vec![FieldConfig::builder("age", FieldType::Number).build().unwrap()];
//! let records = vec![json!({"age": 36}), json!({"age": 17})];
//!
//! let params = Params::from_query_string("age=gte.18").unwrap();
//! let schema = FieldTypes::from_configs(&fields);
//! let options = ApplyOptions::new().config(&fields).schema(&schema);
//!
//! let builder = QueryBuilder::new(MemoryAdapter::new());
//! let query = builder.apply(RecordQuery::new(&records), &params, &options).unwrap();
//! assert_eq!(query.rows(), vec![json!({"age": 36})]);
//! ```

pub mod adapter;
pub mod builder;
pub mod condition;
pub mod error;
pub mod memory;
pub mod schema;

pub use adapter::{escape_like, Adapter};
pub use builder::{ApplyOptions, FilterSource, QueryBuilder};
pub use condition::{Condition, Value};
pub use error::{CastError, QueryError, QueryResult};
pub use memory::{MemoryAdapter, RecordQuery};
pub use schema::{CastType, FieldTypes, Schema};
