//! Data model shared by the parser, serializer, validator and query builder.

mod field;
mod filter;
mod value;

pub use field::{
    FieldConfig, FieldConfigBuilder, FieldConfigSet, FieldConfigSpec, FieldType, OptionsSource,
    SelectOption,
};
pub use filter::Filter;
pub use value::FilterValue;
