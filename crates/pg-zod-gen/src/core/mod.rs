//! Core types shared by the mapping engine.
//!
//! - [`schema`]: column metadata, field entries, per-table results
//! - [`enums`]: enum type registry
//! - [`expr`]: schema expression tree and literals
//! - [`identifier`]: field-name/label transforms and table-name validation

pub mod enums;
pub mod expr;
pub mod identifier;
pub mod schema;

pub use enums::EnumRegistry;
pub use expr::{Helper, Literal, SchemaExpr};
pub use identifier::{to_field_name, to_readable_label, validate_table_name};
pub use schema::{ColumnMetadata, EnumRow, FieldEntry, TableSchemaResult};
