//! Table and column metadata types.

use serde::{Deserialize, Serialize};

use super::expr::SchemaExpr;

/// Marker PostgreSQL's `format_type` appends to array types.
const ARRAY_MARKER: &str = "[]";

/// Column metadata as read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name (snake_case).
    pub name: String,

    /// SQL type as formatted by the catalog (e.g. "integer", "text[]").
    pub sql_type: String,

    /// Whether the column allows NULL.
    pub nullable: bool,

    /// Raw default expression text, if any.
    pub raw_default: Option<String>,

    /// Name of the underlying (element) type, used for enum detection.
    pub underlying_type_name: String,

    /// Whether the column is database-generated.
    pub is_identity: bool,

    /// Declared length for character types.
    pub max_length: Option<i32>,
}

impl ColumnMetadata {
    /// Create a non-null, non-identity column with no default.
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        let sql_type = sql_type.into();
        let underlying_type_name = sql_type.trim_end_matches(ARRAY_MARKER).to_string();
        Self {
            name: name.into(),
            sql_type,
            nullable: false,
            raw_default: None,
            underlying_type_name,
            is_identity: false,
            max_length: None,
        }
    }

    /// Set nullability.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the raw default expression.
    pub fn with_default(mut self, raw: impl Into<String>) -> Self {
        self.raw_default = Some(raw.into());
        self
    }

    /// Mark as identity column.
    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self
    }

    /// Set the underlying type name.
    pub fn with_underlying_type(mut self, name: impl Into<String>) -> Self {
        self.underlying_type_name = name.into();
        self
    }

    /// Set the declared character length.
    pub fn with_max_length(mut self, len: i32) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Check if the column has a default expression.
    pub fn has_default(&self) -> bool {
        self.raw_default.is_some()
    }

    /// Check if the SQL type is an array type.
    pub fn is_array(&self) -> bool {
        self.sql_type.trim_end().ends_with(ARRAY_MARKER)
    }

    /// SQL type with the trailing array marker removed.
    pub fn element_type(&self) -> &str {
        let trimmed = self.sql_type.trim_end();
        trimmed.strip_suffix(ARRAY_MARKER).unwrap_or(trimmed)
    }
}

/// One enum label row as fetched from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumRow {
    /// Enum type name.
    pub type_name: String,

    /// Label text.
    pub label: String,

    /// Declaration sort order.
    pub sort_order: f32,
}

impl EnumRow {
    pub fn new(type_name: impl Into<String>, label: impl Into<String>, sort_order: f32) -> Self {
        Self {
            type_name: type_name.into(),
            label: label.into(),
            sort_order,
        }
    }
}

/// A generated schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    /// camelCase field name.
    pub field_name: String,

    /// Source column name.
    pub column_name: String,

    /// Fully composed schema expression.
    pub expr: SchemaExpr,
}

/// Assembled schema for one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSchemaResult {
    /// Table name.
    pub table: String,

    /// Ordered field entries (identity first, then by field name).
    pub entries: Vec<FieldEntry>,

    /// Number of columns examined.
    pub processed: usize,

    /// Number of columns filtered out by policy.
    pub skipped: usize,

    /// Non-fatal diagnostics (unparseable defaults, unsupported types).
    pub warnings: Vec<String>,
}

impl TableSchemaResult {
    /// Field names in output order.
    pub fn field_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.field_name.as_str()).collect()
    }

    /// Look up an entry by field name.
    pub fn entry(&self, field_name: &str) -> Option<&FieldEntry> {
        self.entries.iter().find(|e| e.field_name == field_name)
    }
}
