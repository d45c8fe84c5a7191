//! Serialization of schema expressions into source text.
//!
//! The mapping engine only builds [`SchemaExpr`] trees. A [`SchemaRenderer`]
//! owns everything about the target schema library: construct syntax, literal
//! syntax, file layout and the auxiliary helper file.

mod zod;

pub use zod::ZodRenderer;

use crate::core::{FieldEntry, Literal, SchemaExpr, TableSchemaResult};

/// Target schema-definition language.
pub trait SchemaRenderer: Send + Sync {
    /// Short name of the target (e.g. "zod").
    fn name(&self) -> &str;

    /// Render a schema expression.
    fn render_expr(&self, expr: &SchemaExpr) -> String;

    /// Render a default-value literal.
    fn render_literal(&self, literal: &Literal) -> String;

    /// Render the complete source file for one table.
    fn render_table(&self, result: &TableSchemaResult) -> String;

    /// Output file name for a table.
    fn table_file_name(&self, table: &str) -> String;

    /// File name of the auxiliary helper file.
    fn helpers_file_name(&self) -> &str;

    /// Source of the auxiliary helper file.
    fn helpers_source(&self) -> &str;
}

impl FieldEntry {
    /// Rendered schema expression for this field.
    pub fn expression(&self, renderer: &dyn SchemaRenderer) -> String {
        renderer.render_expr(&self.expr)
    }
}
