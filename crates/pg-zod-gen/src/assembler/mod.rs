//! Per-table schema assembly.
//!
//! Each column is decided independently: filter by policy, map the base type,
//! attach the default and optional wrappers. Output order is the identity
//! column first, then everything else by field name (ordinal comparison).
//! When several columns are flagged identity, the last one wins the pinned
//! slot and the earlier ones are sorted with the rest.

use tracing::{debug, warn};

use crate::core::{
    to_field_name, ColumnMetadata, EnumRegistry, FieldEntry, SchemaExpr, TableSchemaResult,
};
use crate::defaults::parse_default;
use crate::error::Result;
use crate::typemap::TypeMapper;

/// Column filtering and mapping policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Skip columns that have a default expression.
    pub exclude_defaults: bool,
    /// Include nullable columns (as optional fields).
    pub include_nullable: bool,
    /// Require numeric fields to be greater than zero.
    pub positive_numbers: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            exclude_defaults: false,
            include_nullable: true,
            positive_numbers: true,
        }
    }
}

/// Assemble the ordered field list for one table.
pub fn assemble_table(
    table: &str,
    columns: &[ColumnMetadata],
    enums: &EnumRegistry,
    options: &AssembleOptions,
) -> Result<TableSchemaResult> {
    let mapper = TypeMapper::new(options.positive_numbers);
    let mut result = TableSchemaResult {
        table: table.to_string(),
        ..Default::default()
    };

    let mut identity: Option<FieldEntry> = None;
    let mut fields = Vec::with_capacity(columns.len());

    for column in columns {
        result.processed += 1;

        if !is_included(column, options) {
            debug!("{}.{}: skipped by policy", table, column.name);
            result.skipped += 1;
            continue;
        }

        let expr = build_expr(&mapper, column, enums, &mut result.warnings)?;
        let entry = FieldEntry {
            field_name: to_field_name(&column.name),
            column_name: column.name.clone(),
            expr,
        };

        if column.is_identity {
            if let Some(previous) = identity.replace(entry) {
                debug!(
                    "{}: identity column {} replaced by {}",
                    table, previous.column_name, column.name
                );
                fields.push(previous);
            }
        } else {
            fields.push(entry);
        }
    }

    fields.sort_by(|a, b| a.field_name.cmp(&b.field_name));

    result.entries = identity.into_iter().chain(fields).collect();

    debug!(
        "{}: {} fields from {} columns ({} skipped, {} warnings)",
        table,
        result.entries.len(),
        result.processed,
        result.skipped,
        result.warnings.len()
    );

    Ok(result)
}

fn is_included(column: &ColumnMetadata, options: &AssembleOptions) -> bool {
    if options.exclude_defaults && column.has_default() {
        return false;
    }
    !column.nullable || options.include_nullable
}

/// Compose base type, default and optional wrappers for one column.
fn build_expr(
    mapper: &TypeMapper,
    column: &ColumnMetadata,
    enums: &EnumRegistry,
    warnings: &mut Vec<String>,
) -> Result<SchemaExpr> {
    let element_type = column.element_type();
    let mapping = mapper.map_type(
        element_type,
        enums,
        &column.name,
        &column.underlying_type_name,
        column.max_length,
    )?;

    if let Some(message) = mapping.warning {
        warn!("{}", message);
        warnings.push(message);
    }

    let mut expr = if column.is_array() {
        SchemaExpr::array(mapping.expr)
    } else {
        mapping.expr
    };

    let parsed_default = match column.raw_default.as_deref() {
        Some(raw) => match parse_default(raw, &column.sql_type, enums) {
            Ok(literal) => Some(literal),
            Err(e) => {
                let message = format!("{} (column '{}')", e, column.name);
                warn!("{}", message);
                warnings.push(message);
                None
            }
        },
        None => None,
    };

    // Enum implied defaults only apply to scalar columns without a default.
    let implied = if column.is_array() || column.raw_default.is_some() {
        None
    } else {
        mapping.implied_default
    };

    if let Some(literal) = parsed_default.or(implied) {
        expr = expr.with_default(literal);
    }

    if column.nullable {
        expr = expr.optional();
    }

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EnumRow, Literal};

    fn enums() -> EnumRegistry {
        EnumRegistry::build(vec![
            EnumRow::new("status", "active", 1.0),
            EnumRow::new("status", "inactive", 2.0),
        ])
    }

    fn assemble(columns: &[ColumnMetadata], options: AssembleOptions) -> TableSchemaResult {
        assemble_table("t", columns, &enums(), &options).unwrap()
    }

    fn number(label: &str) -> SchemaExpr {
        SchemaExpr::Number {
            label: label.into(),
            positive: true,
        }
    }

    #[test]
    fn test_users_scenario() {
        let columns = vec![
            ColumnMetadata::new("id", "integer").identity(),
            ColumnMetadata::new("email", "character varying"),
            ColumnMetadata::new("created_at", "timestamp with time zone").with_default("now()"),
        ];
        let result = assemble(&columns, AssembleOptions::default());

        assert_eq!(result.field_names(), vec!["id", "createdAt", "email"]);
        assert_eq!(result.entries[0].expr, number(""));
        assert_eq!(
            result.entries[1].expr,
            SchemaExpr::UtcDate.with_default(Literal::Now)
        );
        assert_eq!(
            result.entries[2].expr,
            SchemaExpr::NonEmptyString {
                label: "Email".into()
            }
        );
        assert_eq!(result.processed, 3);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_identity_pinned_first_rest_sorted() {
        let columns = vec![
            ColumnMetadata::new("mike", "text"),
            ColumnMetadata::new("zeta", "integer").identity(),
            ColumnMetadata::new("alpha", "text"),
        ];
        let result = assemble(&columns, AssembleOptions::default());
        assert_eq!(result.field_names(), vec!["zeta", "alpha", "mike"]);
    }

    #[test]
    fn test_last_identity_wins() {
        let columns = vec![
            ColumnMetadata::new("b_id", "integer").identity(),
            ColumnMetadata::new("a_id", "integer").identity(),
            ColumnMetadata::new("c", "text"),
        ];
        let result = assemble(&columns, AssembleOptions::default());
        assert_eq!(result.field_names(), vec!["aId", "bId", "c"]);
    }

    #[test]
    fn test_ordinal_sort_puts_uppercase_first() {
        let columns = vec![
            ColumnMetadata::new("b", "text"),
            ColumnMetadata::new("Z", "text"),
            ColumnMetadata::new("a", "text"),
        ];
        let result = assemble(&columns, AssembleOptions::default());
        assert_eq!(result.field_names(), vec!["Z", "a", "b"]);
    }

    #[test]
    fn test_nullable_excluded_when_policy_off() {
        let columns = vec![
            ColumnMetadata::new("id", "integer").identity(),
            ColumnMetadata::new("nickname", "text").nullable(true),
        ];
        let options = AssembleOptions {
            include_nullable: false,
            ..Default::default()
        };
        let result = assemble(&columns, options);
        assert_eq!(result.field_names(), vec!["id"]);
        assert_eq!(result.processed, 2);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_nullable_included_as_optional() {
        let columns = vec![ColumnMetadata::new("nickname", "text").nullable(true)];
        let result = assemble(&columns, AssembleOptions::default());
        assert_eq!(
            result.entries[0].expr,
            SchemaExpr::NonEmptyString {
                label: "Nickname".into()
            }
            .optional()
        );
    }

    #[test]
    fn test_exclude_defaults() {
        let columns = vec![
            ColumnMetadata::new("id", "integer").identity(),
            ColumnMetadata::new("created_at", "timestamp with time zone").with_default("now()"),
        ];
        let options = AssembleOptions {
            exclude_defaults: true,
            ..Default::default()
        };
        let result = assemble(&columns, options);
        assert_eq!(result.field_names(), vec!["id"]);
    }

    #[test]
    fn test_enum_default_explicit_and_implied() {
        let columns = vec![
            ColumnMetadata::new("state", "USER-DEFINED")
                .with_underlying_type("status")
                .with_default("'inactive'::status"),
            ColumnMetadata::new("status", "USER-DEFINED").with_underlying_type("status"),
        ];
        let result = assemble(&columns, AssembleOptions::default());
        let labels = vec!["active".to_string(), "inactive".to_string()];

        assert_eq!(
            result.entry("state").unwrap().expr,
            SchemaExpr::Enum {
                labels: labels.clone()
            }
            .with_default(Literal::Str("inactive".into()))
        );
        assert_eq!(
            result.entry("status").unwrap().expr,
            SchemaExpr::Enum { labels }.with_default(Literal::Str("active".into()))
        );
    }

    #[test]
    fn test_enum_explicit_default_active() {
        let columns = vec![ColumnMetadata::new("status", "USER-DEFINED")
            .with_underlying_type("status")
            .with_default("'active'::status")];
        let result = assemble(&columns, AssembleOptions::default());
        assert_eq!(
            result.entries[0].expr.default_literal(),
            Some(&Literal::Str("active".into()))
        );
    }

    #[test]
    fn test_unparseable_default_warns_and_leaves_unwrapped() {
        let columns =
            vec![ColumnMetadata::new("id", "integer").with_default("nextval('t_id_seq'::regclass)")];
        let result = assemble(&columns, AssembleOptions::default());
        assert_eq!(result.entries[0].expr, number(""));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("nextval"));
    }

    #[test]
    fn test_unparseable_enum_default_gets_no_implied_label() {
        let columns = vec![ColumnMetadata::new("state", "USER-DEFINED")
            .with_underlying_type("status")
            .with_default("'inactive'::billing.status")];
        let result = assemble(&columns, AssembleOptions::default());

        assert_eq!(
            result.entries[0].expr,
            SchemaExpr::Enum {
                labels: vec!["active".to_string(), "inactive".to_string()]
            }
        );
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("billing.status"));
    }

    #[test]
    fn test_array_column() {
        let columns = vec![
            ColumnMetadata::new("tags", "text[]"),
            ColumnMetadata::new("moods", "status[]").with_underlying_type("status"),
        ];
        let result = assemble(&columns, AssembleOptions::default());
        assert_eq!(
            result.entry("tags").unwrap().expr,
            SchemaExpr::array(SchemaExpr::NonEmptyString {
                label: "Tags".into()
            })
        );
        assert_eq!(
            result.entry("moods").unwrap().expr,
            SchemaExpr::array(SchemaExpr::Enum {
                labels: vec!["active".into(), "inactive".into()]
            })
        );
    }

    #[test]
    fn test_numeric_columns_carry_positive_constraint() {
        let columns = vec![
            ColumnMetadata::new("order_count", "bigint"),
            ColumnMetadata::new("price", "numeric"),
        ];
        let result = assemble(&columns, AssembleOptions::default());
        assert_eq!(result.entry("orderCount").unwrap().expr, number("Order Count"));
        assert_eq!(result.entry("price").unwrap().expr, number("Price"));
    }

    #[test]
    fn test_unsupported_type_falls_back_with_warning() {
        let columns = vec![ColumnMetadata::new("payload", "jsonb")];
        let result = assemble(&columns, AssembleOptions::default());
        assert!(result.entries[0].expr.is_any());
        assert_eq!(result.warnings.len(), 1);
    }
}
