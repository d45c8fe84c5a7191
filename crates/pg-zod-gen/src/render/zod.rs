//! Zod (TypeScript) renderer.

use chrono::{Datelike, Timelike};

use super::SchemaRenderer;
use crate::core::{to_field_name, Helper, Literal, SchemaExpr, TableSchemaResult};

const HELPERS_FILE: &str = "zod-helpers.ts";
const HELPERS_MODULE: &str = "./zod-helpers";
const HELPERS_SOURCE: &str = include_str!("../../templates/zod-helpers.ts");

/// Renders schemas for the Zod validation library.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZodRenderer;

impl ZodRenderer {
    pub fn new() -> Self {
        Self
    }

    fn message(text: String) -> String {
        format!("{{ message: {} }}", quote(&text))
    }
}

impl SchemaRenderer for ZodRenderer {
    fn name(&self) -> &str {
        "zod"
    }

    fn render_expr(&self, expr: &SchemaExpr) -> String {
        match expr {
            SchemaExpr::Enum { labels } => {
                let labels: Vec<String> = labels.iter().map(|l| quote(l)).collect();
                format!("z.enum([{}])", labels.join(", "))
            }
            SchemaExpr::FixedString { length, label } => format!(
                "z.string().length({}, {})",
                length,
                Self::message(format!("{} must be exactly {} characters", label, length))
            ),
            SchemaExpr::NonEmptyString { label } => format!(
                "z.string().min(1, {})",
                Self::message(format!("{} is required", label))
            ),
            SchemaExpr::Number {
                label,
                positive: true,
            } => format!(
                "z.number().gt(0, {})",
                Self::message(format!("{} must be greater than zero", label))
            ),
            SchemaExpr::Number {
                positive: false, ..
            } => "z.number()".to_string(),
            SchemaExpr::Boolean => "z.boolean()".to_string(),
            SchemaExpr::UtcDate => "utcDate".to_string(),
            SchemaExpr::DateOnly => "dateOnly".to_string(),
            SchemaExpr::Uuid { label } => format!("uuidString({})", quote(label)),
            SchemaExpr::Any => "z.any()".to_string(),
            SchemaExpr::Array(inner) => format!("z.array({})", self.render_expr(inner)),
            // Midnight UTC today, so the default passes the dateOnly check.
            SchemaExpr::Default(inner, Literal::Now) if **inner == SchemaExpr::DateOnly => format!(
                "{}.default(() => new Date(new Date().setUTCHours(0, 0, 0, 0)))",
                self.render_expr(inner)
            ),
            SchemaExpr::Default(inner, literal) => format!(
                "{}.default({})",
                self.render_expr(inner),
                self.render_literal(literal)
            ),
            SchemaExpr::Optional(inner) => format!("{}.optional()", self.render_expr(inner)),
        }
    }

    fn render_literal(&self, literal: &Literal) -> String {
        match literal {
            Literal::Number(text) => text.clone(),
            Literal::Bool(value) => value.to_string(),
            Literal::Str(text) => quote(text),
            Literal::Now => "() => new Date()".to_string(),
            Literal::Date(date) => format!(
                "new Date(Date.UTC({}, {}, {}))",
                date.year(),
                date.month0(),
                date.day()
            ),
            Literal::Timestamp(ts) => format!(
                "new Date(Date.UTC({}, {}, {}, {}, {}, {}, {}))",
                ts.year(),
                ts.month0(),
                ts.day(),
                ts.hour(),
                ts.minute(),
                ts.second(),
                ts.nanosecond() / 1_000_000
            ),
        }
    }

    fn render_table(&self, result: &TableSchemaResult) -> String {
        let mut helpers = Vec::new();
        for entry in &result.entries {
            entry.expr.helpers(&mut helpers);
        }
        helpers.sort();
        helpers.dedup();

        let mut out = String::new();
        out.push_str(&format!(
            "// Generated by pg-zod-gen from table \"{}\". Do not edit.\n",
            result.table
        ));
        out.push_str("import { z } from \"zod\";\n");
        if !helpers.is_empty() {
            let names: Vec<&str> = helpers.iter().map(|h| helper_name(*h)).collect();
            out.push_str(&format!(
                "import {{ {} }} from \"{}\";\n",
                names.join(", "),
                HELPERS_MODULE
            ));
        }
        out.push('\n');

        let schema_name = format!("{}Schema", camel_case_table(&result.table));
        out.push_str(&format!("export const {} = z.object({{\n", schema_name));
        for entry in &result.entries {
            out.push_str(&format!(
                "  {}: {},\n",
                property_key(&entry.field_name),
                self.render_expr(&entry.expr)
            ));
        }
        out.push_str("});\n\n");
        out.push_str(&format!(
            "export type {} = z.infer<typeof {}>;\n",
            pascal_case_table(&result.table),
            schema_name
        ));

        out
    }

    fn table_file_name(&self, table: &str) -> String {
        format!("{}.ts", table)
    }

    fn helpers_file_name(&self) -> &str {
        HELPERS_FILE
    }

    fn helpers_source(&self) -> &str {
        HELPERS_SOURCE
    }
}

fn helper_name(helper: Helper) -> &'static str {
    match helper {
        Helper::UtcDate => "utcDate",
        Helper::DateOnly => "dateOnly",
        Helper::Uuid => "uuidString",
    }
}

/// Single-quoted TypeScript string literal.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn property_key(field_name: &str) -> String {
    if is_identifier(field_name) {
        field_name.to_string()
    } else {
        quote(field_name)
    }
}

/// `order-items` -> `orderItems`
fn camel_case_table(table: &str) -> String {
    let camel = to_field_name(&table.replace('-', "_").to_lowercase());
    if camel.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", camel)
    } else {
        camel
    }
}

/// `order_items` -> `OrderItems`
fn pascal_case_table(table: &str) -> String {
    let camel = camel_case_table(table);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => camel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldEntry;
    use chrono::NaiveDate;

    fn render(expr: &SchemaExpr) -> String {
        ZodRenderer::new().render_expr(expr)
    }

    #[test]
    fn test_render_leaves() {
        assert_eq!(
            render(&SchemaExpr::Number {
                label: "Price".into(),
                positive: true
            }),
            "z.number().gt(0, { message: 'Price must be greater than zero' })"
        );
        assert_eq!(
            render(&SchemaExpr::Number {
                label: "Price".into(),
                positive: false
            }),
            "z.number()"
        );
        assert_eq!(
            render(&SchemaExpr::NonEmptyString {
                label: "Email".into()
            }),
            "z.string().min(1, { message: 'Email is required' })"
        );
        assert_eq!(
            render(&SchemaExpr::FixedString {
                length: 2,
                label: "Country Code".into()
            }),
            "z.string().length(2, { message: 'Country Code must be exactly 2 characters' })"
        );
        assert_eq!(render(&SchemaExpr::Boolean), "z.boolean()");
        assert_eq!(render(&SchemaExpr::UtcDate), "utcDate");
        assert_eq!(render(&SchemaExpr::DateOnly), "dateOnly");
        assert_eq!(
            render(&SchemaExpr::Uuid {
                label: "Owner".into()
            }),
            "uuidString('Owner')"
        );
        assert_eq!(render(&SchemaExpr::Any), "z.any()");
    }

    #[test]
    fn test_render_wrappers() {
        let expr = SchemaExpr::Enum {
            labels: vec!["active".into(), "inactive".into()],
        }
        .with_default(Literal::Str("active".into()))
        .optional();
        assert_eq!(
            render(&expr),
            "z.enum(['active', 'inactive']).default('active').optional()"
        );

        let expr = SchemaExpr::array(SchemaExpr::Boolean);
        assert_eq!(render(&expr), "z.array(z.boolean())");
    }

    #[test]
    fn test_date_only_now_default_is_midnight_utc() {
        let expr = SchemaExpr::DateOnly.with_default(Literal::Now);
        assert_eq!(
            render(&expr),
            "dateOnly.default(() => new Date(new Date().setUTCHours(0, 0, 0, 0)))"
        );

        let expr = SchemaExpr::UtcDate.with_default(Literal::Now);
        assert_eq!(render(&expr), "utcDate.default(() => new Date())");
    }

    #[test]
    fn test_render_literals() {
        let renderer = ZodRenderer::new();
        assert_eq!(renderer.render_literal(&Literal::Number("5".into())), "5");
        assert_eq!(renderer.render_literal(&Literal::Bool(false)), "false");
        assert_eq!(
            renderer.render_literal(&Literal::Str("it's".into())),
            "'it\\'s'"
        );
        assert_eq!(renderer.render_literal(&Literal::Now), "() => new Date()");

        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            renderer.render_literal(&Literal::Date(date)),
            "new Date(Date.UTC(2024, 1, 29))"
        );
        let ts = date.and_hms_milli_opt(10, 30, 5, 250).unwrap();
        assert_eq!(
            renderer.render_literal(&Literal::Timestamp(ts)),
            "new Date(Date.UTC(2024, 1, 29, 10, 30, 5, 250))"
        );
    }

    #[test]
    fn test_render_table() {
        let result = TableSchemaResult {
            table: "user_accounts".into(),
            entries: vec![
                FieldEntry {
                    field_name: "id".into(),
                    column_name: "id".into(),
                    expr: SchemaExpr::Uuid { label: "".into() },
                },
                FieldEntry {
                    field_name: "createdAt".into(),
                    column_name: "created_at".into(),
                    expr: SchemaExpr::UtcDate.with_default(Literal::Now),
                },
            ],
            processed: 2,
            ..Default::default()
        };

        let source = ZodRenderer::new().render_table(&result);
        assert!(source.contains("import { z } from \"zod\";"));
        assert!(source.contains("import { utcDate, uuidString } from \"./zod-helpers\";"));
        assert!(source.contains("export const userAccountsSchema = z.object({"));
        assert!(source.contains("  id: uuidString(''),\n"));
        assert!(source.contains("  createdAt: utcDate.default(() => new Date()),\n"));
        assert!(source.contains("export type UserAccounts = z.infer<typeof userAccountsSchema>;"));
    }

    #[test]
    fn test_render_table_without_helpers() {
        let result = TableSchemaResult {
            table: "flags".into(),
            entries: vec![FieldEntry {
                field_name: "enabled".into(),
                column_name: "enabled".into(),
                expr: SchemaExpr::Boolean,
            }],
            ..Default::default()
        };
        let source = ZodRenderer::new().render_table(&result);
        assert!(!source.contains("zod-helpers"));
    }

    #[test]
    fn test_table_names() {
        assert_eq!(camel_case_table("order-items"), "orderItems");
        assert_eq!(pascal_case_table("order_items"), "OrderItems");
        assert_eq!(camel_case_table("2024_sales"), "_2024Sales");
        assert_eq!(ZodRenderer::new().table_file_name("users"), "users.ts");
    }

    #[test]
    fn test_property_key_quotes_invalid_identifiers() {
        assert_eq!(property_key("userId"), "userId");
        assert_eq!(property_key("col_1"), "col_1");
        assert_eq!(property_key("1st"), "'1st'");
        assert_eq!(property_key("has space"), "'has space'");
    }

    #[test]
    fn test_helpers_source_defines_all_helpers() {
        let renderer = ZodRenderer::new();
        let source = renderer.helpers_source();
        for helper in [Helper::UtcDate, Helper::DateOnly, Helper::Uuid] {
            assert!(source.contains(&format!("export const {}", helper_name(helper))));
        }
    }
}
