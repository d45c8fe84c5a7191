//! Type mapping from PostgreSQL column types to schema constructs.
//!
//! Resolution is an explicit, ordered rule table: the first rule whose
//! predicate accepts the column wins. The order is part of the contract
//! (enum membership beats everything, the unknown fallback comes last).

use tracing::trace;

use crate::core::{to_readable_label, EnumRegistry, Literal, SchemaExpr};
use crate::error::Result;

/// Families of built-in SQL types the generator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    /// integer, bigint, smallint, numeric, double precision.
    Numeric,
    /// boolean.
    Boolean,
    /// character varying, text.
    Text,
    /// character(n).
    FixedChar,
    /// date.
    Date,
    /// timestamp with time zone.
    TimestampTz,
    /// uuid.
    Uuid,
}

/// Classify a SQL type name.
///
/// Matching is case-insensitive and ignores type modifiers such as
/// `(255)` or `(10,2)`.
pub fn family(sql_type: &str) -> Option<TypeFamily> {
    let normalized = normalize(sql_type);
    let family = match normalized.as_str() {
        "integer" | "int" | "int4" | "bigint" | "int8" | "smallint" | "int2" | "numeric"
        | "decimal" | "double precision" | "float8" => TypeFamily::Numeric,
        "boolean" | "bool" => TypeFamily::Boolean,
        "character varying" | "varchar" | "text" => TypeFamily::Text,
        "character" | "char" | "bpchar" => TypeFamily::FixedChar,
        "date" => TypeFamily::Date,
        "timestamp with time zone" | "timestamptz" => TypeFamily::TimestampTz,
        "uuid" => TypeFamily::Uuid,
        _ => return None,
    };
    Some(family)
}

fn normalize(sql_type: &str) -> String {
    let lower = sql_type.trim().to_lowercase();
    match lower.find('(') {
        Some(open) => {
            let close = lower[open..].find(')').map(|i| open + i + 1);
            let mut base = lower[..open].to_string();
            if let Some(close) = close {
                base.push_str(&lower[close..]);
            }
            base.split_whitespace().collect::<Vec<_>>().join(" ")
        }
        None => lower,
    }
}

/// Result of mapping a column type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMapping {
    /// Base schema construct, without default/optional wrappers.
    pub expr: SchemaExpr,
    /// Default to apply when the column has no parseable default of its own.
    pub implied_default: Option<Literal>,
    /// Warning for unsupported types.
    pub warning: Option<String>,
}

impl TypeMapping {
    /// Create a mapping with no implied default and no warning.
    pub fn plain(expr: SchemaExpr) -> Self {
        Self {
            expr,
            implied_default: None,
            warning: None,
        }
    }

    /// Create a fallback mapping with a warning.
    pub fn fallback(warning: impl Into<String>) -> Self {
        Self {
            expr: SchemaExpr::Any,
            implied_default: None,
            warning: Some(warning.into()),
        }
    }
}

/// Everything a rule may look at.
struct TypeQuery<'a> {
    sql_type: &'a str,
    family: Option<TypeFamily>,
    column_name: &'a str,
    underlying_type_name: &'a str,
    max_length: Option<i32>,
    enums: &'a EnumRegistry,
}

struct TypeRule {
    name: &'static str,
    applies: fn(&TypeQuery<'_>) -> bool,
    build: fn(&TypeMapper, &TypeQuery<'_>) -> Result<TypeMapping>,
}

const RULES: &[TypeRule] = &[
    TypeRule {
        name: "enum",
        applies: is_enum,
        build: map_enum,
    },
    TypeRule {
        name: "fixed-char",
        applies: is_fixed_char,
        build: map_fixed_char,
    },
    TypeRule {
        name: "text",
        applies: is_text,
        build: map_text,
    },
    TypeRule {
        name: "numeric",
        applies: is_numeric,
        build: map_numeric,
    },
    TypeRule {
        name: "boolean",
        applies: is_boolean,
        build: map_boolean,
    },
    TypeRule {
        name: "timestamptz",
        applies: is_timestamptz,
        build: map_timestamptz,
    },
    TypeRule {
        name: "date",
        applies: is_date,
        build: map_date,
    },
    TypeRule {
        name: "uuid",
        applies: is_uuid,
        build: map_uuid,
    },
];

fn is_enum(q: &TypeQuery<'_>) -> bool {
    q.enums.has(q.underlying_type_name)
}

fn is_fixed_char(q: &TypeQuery<'_>) -> bool {
    q.family == Some(TypeFamily::FixedChar) && q.max_length.is_some_and(|len| len > 0)
}

fn is_text(q: &TypeQuery<'_>) -> bool {
    q.family == Some(TypeFamily::Text)
}

fn is_numeric(q: &TypeQuery<'_>) -> bool {
    q.family == Some(TypeFamily::Numeric)
}

fn is_boolean(q: &TypeQuery<'_>) -> bool {
    q.family == Some(TypeFamily::Boolean)
}

fn is_timestamptz(q: &TypeQuery<'_>) -> bool {
    q.family == Some(TypeFamily::TimestampTz)
}

fn is_date(q: &TypeQuery<'_>) -> bool {
    q.family == Some(TypeFamily::Date)
}

fn is_uuid(q: &TypeQuery<'_>) -> bool {
    q.family == Some(TypeFamily::Uuid)
}

fn map_enum(_: &TypeMapper, q: &TypeQuery<'_>) -> Result<TypeMapping> {
    let labels = q.enums.labels_of(q.underlying_type_name)?.to_vec();
    let first = labels.first().cloned().map(Literal::Str);
    Ok(TypeMapping {
        expr: SchemaExpr::Enum { labels },
        implied_default: first,
        warning: None,
    })
}

fn map_fixed_char(_: &TypeMapper, q: &TypeQuery<'_>) -> Result<TypeMapping> {
    let length = q.max_length.unwrap_or_default().max(0) as u32;
    Ok(TypeMapping::plain(SchemaExpr::FixedString {
        length,
        label: to_readable_label(q.column_name),
    }))
}

fn map_text(_: &TypeMapper, q: &TypeQuery<'_>) -> Result<TypeMapping> {
    Ok(TypeMapping::plain(SchemaExpr::NonEmptyString {
        label: to_readable_label(q.column_name),
    }))
}

fn map_numeric(mapper: &TypeMapper, q: &TypeQuery<'_>) -> Result<TypeMapping> {
    Ok(TypeMapping::plain(SchemaExpr::Number {
        label: to_readable_label(q.column_name),
        positive: mapper.positive_numbers,
    }))
}

fn map_boolean(_: &TypeMapper, _: &TypeQuery<'_>) -> Result<TypeMapping> {
    Ok(TypeMapping::plain(SchemaExpr::Boolean))
}

fn map_timestamptz(_: &TypeMapper, _: &TypeQuery<'_>) -> Result<TypeMapping> {
    Ok(TypeMapping::plain(SchemaExpr::UtcDate))
}

fn map_date(_: &TypeMapper, _: &TypeQuery<'_>) -> Result<TypeMapping> {
    Ok(TypeMapping::plain(SchemaExpr::DateOnly))
}

fn map_uuid(_: &TypeMapper, q: &TypeQuery<'_>) -> Result<TypeMapping> {
    Ok(TypeMapping::plain(SchemaExpr::Uuid {
        label: to_readable_label(q.column_name),
    }))
}

/// Maps column types to base schema constructs.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper {
    /// Require numbers to be greater than zero.
    pub positive_numbers: bool,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self {
            positive_numbers: true,
        }
    }
}

impl TypeMapper {
    /// Create a mapper with the given numeric policy.
    pub fn new(positive_numbers: bool) -> Self {
        Self { positive_numbers }
    }

    /// Map a (non-array) SQL type to its base construct.
    ///
    /// # Errors
    ///
    /// Returns `GenError::EnumLookup` only if the registry changes between the
    /// membership check and the label lookup, which cannot happen with a
    /// shared read-only registry.
    pub fn map_type(
        &self,
        sql_type: &str,
        enums: &EnumRegistry,
        column_name: &str,
        underlying_type_name: &str,
        max_length: Option<i32>,
    ) -> Result<TypeMapping> {
        let query = TypeQuery {
            sql_type,
            family: family(sql_type),
            column_name,
            underlying_type_name,
            max_length,
            enums,
        };

        match RULES.iter().find(|rule| (rule.applies)(&query)) {
            Some(rule) => {
                trace!("{}: '{}' matched rule {}", column_name, sql_type, rule.name);
                (rule.build)(self, &query)
            }
            None => Ok(TypeMapping::fallback(format!(
                "Unsupported type '{}' for column '{}', falling back to any",
                query.sql_type, query.column_name
            ))),
        }
    }
}
