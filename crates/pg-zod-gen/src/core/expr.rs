//! Schema expression tree.
//!
//! The mapping engine produces [`SchemaExpr`] values; turning them into
//! source text is the job of a [`crate::render::SchemaRenderer`]. Keeping the
//! two apart lets another schema library be targeted without touching the
//! mapping rules.

use chrono::{NaiveDate, NaiveDateTime};

/// A literal default value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric literal, kept as validated source text (e.g. "5", "-1.5e3").
    Number(String),
    /// Boolean literal.
    Bool(bool),
    /// String literal (unquoted content).
    Str(String),
    /// The current instant, evaluated when the schema parses.
    Now,
    /// A calendar date.
    Date(NaiveDate),
    /// A point in time, normalized to UTC.
    Timestamp(NaiveDateTime),
}

/// Helper constructs provided by the generated auxiliary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Helper {
    /// UTC-normalizing date construct.
    UtcDate,
    /// Date-only construct (time components must be zero).
    DateOnly,
    /// UUID-format string construct.
    Uuid,
}

/// A validation schema construct.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaExpr {
    /// One of a fixed set of labels.
    Enum { labels: Vec<String> },
    /// String of exactly `length` characters.
    FixedString { length: u32, label: String },
    /// String of at least one character.
    NonEmptyString { label: String },
    /// Number, optionally required to be greater than zero.
    Number { label: String, positive: bool },
    /// Plain boolean.
    Boolean,
    /// Date-like value normalized to UTC.
    UtcDate,
    /// Date-like value with zero time of day.
    DateOnly,
    /// UUID-formatted string.
    Uuid { label: String },
    /// Anything (unsupported SQL type).
    Any,
    /// Array of the inner construct.
    Array(Box<SchemaExpr>),
    /// Inner construct with a default value.
    Default(Box<SchemaExpr>, Literal),
    /// Inner construct that may be absent.
    Optional(Box<SchemaExpr>),
}

impl SchemaExpr {
    pub fn array(inner: SchemaExpr) -> Self {
        SchemaExpr::Array(Box::new(inner))
    }

    pub fn with_default(self, literal: Literal) -> Self {
        SchemaExpr::Default(Box::new(self), literal)
    }

    pub fn optional(self) -> Self {
        SchemaExpr::Optional(Box::new(self))
    }

    /// Check if this is the unknown/any fallback.
    pub fn is_any(&self) -> bool {
        matches!(self, SchemaExpr::Any)
    }

    /// Default literal attached at the top of the expression, looking through
    /// an optional wrapper.
    pub fn default_literal(&self) -> Option<&Literal> {
        match self {
            SchemaExpr::Default(_, lit) => Some(lit),
            SchemaExpr::Optional(inner) => inner.default_literal(),
            _ => None,
        }
    }

    /// Helper constructs referenced anywhere in the expression.
    pub fn helpers(&self, out: &mut Vec<Helper>) {
        match self {
            SchemaExpr::UtcDate => out.push(Helper::UtcDate),
            SchemaExpr::DateOnly => out.push(Helper::DateOnly),
            SchemaExpr::Uuid { .. } => out.push(Helper::Uuid),
            SchemaExpr::Array(inner)
            | SchemaExpr::Default(inner, _)
            | SchemaExpr::Optional(inner) => inner.helpers(out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_literal_through_optional() {
        let expr = SchemaExpr::Boolean
            .with_default(Literal::Bool(true))
            .optional();
        assert_eq!(expr.default_literal(), Some(&Literal::Bool(true)));
        assert_eq!(SchemaExpr::Boolean.default_literal(), None);
    }

    #[test]
    fn test_helpers_collected_from_nested() {
        let expr = SchemaExpr::array(SchemaExpr::Uuid {
            label: "Owner".into(),
        })
        .optional();
        let mut helpers = Vec::new();
        expr.helpers(&mut helpers);
        assert_eq!(helpers, vec![Helper::Uuid]);
    }
}
