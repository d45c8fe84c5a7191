//! Default-value translation.
//!
//! PostgreSQL reports column defaults as expression text (`'5'::integer`,
//! `now()`, `'active'::status`, ...). This module recognizes the subset of
//! that syntax that has a sensible literal counterpart in a validation schema.
//! It is a best-effort matcher over a fixed grammar, not an expression
//! evaluator: anything outside the grammar is reported as [`Unparseable`] and
//! the caller carries on without a default.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::core::{EnumRegistry, Literal};
use crate::typemap::{self, TypeFamily};

/// Bare numeric literal: optional sign, decimal part, exponent.
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap());

/// Quoted value with a cast: `'<value>'::<type>`.
static QUOTED_CAST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^'([^']*)'::[a-z][a-z0-9_ ]*$").unwrap());

static DATE_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^'(\d{4})-(\d{2})-(\d{2})'::date$").unwrap());

static TIMESTAMP_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^'(\d{4})-(\d{2})-(\d{2})[ T](\d{2}):(\d{2}):(\d{2})(?:\.(\d{1,9}))?(?:([+-])(\d{2})(?::?(\d{2}))?)?'::timestamp with time zone$",
    )
    .unwrap()
});

const DATE_NOW_FORMS: &[&str] = &["now()::date", "current_date", "('now'::text)::date"];

const TIMESTAMP_NOW_FORMS: &[&str] = &[
    "(now() at time zone 'utc'::text)",
    "now()",
    "current_timestamp",
];

/// A default expression outside the recognized grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot parse default '{raw}' for type '{sql_type}'")]
pub struct Unparseable {
    pub raw: String,
    pub sql_type: String,
}

impl Unparseable {
    fn new(raw: &str, sql_type: &str) -> Self {
        Self {
            raw: raw.to_string(),
            sql_type: sql_type.to_string(),
        }
    }
}

/// Translate a raw default expression into a literal.
///
/// Dispatch is purely on `sql_type`; enum defaults are recognized for types
/// outside the built-in families when the text ends with `::<enum type>`.
pub fn parse_default(
    raw: &str,
    sql_type: &str,
    enums: &EnumRegistry,
) -> Result<Literal, Unparseable> {
    let text = raw.trim();

    let parsed = match typemap::family(sql_type) {
        Some(TypeFamily::Numeric) => parse_number(text),
        Some(TypeFamily::Boolean) => Some(parse_bool(text)),
        Some(TypeFamily::Text) | Some(TypeFamily::FixedChar) => {
            Some(Literal::Str(parse_text(text)))
        }
        Some(TypeFamily::Date) => parse_date(text),
        Some(TypeFamily::TimestampTz) => parse_timestamp(text),
        Some(TypeFamily::Uuid) | None => parse_enum(text, enums),
    };

    parsed.ok_or_else(|| Unparseable::new(raw, sql_type))
}

fn parse_number(text: &str) -> Option<Literal> {
    let candidate = if let Some(caps) = QUOTED_CAST.captures(text) {
        caps.get(1).map(|m| m.as_str().trim())?
    } else if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        inner.trim()
    } else {
        text
    };

    NUMBER
        .is_match(candidate)
        .then(|| Literal::Number(candidate.to_string()))
}

/// Anything other than `true` is false.
fn parse_bool(text: &str) -> Literal {
    Literal::Bool(text.eq_ignore_ascii_case("true"))
}

fn parse_text(text: &str) -> String {
    let mut value = text;

    // 'abc'::character varying -> 'abc'
    if let Some(idx) = value.rfind("'::") {
        value = &value[..=idx];
    }

    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].replace("''", "'");
    }

    value.to_string()
}

fn parse_date(text: &str) -> Option<Literal> {
    if is_one_of(text, DATE_NOW_FORMS) {
        return Some(Literal::Now);
    }

    let caps = DATE_LITERAL.captures(text)?;
    let date = NaiveDate::from_ymd_opt(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )?;
    Some(Literal::Date(date))
}

fn parse_timestamp(text: &str) -> Option<Literal> {
    if is_one_of(text, TIMESTAMP_NOW_FORMS) {
        return Some(Literal::Now);
    }

    let caps = TIMESTAMP_LITERAL.captures(text)?;
    let date = NaiveDate::from_ymd_opt(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )?;

    let nanos = match caps.get(7) {
        Some(frac) => format!("{:0<9}", frac.as_str()).parse().ok()?,
        None => 0,
    };
    let time = NaiveTime::from_hms_nano_opt(
        caps[4].parse().ok()?,
        caps[5].parse().ok()?,
        caps[6].parse().ok()?,
        nanos,
    )?;
    let local = NaiveDateTime::new(date, time);

    let utc = match caps.get(8) {
        Some(sign) => {
            let hours: i32 = caps[9].parse().ok()?;
            let minutes: i32 = caps.get(10).map_or(Some(0), |m| m.as_str().parse().ok())?;
            let mut seconds = hours * 3600 + minutes * 60;
            if sign.as_str() == "-" {
                seconds = -seconds;
            }
            let offset = FixedOffset::east_opt(seconds)?;
            offset.from_local_datetime(&local).single()?.naive_utc()
        }
        None => local,
    };

    Some(Literal::Timestamp(utc))
}

/// `'<label>'::<enum type>` for any registered enum type.
fn parse_enum(text: &str, enums: &EnumRegistry) -> Option<Literal> {
    let is_enum_cast = enums
        .type_names()
        .any(|name| text.ends_with(&format!("::{}", name)));
    if !is_enum_cast {
        return None;
    }

    let start = text.find('\'')? + 1;
    let len = text[start..].find('\'')?;
    Some(Literal::Str(text[start..start + len].to_string()))
}

/// Case-insensitive comparison with runs of whitespace collapsed.
fn is_one_of(text: &str, forms: &[&str]) -> bool {
    let normalized = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    forms.contains(&normalized.as_str())
}
