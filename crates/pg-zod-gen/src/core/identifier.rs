//! Identifier handling: field-name and label transforms, table-name guards.
//!
//! Column identifiers arrive in snake_case from the catalog. Generated schemas
//! use camelCase keys and human-readable labels inside validation messages.
//!
//! Table names supplied by the user end up in catalog queries and in output
//! file names, so they are validated up front: only ASCII alphanumerics,
//! underscores and hyphens are accepted, and SQL reserved words are refused.

use crate::error::{GenError, Result};

/// Maximum identifier length (PostgreSQL NAMEDATALEN - 1).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Reserved words that may not be used as a table name.
const RESERVED_WORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "both",
    "case", "cast", "check", "collate", "column", "constraint", "create", "current_catalog",
    "current_date", "current_role", "current_time", "current_timestamp", "current_user",
    "default", "deferrable", "delete", "desc", "distinct", "do", "drop", "else", "end", "except",
    "false", "fetch", "for", "foreign", "from", "grant", "group", "having", "in", "initially",
    "insert", "intersect", "into", "lateral", "leading", "limit", "localtime",
    "localtimestamp", "not", "null", "offset", "on", "only", "or", "order", "placing",
    "primary", "references", "returning", "select", "session_user", "some", "symmetric",
    "table", "then", "to", "trailing", "true", "union", "unique", "update", "user", "using",
    "variadic", "when", "where", "window", "with",
];

/// Convert a snake_case identifier to a camelCase field name.
///
/// Every underscore followed by a lowercase ASCII letter is replaced by the
/// uppercase letter. All other characters pass through untouched, so the
/// transform is a no-op on identifiers without such pairs.
pub fn to_field_name(snake_case: &str) -> String {
    let mut out = String::with_capacity(snake_case.len());
    let mut chars = snake_case.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }

    out
}

/// Build a human-readable label from a snake_case column name.
///
/// A trailing `id` (any case) is stripped, the remainder is split on
/// underscores, and each word is capitalized and joined with single spaces.
///
/// ```ignore
/// assert_eq!(to_readable_label("user_id"), "User");
/// assert_eq!(to_readable_label("first_name"), "First Name");
/// ```
pub fn to_readable_label(snake_case: &str) -> String {
    let base = if snake_case.to_ascii_lowercase().ends_with("id") {
        // "id" is ASCII, so len - 2 is a char boundary.
        &snake_case[..snake_case.len() - 2]
    } else {
        snake_case
    };

    base.split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Validate a user-supplied table name.
///
/// # Errors
///
/// Returns `GenError::InvalidTable` when the name is empty, too long, contains
/// characters other than ASCII alphanumerics, `_` and `-`, or is a reserved word.
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GenError::invalid_table(name, "table name cannot be empty"));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(GenError::invalid_table(
            name,
            format!(
                "exceeds maximum length of {} bytes (got {})",
                MAX_IDENTIFIER_LENGTH,
                name.len()
            ),
        ));
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(GenError::invalid_table(
            name,
            format!("character {:?} is not allowed", bad),
        ));
    }

    if is_reserved_word(name) {
        return Err(GenError::invalid_table(name, "reserved SQL keyword"));
    }

    Ok(())
}

/// Check whether a name is a reserved SQL keyword (case-insensitive).
pub fn is_reserved_word(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESERVED_WORDS.contains(&lower.as_str())
}
