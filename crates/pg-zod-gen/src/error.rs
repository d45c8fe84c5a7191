//! Error types for the schema generator.

use thiserror::Error;

/// Exit code for configuration errors (bad YAML, missing fields, invalid table).
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for database connection or query errors.
pub const EXIT_DATABASE_ERROR: u8 = 2;
/// Exit code for tables that could not be generated.
pub const EXIT_GENERATION_ERROR: u8 = 3;
/// Exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;
/// Exit code for anything else.
pub const EXIT_UNKNOWN_ERROR: u8 = 10;

/// Main error type for schema generation.
#[derive(Error, Debug)]
pub enum GenError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Table name rejected before any catalog work starts
    #[error("Invalid table name '{name}': {reason}")]
    InvalidTable { name: String, reason: String },

    /// Enum labels requested for a type that is not registered
    #[error("Enum type '{0}' is not registered")]
    EnumLookup(String),

    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// Connection pool error with context
    #[error("Pool error: {message}\n  Context: {context}")]
    Pool { message: String, context: String },

    /// Schema generation failed for a specific table
    #[error("Generation failed for table {table}: {message}")]
    Generation { table: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenError {
    /// Create a Pool error with context about where it occurred
    pub fn pool(message: impl std::fmt::Display, context: impl Into<String>) -> Self {
        GenError::Pool {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Create a Generation error
    pub fn generation(table: impl Into<String>, message: impl Into<String>) -> Self {
        GenError::Generation {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidTable error
    pub fn invalid_table(name: impl Into<String>, reason: impl Into<String>) -> Self {
        GenError::InvalidTable {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            GenError::Config(_) | GenError::InvalidTable { .. } | GenError::Yaml(_) => {
                EXIT_CONFIG_ERROR
            }
            GenError::Database(_) | GenError::Pool { .. } => EXIT_DATABASE_ERROR,
            GenError::Generation { .. } => EXIT_GENERATION_ERROR,
            GenError::Io(_) => EXIT_IO_ERROR,
            GenError::EnumLookup(_) | GenError::Json(_) => EXIT_UNKNOWN_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GenError>;
