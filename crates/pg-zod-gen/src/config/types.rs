//! Configuration type definitions.

use crate::assembler::AssembleOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Table value that selects every base table in the schema.
pub const ALL_TABLES: &str = "all";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection.
    pub database: DatabaseConfig,

    /// Generation behavior.
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// PostgreSQL connection configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,

    /// Database port (default: 5432).
    #[serde(default = "default_pg_port")]
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// SSL mode: disable, require, verify-ca, verify-full (default: "require").
    #[serde(default = "default_require")]
    pub ssl_mode: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

/// Schema generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Table to generate, or "all" (default).
    #[serde(default = "default_all")]
    pub table: String,

    /// Schema to read tables from (default: "public").
    #[serde(default = "default_public_schema")]
    pub schema: String,

    /// Output directory (default: "./schemas").
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Skip columns that have a default (default: false).
    #[serde(default)]
    pub exclude_defaults: bool,

    /// Emit nullable columns as optional fields (default: true).
    #[serde(default = "default_true")]
    pub include_nullable: bool,

    /// Numeric fields must be greater than zero (default: true).
    #[serde(default = "default_true")]
    pub positive_numbers: bool,

    /// Tables processed concurrently (default: 4).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            table: default_all(),
            schema: default_public_schema(),
            output: default_output(),
            exclude_defaults: false,
            include_nullable: true,
            positive_numbers: true,
            concurrency: default_concurrency(),
        }
    }
}

impl GenerationConfig {
    /// Which tables this run covers.
    pub fn table_selection(&self) -> TableSelection {
        if self.table.eq_ignore_ascii_case(ALL_TABLES) {
            TableSelection::All
        } else {
            TableSelection::One(self.table.clone())
        }
    }

    /// Column policy handed to the assembler.
    pub fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            exclude_defaults: self.exclude_defaults,
            include_nullable: self.include_nullable,
            positive_numbers: self.positive_numbers,
        }
    }
}

/// Tables selected for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSelection {
    /// Every base table in the schema.
    All,
    /// A single named table.
    One(String),
}

// Default value functions for serde
fn default_pg_port() -> u16 {
    5432
}

fn default_require() -> String {
    "require".to_string()
}

fn default_all() -> String {
    ALL_TABLES.to_string()
}

fn default_public_schema() -> String {
    "public".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("./schemas")
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}
