//! # pg-zod-gen
//!
//! Generate Zod validation schemas from PostgreSQL table metadata.
//!
//! The mapping engine is synchronous and pure: column metadata and an enum
//! registry go in, an ordered list of schema expressions comes out. Around it
//! sit a catalog reader, a renderer, a file writer and a run driver:
//!
//! - **Type mapping** for numeric, text, fixed-length, boolean, date,
//!   timestamp, uuid, enum and array columns
//! - **Default translation** of casts, quoted literals, `now()` forms and
//!   enum-qualified labels
//! - **Concurrent generation** across all tables of a schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use pg_zod_gen::{Config, Generator};
//!
//! #[tokio::main]
//! async fn main() -> pg_zod_gen::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let generator = Generator::connect(config).await?;
//!     let result = generator.run().await?;
//!     println!("Generated {} tables", result.tables_success);
//!     Ok(())
//! }
//! ```

pub mod assembler;
pub mod config;
pub mod core;
pub mod defaults;
pub mod error;
pub mod generator;
pub mod render;
pub mod source;
pub mod typemap;
pub mod writer;

// Re-exports for convenient access
pub use assembler::{assemble_table, AssembleOptions};
pub use config::{Config, DatabaseConfig, GenerationConfig, TableSelection};
pub use crate::core::{ColumnMetadata, EnumRegistry, EnumRow, FieldEntry, SchemaExpr, TableSchemaResult};
pub use error::{GenError, Result};
pub use generator::{GenerationResult, Generator, HealthCheckResult, TableSummary};
pub use render::{SchemaRenderer, ZodRenderer};
pub use source::{CatalogSource, PgCatalog};
pub use writer::SchemaWriter;
