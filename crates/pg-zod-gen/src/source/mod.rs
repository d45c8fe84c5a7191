//! Catalog access.
//!
//! [`CatalogSource`] is the seam between the generator and a live database.
//! [`PgCatalog`] reads the PostgreSQL system catalogs through a pooled
//! connection; tests substitute an in-memory implementation.

mod postgres;

pub use postgres::PgCatalog;

use crate::core::{ColumnMetadata, EnumRow};
use crate::error::Result;
use async_trait::async_trait;

/// Read-only view of a database catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Base tables in a schema, sorted by name.
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>>;

    /// Column metadata for one table, in ordinal position order.
    async fn fetch_columns(&self, schema: &str, table: &str) -> Result<Vec<ColumnMetadata>>;

    /// Every enum label in the database, ordered by type then sort order.
    async fn fetch_enums(&self) -> Result<Vec<EnumRow>>;

    /// Round-trip a trivial query.
    async fn test_connection(&self) -> Result<()>;

    /// Short name of the backend.
    fn db_type(&self) -> &str;
}
