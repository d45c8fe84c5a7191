//! Generation run driver.
//!
//! Resolves the table selection, builds the enum registry once, fans out
//! per-table fetch and assembly on tokio, then writes every successful table
//! plus the helper file. A table that fails is recorded in the result and
//! does not stop the others.

use crate::assembler::{assemble_table, AssembleOptions};
use crate::config::{Config, TableSelection};
use crate::core::{validate_table_name, EnumRegistry, TableSchemaResult};
use crate::error::{GenError, Result};
use crate::render::{SchemaRenderer, ZodRenderer};
use crate::source::{CatalogSource, PgCatalog};
use crate::writer::SchemaWriter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

/// Schema generator.
pub struct Generator {
    config: Config,
    catalog: Arc<dyn CatalogSource>,
    renderer: Arc<dyn SchemaRenderer>,
}

/// Result of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Unique run identifier.
    pub run_id: String,

    /// Final status: completed, partial or failed.
    pub status: String,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Directory the files were written to.
    pub output_dir: PathBuf,

    /// Total tables selected.
    pub tables_total: usize,

    /// Tables written.
    pub tables_success: usize,

    /// Tables that failed.
    pub tables_failed: usize,

    /// Per-table summaries, sorted by table name.
    pub tables: Vec<TableSummary>,

    /// Failed tables with their error messages.
    pub failed_tables: Vec<TableFailure>,
}

/// Outcome for one generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub table: String,
    pub file: PathBuf,
    pub fields: usize,
    pub processed: usize,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

/// A table that could not be generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFailure {
    pub table: String,
    pub error: String,
}

/// Result of a connectivity check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub healthy: bool,
    pub db_type: String,
    pub latency_ms: u64,
    pub error: Option<String>,
}

impl Generator {
    /// Connect to PostgreSQL and create a generator with the Zod renderer.
    pub async fn connect(config: Config) -> Result<Self> {
        let max_conns = config.generation.concurrency.max(1) + 1;
        let catalog = PgCatalog::connect(&config.database, max_conns).await?;
        Ok(Self::with_catalog(config, Arc::new(catalog)))
    }

    /// Create a generator over an existing catalog.
    pub fn with_catalog(config: Config, catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            config,
            catalog,
            renderer: Arc::new(ZodRenderer::new()),
        }
    }

    /// Replace the renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn SchemaRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Base tables in the configured schema.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        self.catalog.list_tables(&self.config.generation.schema).await
    }

    /// Test the catalog connection.
    pub async fn health_check(&self) -> Result<HealthCheckResult> {
        let start = Instant::now();
        let outcome = self.catalog.test_connection().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let error = match outcome {
            Ok(()) => None,
            Err(e) => {
                warn!("Health check failed: {}", e);
                Some(e.to_string())
            }
        };

        Ok(HealthCheckResult {
            healthy: error.is_none(),
            db_type: self.catalog.db_type().to_string(),
            latency_ms,
            error,
        })
    }

    /// Run generation for the configured table selection.
    pub async fn run(&self) -> Result<GenerationResult> {
        let started_at = Utc::now();
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let generation = &self.config.generation;

        info!("Starting generation run: {}", run_id);

        let tables = self.resolve_tables().await?;
        info!(
            "Generating {} table(s) from schema {}",
            tables.len(),
            generation.schema
        );

        let enums = Arc::new(EnumRegistry::build(self.catalog.fetch_enums().await?));
        debug!("Registered {} enum types", enums.len());

        let outcomes = self
            .assemble_all(tables.clone(), enums, generation.assemble_options())
            .await;

        let writer = SchemaWriter::new(&generation.output, self.renderer.as_ref())?;
        let mut summaries = Vec::new();
        let mut failures = Vec::new();

        for (table, outcome) in outcomes {
            let written = outcome.and_then(|result| {
                let file = writer.write_table(&result)?;
                Ok((result, file))
            });
            match written {
                Ok((result, file)) => {
                    info!("{}: {} fields -> {}", table, result.entries.len(), file.display());
                    summaries.push(TableSummary {
                        table,
                        file,
                        fields: result.entries.len(),
                        processed: result.processed,
                        skipped: result.skipped,
                        warnings: result.warnings,
                    });
                }
                Err(e) => {
                    error!("{}: {}", table, e);
                    failures.push(TableFailure {
                        table,
                        error: e.to_string(),
                    });
                }
            }
        }

        if !summaries.is_empty() {
            writer.write_helpers()?;
        }

        let status = if failures.is_empty() {
            "completed"
        } else if summaries.is_empty() {
            "failed"
        } else {
            "partial"
        };

        let completed_at = Utc::now();
        let result = GenerationResult {
            run_id,
            status: status.to_string(),
            duration_seconds: start.elapsed().as_secs_f64(),
            started_at,
            completed_at,
            output_dir: generation.output.clone(),
            tables_total: tables.len(),
            tables_success: summaries.len(),
            tables_failed: failures.len(),
            tables: summaries,
            failed_tables: failures,
        };

        info!(
            "Generation {}: {}/{} tables in {:.2}s",
            result.status, result.tables_success, result.tables_total, result.duration_seconds
        );

        Ok(result)
    }

    async fn resolve_tables(&self) -> Result<Vec<String>> {
        match self.config.generation.table_selection() {
            TableSelection::One(table) => {
                validate_table_name(&table)?;
                Ok(vec![table])
            }
            TableSelection::All => {
                let tables = self.list_tables().await?;
                if tables.is_empty() {
                    warn!(
                        "No tables found in schema {}",
                        self.config.generation.schema
                    );
                }
                Ok(tables)
            }
        }
    }

    /// Fetch and assemble every table, bounded by `generation.concurrency`.
    async fn assemble_all(
        &self,
        tables: Vec<String>,
        enums: Arc<EnumRegistry>,
        options: AssembleOptions,
    ) -> Vec<(String, Result<TableSchemaResult>)> {
        let semaphore = Arc::new(Semaphore::new(self.config.generation.concurrency.max(1)));
        let mut handles = Vec::with_capacity(tables.len());

        for table in tables {
            let semaphore = semaphore.clone();
            let catalog = self.catalog.clone();
            let enums = enums.clone();
            let schema = self.config.generation.schema.clone();
            let name = table.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| GenError::generation(&table, e.to_string()))?;
                let columns = catalog.fetch_columns(&schema, &table).await?;
                if columns.is_empty() {
                    return Err(GenError::generation(
                        &table,
                        format!("table not found in schema {} or has no columns", schema),
                    ));
                }
                assemble_table(&table, &columns, &enums, &options)
            });

            handles.push((name, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (table, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(GenError::generation(&table, format!("task panicked: {}", e))),
            };
            outcomes.push((table, outcome));
        }

        outcomes.sort_by(|a, b| a.0.cmp(&b.0));
        outcomes
    }
}

impl GenerationResult {
    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Error for the failed tables, if any.
    pub fn failure(&self) -> Option<GenError> {
        if self.failed_tables.is_empty() {
            return None;
        }
        let names: Vec<&str> = self.failed_tables.iter().map(|f| f.table.as_str()).collect();
        Some(GenError::generation(
            names.join(", "),
            format!(
                "{} of {} tables failed",
                self.tables_failed, self.tables_total
            ),
        ))
    }
}
