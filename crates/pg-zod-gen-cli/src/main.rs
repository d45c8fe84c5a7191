//! pg-zod-gen CLI - Generate Zod schemas from PostgreSQL tables.

mod wizard;

use clap::{Parser, Subcommand};
use pg_zod_gen::{Config, GenError, GenerationResult, Generator};
use prettytable::{format, Cell, Row, Table};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "pg-zod-gen")]
#[command(about = "Generate Zod validation schemas from PostgreSQL tables")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate schema files
    Generate {
        /// Table to generate, or "all"
        #[arg(short, long)]
        table: Option<String>,

        /// Override schema
        #[arg(long)]
        schema: Option<String>,

        /// Override output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip columns that have a default
        #[arg(long)]
        exclude_defaults: bool,

        /// Leave nullable columns out of the schema
        #[arg(long)]
        exclude_nullable: bool,

        /// Allow zero and negative numbers
        #[arg(long)]
        allow_non_positive: bool,

        /// Override number of tables processed concurrently
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// List base tables in the configured schema
    ListTables {
        /// Override schema
        #[arg(long)]
        schema: Option<String>,
    },

    /// Test the database connection
    HealthCheck,

    /// Create or edit a configuration file interactively
    Init {
        /// Output path for configuration file [default: config.yaml]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show advanced generation options
        #[arg(long)]
        advanced: bool,

        /// Force overwrite existing file without confirmation
        #[arg(long, short)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), GenError> {
    let cli = Cli::parse();

    // No logging for the wizard, it owns the terminal
    if let Commands::Init {
        output,
        advanced,
        force,
    } = cli.command
    {
        let output_path = output.unwrap_or_else(|| PathBuf::from("config.yaml"));
        wizard::run_wizard(&output_path, advanced, force)
            .await
            .map_err(|e| GenError::Config(e.to_string()))?;
        return Ok(());
    }

    setup_logging(&cli.verbosity, &cli.log_format);

    let mut config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    match cli.command {
        Commands::Init { .. } => unreachable!(), // Handled above
        Commands::Generate {
            table,
            schema,
            output,
            exclude_defaults,
            exclude_nullable,
            allow_non_positive,
            concurrency,
        } => {
            let generation = &mut config.generation;
            if let Some(table) = table {
                generation.table = table;
            }
            if let Some(schema) = schema {
                generation.schema = schema;
            }
            if let Some(output) = output {
                generation.output = output;
            }
            if let Some(n) = concurrency {
                generation.concurrency = n;
            }
            if exclude_defaults {
                generation.exclude_defaults = true;
            }
            if exclude_nullable {
                generation.include_nullable = false;
            }
            if allow_non_positive {
                generation.positive_numbers = false;
            }
            config.validate()?;

            let generator = Generator::connect(config).await?;
            let result = generator.run().await?;

            if cli.output_json {
                println!("{}", result.to_json()?);
            } else {
                print_generation(&result);
            }

            if let Some(err) = result.failure() {
                return Err(err);
            }
        }

        Commands::ListTables { schema } => {
            if let Some(schema) = schema {
                config.generation.schema = schema;
            }
            let generator = Generator::connect(config.clone()).await?;
            let tables = generator.list_tables().await?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                println!(
                    "Tables in schema {} ({}):",
                    config.generation.schema,
                    tables.len()
                );
                for table in &tables {
                    println!("  {}", table);
                }
            }
        }

        Commands::HealthCheck => {
            let generator = Generator::connect(config).await?;
            let result = generator.health_check().await?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Health Check Results:");
                println!(
                    "  Database ({}): {} ({}ms)",
                    result.db_type,
                    if result.healthy { "OK" } else { "FAILED" },
                    result.latency_ms
                );
                if let Some(ref err) = result.error {
                    println!("    Error: {}", err);
                }
            }

            if !result.healthy {
                return Err(GenError::pool(
                    result.error.unwrap_or_default(),
                    "health check",
                ));
            }
        }
    }

    Ok(())
}

/// Processed-columns table plus run summary.
fn print_generation(result: &GenerationResult) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table.add_row(Row::new(vec![
        Cell::new("Table").style_spec("bFg"),
        Cell::new("Processed").style_spec("bFg"),
        Cell::new("Skipped").style_spec("bFg"),
        Cell::new("Fields").style_spec("bFg"),
        Cell::new("Warnings").style_spec("bFg"),
        Cell::new("File").style_spec("bFg"),
    ]));

    for summary in &result.tables {
        table.add_row(Row::new(vec![
            Cell::new(&summary.table),
            Cell::new(&summary.processed.to_string()).style_spec("r"),
            Cell::new(&summary.skipped.to_string()).style_spec("r"),
            Cell::new(&summary.fields.to_string()).style_spec("r"),
            Cell::new(&summary.warnings.len().to_string()).style_spec("r"),
            Cell::new(&summary.file.display().to_string()),
        ]));
    }

    if !result.tables.is_empty() {
        println!();
        table.printstd();
    }

    for summary in &result.tables {
        for warning in &summary.warnings {
            println!("  warning [{}]: {}", summary.table, warning);
        }
    }

    println!("\nGeneration {}!", result.status);
    println!("  Run ID: {}", result.run_id);
    println!("  Duration: {:.2}s", result.duration_seconds);
    println!("  Tables: {}/{}", result.tables_success, result.tables_total);
    println!("  Output: {}", result.output_dir.display());
    for failure in &result.failed_tables {
        println!("  Failed: {} ({})", failure.table, failure.error);
    }
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so stdout stays clean for --output-json
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
