//! Interactive configuration wizard for creating/editing config files.

use dialoguer::{Confirm, Input, Password, Select};
use pg_zod_gen::config::ALL_TABLES;
use pg_zod_gen::{Config, DatabaseConfig, GenerationConfig, Generator};
use std::path::{Path, PathBuf};

/// Result type for wizard operations.
pub type WizardResult<T> = Result<T, WizardError>;

/// Errors that can occur during wizard execution.
#[derive(Debug)]
pub enum WizardError {
    /// User cancelled the wizard.
    Cancelled,
    /// IO error (file read/write).
    Io(std::io::Error),
    /// Config serialization error.
    Config(String),
    /// Validation error.
    Validation(String),
}

impl std::fmt::Display for WizardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "Configuration cancelled"),
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Config(msg) => write!(f, "Config error: {}", msg),
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for WizardError {}

impl From<std::io::Error> for WizardError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<dialoguer::Error> for WizardError {
    fn from(e: dialoguer::Error) -> Self {
        Self::Io(std::io::Error::other(e.to_string()))
    }
}

/// Action to take when config file already exists.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ExistingFileAction {
    Edit,
    Overwrite,
    Abort,
}

const SSL_MODES: &[&str] = &["require", "disable", "verify-ca", "verify-full"];

/// Run the configuration wizard.
pub async fn run_wizard(output: &Path, advanced: bool, force: bool) -> WizardResult<()> {
    println!();
    println!("PostgreSQL to Zod Schema Generator - Configuration Wizard");
    println!("==========================================================");
    println!();

    let existing_config = if output.exists() && !force {
        match prompt_existing_file_action(output)? {
            ExistingFileAction::Edit => {
                println!("Loading existing configuration...");
                match Config::load(output) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        println!("Warning: Could not parse existing file: {}", e);
                        println!("Starting with fresh configuration.\n");
                        None
                    }
                }
            }
            ExistingFileAction::Overwrite => {
                println!("Starting with fresh configuration.\n");
                None
            }
            ExistingFileAction::Abort => return Err(WizardError::Cancelled),
        }
    } else {
        None
    };

    let database = prompt_database_config(existing_config.as_ref().map(|c| &c.database))?;
    let generation =
        prompt_generation_config(existing_config.as_ref().map(|c| &c.generation), advanced)?;

    let config = Config {
        database,
        generation,
    };

    if let Err(e) = config.validate() {
        return Err(WizardError::Validation(e.to_string()));
    }

    print_summary(&config);

    if prompt_connection_test()? {
        test_connection(&config).await?;
    }

    if !prompt_save_confirm(output)? {
        return Err(WizardError::Cancelled);
    }

    write_config(&config, output)?;

    println!("\nConfiguration saved to {}", output.display());
    println!("Run 'pg-zod-gen generate' to generate schemas.");

    Ok(())
}

fn prompt_existing_file_action(path: &Path) -> WizardResult<ExistingFileAction> {
    println!("File already exists: {}\n", path.display());

    let options = &["Edit existing configuration", "Overwrite with new", "Abort"];
    let selection = Select::new()
        .with_prompt("What would you like to do?")
        .items(options)
        .default(0)
        .interact()?;

    Ok(match selection {
        0 => ExistingFileAction::Edit,
        1 => ExistingFileAction::Overwrite,
        _ => ExistingFileAction::Abort,
    })
}

fn prompt_database_config(existing: Option<&DatabaseConfig>) -> WizardResult<DatabaseConfig> {
    println!("Database (PostgreSQL)");
    println!("---------------------");

    let host: String = Input::new()
        .with_prompt("  Host")
        .default(
            existing
                .map(|c| c.host.clone())
                .unwrap_or_else(|| "localhost".to_string()),
        )
        .interact_text()?;

    let port: u16 = Input::new()
        .with_prompt("  Port")
        .default(existing.map(|c| c.port).unwrap_or(5432))
        .interact_text()?;

    let database: String = Input::new()
        .with_prompt("  Database")
        .default(existing.map(|c| c.database.clone()).unwrap_or_default())
        .interact_text()?;

    let user: String = Input::new()
        .with_prompt("  User")
        .default(
            existing
                .map(|c| c.user.clone())
                .unwrap_or_else(|| "postgres".to_string()),
        )
        .interact_text()?;

    let password = prompt_password("  Password", existing.is_some())?;
    let password = if password.is_empty() {
        existing.map(|e| e.password.clone()).unwrap_or(password)
    } else {
        password
    };

    let default_idx = existing
        .map(|c| SSL_MODES.iter().position(|&m| m == c.ssl_mode).unwrap_or(0))
        .unwrap_or(0);

    let ssl_mode_idx = Select::new()
        .with_prompt("  SSL Mode")
        .items(SSL_MODES)
        .default(default_idx)
        .interact()?;

    println!();

    Ok(DatabaseConfig {
        host,
        port,
        database,
        user,
        password,
        ssl_mode: SSL_MODES[ssl_mode_idx].to_string(),
    })
}

fn prompt_generation_config(
    existing: Option<&GenerationConfig>,
    advanced: bool,
) -> WizardResult<GenerationConfig> {
    println!("Generation Settings");
    println!("-------------------");

    let mut config = existing.cloned().unwrap_or_default();

    config.table = Input::new()
        .with_prompt(format!("  Table ('{}' for every table)", ALL_TABLES))
        .default(config.table.clone())
        .interact_text()?;

    config.schema = Input::new()
        .with_prompt("  Schema")
        .default(config.schema.clone())
        .interact_text()?;

    let output: String = Input::new()
        .with_prompt("  Output directory")
        .default(config.output.display().to_string())
        .interact_text()?;
    config.output = PathBuf::from(output);

    config.exclude_defaults = Confirm::new()
        .with_prompt("  Exclude columns with defaults")
        .default(config.exclude_defaults)
        .interact()?;

    config.include_nullable = Confirm::new()
        .with_prompt("  Include nullable columns as optional")
        .default(config.include_nullable)
        .interact()?;

    if advanced {
        println!("\n  Advanced Settings");

        config.positive_numbers = Confirm::new()
            .with_prompt("  Require numbers to be greater than zero")
            .default(config.positive_numbers)
            .interact()?;

        config.concurrency = Input::new()
            .with_prompt("  Tables processed concurrently")
            .default(config.concurrency)
            .interact_text()?;
    }

    println!();

    Ok(config)
}

fn prompt_password(prompt: &str, has_existing: bool) -> WizardResult<String> {
    if has_existing {
        let input: String = Password::new()
            .with_prompt(format!("{} (blank to keep existing)", prompt))
            .allow_empty_password(true)
            .interact()?;
        Ok(input)
    } else {
        let input: String = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(input)
    }
}

fn print_summary(config: &Config) {
    let db = &config.database;
    let generation = &config.generation;

    println!("Configuration Summary");
    println!("---------------------");
    println!(
        "  Database: {}@{}:{}/{} (ssl: {})",
        db.user, db.host, db.port, db.database, db.ssl_mode
    );
    println!("  Tables: {}.{}", generation.schema, generation.table);
    println!("  Output: {}", generation.output.display());

    let mut policies = Vec::new();
    if generation.exclude_defaults {
        policies.push("exclude defaults");
    }
    if generation.include_nullable {
        policies.push("optional nullable");
    }
    if generation.positive_numbers {
        policies.push("positive numbers");
    }
    if !policies.is_empty() {
        println!("  Policies: {}", policies.join(", "));
    }

    println!();
}

fn prompt_connection_test() -> WizardResult<bool> {
    Ok(Confirm::new()
        .with_prompt("Test database connection?")
        .default(false)
        .interact()?)
}

async fn test_connection(config: &Config) -> WizardResult<()> {
    use std::time::Duration;
    use tokio::time::timeout;

    println!("\nTesting connection...");

    let timeout_duration = Duration::from_secs(30);

    let generator = match timeout(timeout_duration, Generator::connect(config.clone())).await {
        Ok(Ok(generator)) => generator,
        Ok(Err(e)) => {
            println!("  Failed to connect: {}", e);
            println!();
            return Ok(());
        }
        Err(_) => {
            println!("  Connection timed out after 30 seconds");
            println!();
            return Ok(());
        }
    };

    match timeout(timeout_duration, generator.list_tables()).await {
        Ok(Ok(tables)) => {
            println!(
                "  PostgreSQL: OK ({} tables in schema {})",
                tables.len(),
                config.generation.schema
            );
        }
        Ok(Err(e)) => println!("  Listing tables failed: {}", e),
        Err(_) => println!("  Listing tables timed out after 30 seconds"),
    }

    println!();
    Ok(())
}

fn prompt_save_confirm(path: &Path) -> WizardResult<bool> {
    Ok(Confirm::new()
        .with_prompt(format!("Save to {}?", path.display()))
        .default(true)
        .interact()?)
}

fn write_config(config: &Config, path: &Path) -> WizardResult<()> {
    let header = r#"# PostgreSQL to Zod Schema Generator Configuration
# Generated by pg-zod-gen init

"#;

    let yaml = config
        .to_yaml()
        .map_err(|e| WizardError::Config(e.to_string()))?;

    std::fs::write(path, format!("{}{}", header, yaml))?;

    Ok(())
}
