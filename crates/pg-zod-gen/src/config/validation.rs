//! Configuration validation.

use super::{Config, TableSelection};
use crate::core::validate_table_name;
use crate::error::{GenError, Result};

const SSL_MODES: &[&str] = &["disable", "require", "verify-ca", "verify-full"];

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let db = &config.database;
    if db.host.is_empty() {
        return Err(GenError::Config("database.host is required".into()));
    }
    if db.database.is_empty() {
        return Err(GenError::Config("database.database is required".into()));
    }
    if db.user.is_empty() {
        return Err(GenError::Config("database.user is required".into()));
    }
    if !SSL_MODES.contains(&db.ssl_mode.to_lowercase().as_str()) {
        return Err(GenError::Config(format!(
            "database.ssl_mode must be one of {}, got '{}'",
            SSL_MODES.join(", "),
            db.ssl_mode
        )));
    }

    let generation = &config.generation;
    if generation.schema.is_empty() {
        return Err(GenError::Config("generation.schema is required".into()));
    }
    if generation.output.as_os_str().is_empty() {
        return Err(GenError::Config("generation.output is required".into()));
    }
    if generation.concurrency == 0 {
        return Err(GenError::Config(
            "generation.concurrency must be at least 1".into(),
        ));
    }
    if let TableSelection::One(table) = generation.table_selection() {
        validate_table_name(&table)?;
    }

    Ok(())
}
