//! Utility functions for CLI commands.
//!
//! Configuration loading, database opening, token-based authentication,
//! and date parsing shared across commands.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use moorage::auth::Identity;
use moorage::database::{resolve_database_path, Database, DatabaseConfig};
use moorage::{Config, ConfigBuilder};

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // verbose/quiet are consumed by the logger in main
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Bearer token for authenticated commands.
    pub token: Option<String>,
}

/// Loads configuration, with the CLI data-dir flag taking precedence.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    ConfigBuilder::new()
        .with_data_dir(global.data_dir.clone())
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Opens the database at the configured location.
pub fn open_database(config: &Config) -> Result<Database, CliError> {
    let path = match &config.data_dir {
        Some(dir) => dir.join("moorage.db"),
        None => resolve_database_path()?,
    };
    let db_config = DatabaseConfig::new(path).with_busy_timeout(config.busy_timeout);
    Ok(Database::open(db_config)?)
}

/// Resolves the caller's identity from the bearer token.
///
/// The token is verified against the configured secret; its claims
/// become the explicit [`Identity`] the caller threads through the
/// session. Commands mutating or listing marina data require this;
/// `init`, `login`, and `user register` do not.
pub fn authenticate(global: &GlobalOptions, config: &Config) -> Result<Identity, CliError> {
    let Some(token) = &global.token else {
        return Err(CliError::NoToken);
    };
    let tokens = config
        .token_service()
        .map_err(|e| CliError::Config(e.to_string()))?;
    let claims = tokens.verify(token)?;
    Ok(Identity::from_claims(&claims)?)
}

/// Parses a booking instant: `YYYY-MM-DD` (midnight UTC) or RFC 3339.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is valid");
        return Ok(Utc.from_utc_datetime(&midnight));
    }
    Err(CliError::InvalidArguments(format!(
        "'{s}' is not a date (expected YYYY-MM-DD or RFC 3339)"
    )))
}

/// Prints a dry-run plan and its warnings.
pub fn print_dry_run(result: &moorage::ExecutionResult) {
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
    for action in &result.actions_taken {
        println!("[dry-run] {action}");
    }
}
