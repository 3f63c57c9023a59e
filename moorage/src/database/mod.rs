//! Database layer for persistent storage of catways, reservations, and
//! user accounts.
//!
//! This module provides a `SQLite`-based storage layer: connection
//! management, schema versioning, and CRUD operations per entity. Writes
//! that depend on what is already stored (catway-number uniqueness,
//! booking admission, email uniqueness) run their checks and the write
//! inside a single IMMEDIATE transaction, so concurrent writers are
//! serialized and cannot both pass a check that only one may pass.
//!
//! # Examples
//!
//! ```no_run
//! use moorage::database::{Database, DatabaseConfig};
//! use moorage::{CatwayNumber, CatwayType};
//!
//! let config = DatabaseConfig::new("/tmp/moorage.db");
//! let mut db = Database::open(config).unwrap();
//!
//! let number = CatwayNumber::try_from(4).unwrap();
//! let catway = db.create_catway(number, CatwayType::Short).unwrap();
//! assert!(catway.is_usable());
//! ```

mod catways;
mod config;
mod connection;
pub mod migrations;
mod reservations;
mod schema;
mod users;

// Re-export public API
pub use config::{default_data_dir, resolve_database_path, DatabaseConfig};
pub use connection::Database;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};

use chrono::{DateTime, TimeZone, Utc};

/// Converts an instant to unix epoch seconds for database storage.
pub(super) fn datetime_to_unix_secs(instant: DateTime<Utc>) -> i64 {
    instant.timestamp()
}

/// Converts unix epoch seconds from the database back to an instant.
pub(super) fn unix_secs_to_datetime(secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single().ok_or_else(|| {
        rusqlite::Error::IntegralValueOutOfRange(0, secs)
    })
}
