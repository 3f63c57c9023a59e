//! Database schema definitions and SQL constants.
//!
//! All table definitions, indices, and shared SQL statements for the
//! moorage storage layer live here.

/// Current schema version for the database.
///
/// Stored in the metadata table and checked on every open to keep the
/// database and the library compatible.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the catways table.
///
/// The `number` column carries the business identifier and is UNIQUE;
/// `id` is the record identity used by update/delete.
pub const CREATE_CATWAYS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS catways (
        id INTEGER PRIMARY KEY,
        number INTEGER NOT NULL UNIQUE,
        kind TEXT NOT NULL,
        state TEXT NOT NULL
    )";

/// SQL statement to create the reservations table.
///
/// `catway_number` references a catway by business number, not by row
/// id, and carries no foreign key: deleting a catway leaves its
/// reservations in place. Dates are unix epoch seconds, both bounds
/// inclusive.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY,
        catway_number INTEGER NOT NULL,
        client_name TEXT NOT NULL,
        boat_name TEXT NOT NULL,
        start_date INTEGER NOT NULL,
        end_date INTEGER NOT NULL
    )";

/// SQL statement to create the users table.
///
/// Emails are stored lowercase and are UNIQUE per account; the password
/// column only ever holds a one-way digest.
pub const CREATE_USERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        firstname TEXT,
        email TEXT NOT NULL UNIQUE,
        password_digest TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// Index speeding up per-catway overlap scans.
pub const CREATE_RESERVATION_CATWAY_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_catway
    ON reservations(catway_number)";

/// Index speeding up current-reservation queries.
pub const CREATE_RESERVATION_WINDOW_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_window
    ON reservations(start_date, end_date)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
