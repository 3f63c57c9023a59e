//! CLI-specific error types with exit codes.
//!
//! Wraps library errors and maps them onto stable exit codes so scripts
//! can distinguish rejection classes.

use std::fmt;

use moorage::{Error as LibError, ErrorKind};

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// No bearer token supplied for an authenticated command.
    NoToken,

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Request rejected (conflict, unavailable catway, not found)
    /// - 2: Authentication failure (missing/invalid token, bad login)
    /// - 4: Invalid arguments or input
    /// - 5: I/O error
    /// - 6: Storage or other library fault
    /// - 7: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) => match lib_err.kind() {
                ErrorKind::Conflict | ErrorKind::Unavailable | ErrorKind::NotFound => 1,
                ErrorKind::Unauthorized => 2,
                ErrorKind::InvalidInput => 4,
                ErrorKind::Internal => 6,
            },
            CliError::NoToken => 2,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::NoToken => {
                write!(f, "authentication required: pass --token or set MOORAGE_TOKEN")
            }
            CliError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<LibError> for CliError {
    fn from(err: LibError) -> Self {
        CliError::Library(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}
