//! Error types for the moorage library.
//!
//! This module provides a comprehensive error hierarchy for all operations
//! in the moorage library, using `thiserror` for ergonomic error handling.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catway::CatwayNumber;

/// Result type alias for operations that may fail with a moorage error.
///
/// # Examples
///
/// ```
/// use moorage::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(4)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the moorage library.
///
/// This enum encompasses all possible error conditions that can occur
/// during catway, booking, and account operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid catway number was provided.
    #[error("invalid catway number {value}: {reason}")]
    InvalidCatwayNumber {
        /// The invalid number value.
        value: i64,
        /// The reason the number is invalid.
        reason: String,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A catway number is already assigned to another catway.
    #[error("catway number {number} is already assigned")]
    CatwayNumberTaken {
        /// The contested catway number.
        number: CatwayNumber,
    },

    /// The target catway is missing or not in a bookable state.
    ///
    /// `state` carries the catway's actual state when the catway exists;
    /// it is `None` when no catway with that number was found at all.
    #[error("catway {number} is not available for booking")]
    CatwayUnavailable {
        /// The requested catway number.
        number: CatwayNumber,
        /// The catway's current state, if the catway exists.
        state: Option<String>,
    },

    /// The requested dates collide with an existing reservation.
    #[error("catway {number} is already booked between {start} and {end}")]
    BookingConflict {
        /// The catway number both reservations target.
        number: CatwayNumber,
        /// Start of the conflicting reservation.
        start: DateTime<Utc>,
        /// End of the conflicting reservation.
        end: DateTime<Utc>,
    },

    /// An account already exists for this email address.
    #[error("email address '{email}' is already in use")]
    EmailTaken {
        /// The normalized (lowercase) email address.
        email: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// Login was rejected.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// message does not reveal which accounts exist.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A bearer token failed verification.
    #[error("invalid token: {reason}")]
    TokenInvalid {
        /// Why the token was rejected.
        reason: String,
    },

    /// A password could not be hashed or verified.
    #[error("password hashing failed: {reason}")]
    PasswordHash {
        /// The underlying failure description.
        reason: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

/// Coarse classification of an error for the caller layer.
///
/// Callers (an HTTP front, the CLI) map these onto their own status
/// vocabulary. The reference mapping is bad input and conflicts to 400,
/// not-found to 404, internal faults to 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed caller input.
    InvalidInput,
    /// A referenced record does not exist.
    NotFound,
    /// The request collides with existing data.
    Conflict,
    /// The target catway is not in a bookable state.
    Unavailable,
    /// Authentication failed.
    Unauthorized,
    /// An internal fault; details are not for the caller.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid input"),
            Self::NotFound => write!(f, "not found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

// Additional conversions for better ergonomics

impl From<crate::catway::InvalidCatwayNumberError> for Error {
    fn from(err: crate::catway::InvalidCatwayNumberError) -> Self {
        Self::InvalidCatwayNumber {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl From<crate::booking::ValidationError> for Error {
    fn from(err: crate::booking::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::TokenInvalid {
            reason: err.to_string(),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::PasswordHash {
            reason: err.to_string(),
        }
    }
}

impl Error {
    /// Classifies this error for the caller layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use moorage::{Error, ErrorKind};
    ///
    /// let err = Error::NotFound { resource: "reservation 7".into() };
    /// assert_eq!(err.kind(), ErrorKind::NotFound);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCatwayNumber { .. } | Self::Validation { .. } => ErrorKind::InvalidInput,
            Self::CatwayNumberTaken { .. }
            | Self::BookingConflict { .. }
            | Self::EmailTaken { .. } => ErrorKind::Conflict,
            Self::CatwayUnavailable { .. } => ErrorKind::Unavailable,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidCredentials | Self::TokenInvalid { .. } => ErrorKind::Unauthorized,
            Self::PasswordHash { .. }
            | Self::Database(_)
            | Self::Configuration(_)
            | Self::Io(_)
            | Self::UnsupportedSchemaVersion { .. } => ErrorKind::Internal,
        }
    }

    /// Check if error indicates a missing record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is a data collision (number, dates, or email).
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}
