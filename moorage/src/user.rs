//! User account types.
//!
//! This module provides the account records behind authentication:
//! registration input validation, email normalization, and the stored
//! user form. Password digests never leave the library in serialized
//! output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::ValidationError;

/// Identifier of a stored user record.
pub type UserId = i64;

/// Normalizes an email address for storage and lookups.
///
/// Addresses are compared and stored trimmed and lowercased, so
/// `Capitaine@Port.fr` and `capitaine@port.fr` are the same account.
///
/// # Examples
///
/// ```
/// use moorage::user::normalize_email;
///
/// assert_eq!(normalize_email("  Capitaine@Port.FR "), "capitaine@port.fr");
/// ```
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A validated registration request.
///
/// The password is still in clear here; it is hashed exactly once, at
/// the point the stored record is constructed, by an explicit call to
/// the hashing primitive (no save-time hook).
///
/// # Examples
///
/// ```
/// use moorage::Registration;
///
/// let reg = Registration::new("Dupont", Some("Jean".into()), "Jean@Port.fr", "secret").unwrap();
/// assert_eq!(reg.email, "jean@port.fr");
///
/// // name, email and password are required
/// assert!(Registration::new("", None, "jean@port.fr", "secret").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Registration {
    /// Last name (required).
    pub name: String,
    /// First name (optional).
    pub firstname: Option<String>,
    /// Normalized email address.
    pub email: String,
    /// Clear-text password, consumed by the hashing step.
    pub password: String,
}

impl Registration {
    /// Validates and normalizes a registration request.
    ///
    /// # Errors
    ///
    /// Returns an error if name, email, or password is empty after
    /// trimming.
    pub fn new(
        name: impl Into<String>,
        firstname: Option<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = required("name", name.into())?;
        let email = normalize_email(&required("email", email.into())?);
        let password = required_raw("password", password.into())?;
        let firstname = firstname
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        Ok(Self {
            name,
            firstname,
            email,
            password,
        })
    }
}

/// A storage-ready account record: validated fields plus the password
/// digest computed by the explicit hashing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Last name.
    pub name: String,
    /// First name, if provided.
    pub firstname: Option<String>,
    /// Normalized email address.
    pub email: String,
    /// One-way password digest (PHC string).
    pub password_digest: String,
}

/// A partial update to a user record.
///
/// `None` fields are left unchanged. A new email is normalized and
/// re-checked for uniqueness; a new password arrives here already
/// hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// New last name, if changing.
    pub name: Option<String>,
    /// New first name, if changing.
    pub firstname: Option<String>,
    /// New (normalized) email, if changing.
    pub email: Option<String>,
    /// New password digest, if the password changed.
    pub password_digest: Option<String>,
}

/// A stored user account.
///
/// The password digest is carried for verification but is never
/// serialized; API-facing output of a `User` contains no credential
/// material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Record identifier.
    pub id: UserId,
    /// Last name.
    pub name: String,
    /// First name, if provided.
    pub firstname: Option<String>,
    /// Normalized (lowercase) email address, unique per account.
    pub email: String,
    /// One-way password digest (PHC string). Never serialized.
    #[serde(skip)]
    pub password_digest: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn required(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError {
            field: field.into(),
            message: format!("{field} must be non-empty after trimming whitespace"),
        });
    }
    Ok(trimmed.to_string())
}

// Passwords keep their exact bytes; only emptiness is rejected.
fn required_raw(field: &str, value: String) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError {
            field: field.into(),
            message: format!("{field} must be non-empty"),
        });
    }
    Ok(value)
}
