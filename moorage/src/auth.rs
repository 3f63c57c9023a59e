//! Credential hashing, token issuance, and caller identity.
//!
//! Passwords are hashed with argon2 into PHC strings; sessions are
//! bearer JWTs signed with a shared secret. Identity is explicit: the
//! caller layer verifies a token, builds an [`Identity`], and passes it
//! into the operations that require one. The library keeps no ambient
//! user context.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::user::{normalize_email, User, UserId};

/// Hashes a clear-text password into a PHC-format digest.
///
/// Salt generation is internal; hashing the same password twice yields
/// different digests.
///
/// # Errors
///
/// Returns an error if the hashing primitive fails.
///
/// # Examples
///
/// ```
/// use moorage::auth::{hash_password, verify_password};
///
/// let digest = hash_password("secret").unwrap();
/// assert!(digest.starts_with("$argon2"));
/// assert!(verify_password("secret", &digest).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(digest)
}

/// Verifies a clear-text password against a stored digest.
///
/// # Errors
///
/// Returns an error if the digest is not a parseable PHC string. A
/// well-formed digest that simply does not match yields `Ok(false)`.
///
/// # Examples
///
/// ```
/// use moorage::auth::{hash_password, verify_password};
///
/// let digest = hash_password("secret").unwrap();
/// assert!(!verify_password("wrong", &digest).unwrap());
/// ```
pub fn verify_password(password: &str, digest: &str) -> Result<bool> {
    let parsed = PasswordHash::new(digest)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Claims embedded in issued bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's record id, as a string.
    pub sub: String,
    /// The user's email address.
    pub email: String,
    /// Optional role claim; no role is enforced by the library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued-at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

/// Issues and verifies bearer tokens (HS256).
///
/// # Examples
///
/// ```
/// use moorage::auth::TokenService;
///
/// let tokens = TokenService::new("a-shared-secret");
/// ```
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: String,
    ttl: Duration,
}

impl TokenService {
    /// Creates a token service with the default 24-hour lifetime.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::hours(24),
        }
    }

    /// Sets the token lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issues a signed token for the given user.
    ///
    /// The role claim is carried verbatim when the caller supplies one;
    /// the library itself never assigns roles.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue(&self, user: &User, role: Option<&str>) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: role.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verifies a token's signature and expiry and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenInvalid`] for a bad signature, malformed
    /// token, or expired claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

/// The caller's resolved identity.
///
/// Built from verified claims by the caller layer and passed explicitly
/// into operations that require authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The authenticated user's record id.
    pub user_id: UserId,
    /// Optional role claim from the token.
    pub role: Option<String>,
}

impl Identity {
    /// Builds an identity from verified token claims.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenInvalid`] if the subject claim is not a
    /// record id.
    pub fn from_claims(claims: &Claims) -> Result<Self> {
        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| Error::TokenInvalid {
                reason: format!("subject '{}' is not a user id", claims.sub),
            })?;
        Ok(Self {
            user_id,
            role: claims.role.clone(),
        })
    }
}

/// Authenticates a user and issues a bearer token.
///
/// Unknown email and wrong password are indistinguishable to the
/// caller: both yield [`Error::InvalidCredentials`].
///
/// # Errors
///
/// Returns [`Error::InvalidCredentials`] on a failed login, or a
/// storage/hashing fault.
pub fn login(db: &Database, email: &str, password: &str, tokens: &TokenService) -> Result<String> {
    let email = normalize_email(email);
    let Some(user) = db.find_user_by_email(&email)? else {
        return Err(Error::InvalidCredentials);
    };
    if !verify_password(password, &user.password_digest)? {
        return Err(Error::InvalidCredentials);
    }
    log::debug!("issuing token for user {}", user.id);
    tokens.issue(&user, None)
}

/// Fetches the authenticated user's own record.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the account behind the identity no
/// longer exists.
pub fn profile(db: &Database, identity: &Identity) -> Result<User> {
    db.get_user(identity.user_id)?.ok_or_else(|| Error::NotFound {
        resource: format!("user {}", identity.user_id),
    })
}
