//! Account administration: registration, update, and delete planning.
//!
//! Password hashing happens here, at the point the storage-ready record
//! is constructed; the store below only ever sees digests, and nothing
//! hashes implicitly on save.

use crate::auth::hash_password;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::user::{normalize_email, NewUser, Registration, UserId, UserPatch};

use super::plan::{OperationPlan, PlanAction};

/// Plans the registration of a new user account.
///
/// # Examples
///
/// ```no_run
/// use moorage::database::{Database, DatabaseConfig};
/// use moorage::operations::{PlanExecutor, RegisterPlan};
/// use moorage::Registration;
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/moorage.db")).unwrap();
/// let registration =
///     Registration::new("Dupont", None, "jean@port.fr", "secret").unwrap();
///
/// let plan = RegisterPlan::new(registration).build_plan(&db).unwrap();
/// let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
/// assert!(result.user.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RegisterPlan {
    registration: Registration,
}

impl RegisterPlan {
    /// Creates a plan builder for a registration.
    #[must_use]
    pub const fn new(registration: Registration) -> Self {
        Self { registration }
    }

    /// Builds an operation plan for this registration.
    ///
    /// The clear-text password is consumed by the hashing step here;
    /// only the digest enters the plan.
    ///
    /// # Errors
    ///
    /// - [`Error::EmailTaken`] if an account already holds the email
    /// - [`Error::PasswordHash`] if the hashing primitive fails
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        if db.find_user_by_email(&self.registration.email)?.is_some() {
            return Err(Error::EmailTaken {
                email: self.registration.email.clone(),
            });
        }

        let password_digest = hash_password(&self.registration.password)?;
        let new = NewUser {
            name: self.registration.name.clone(),
            firstname: self.registration.firstname.clone(),
            email: self.registration.email.clone(),
            password_digest,
        };

        Ok(
            OperationPlan::new(format!("Register account {}", new.email))
                .add_action(PlanAction::CreateUser(new)),
        )
    }
}

/// A partial account update as received from the caller.
///
/// The password, when present, is still in clear; planning hashes it.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    /// New last name, if changing.
    pub name: Option<String>,
    /// New first name, if changing.
    pub firstname: Option<String>,
    /// New email, if changing (normalized during planning).
    pub email: Option<String>,
    /// New clear-text password, if changing.
    pub password: Option<String>,
}

/// Plans a partial update of a user account.
#[derive(Debug, Clone)]
pub struct AccountUpdatePlan {
    /// Target record id.
    pub id: UserId,
    /// Fields to change.
    pub patch: AccountPatch,
}

impl AccountUpdatePlan {
    /// Creates a plan builder for an account update.
    #[must_use]
    pub const fn new(id: UserId, patch: AccountPatch) -> Self {
        Self { id, patch }
    }

    /// Builds an operation plan for this update.
    ///
    /// A new email is normalized to lowercase and re-validated for
    /// uniqueness; a new password is hashed here.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no user has this id
    /// - [`Error::EmailTaken`] if the patched email belongs to another
    ///   account
    /// - [`Error::PasswordHash`] if the hashing primitive fails
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let Some(existing) = db.get_user(self.id)? else {
            return Err(Error::NotFound {
                resource: format!("user {}", self.id),
            });
        };

        let email = self.patch.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            if *email != existing.email {
                if let Some(holder) = db.find_user_by_email(email)? {
                    if holder.id != self.id {
                        return Err(Error::EmailTaken {
                            email: email.clone(),
                        });
                    }
                }
            }
        }

        let password_digest = match &self.patch.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let patch = UserPatch {
            name: self.patch.name.clone(),
            firstname: self.patch.firstname.clone(),
            email,
            password_digest,
        };

        Ok(
            OperationPlan::new(format!("Update account {}", existing.email)).add_action(
                PlanAction::UpdateUser {
                    id: self.id,
                    patch,
                },
            ),
        )
    }
}

/// Plans the deletion of a user account.
#[derive(Debug, Clone)]
pub struct AccountDeletePlan {
    /// Target record id.
    pub id: UserId,
}

impl AccountDeletePlan {
    /// Creates a plan builder for an account deletion.
    #[must_use]
    pub const fn new(id: UserId) -> Self {
        Self { id }
    }

    /// Builds an operation plan for this deletion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no user has this id.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let Some(existing) = db.get_user(self.id)? else {
            return Err(Error::NotFound {
                resource: format!("user {}", self.id),
            });
        };

        Ok(
            OperationPlan::new(format!("Delete account {}", existing.email))
                .add_action(PlanAction::DeleteUser { id: self.id }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::database::DatabaseConfig;
    use crate::operations::PlanExecutor;
    use tempfile::tempdir;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let db = Database::open(DatabaseConfig::new(dir.path().join("test.db"))).unwrap();
        (dir, db)
    }

    fn register(db: &mut Database, email: &str, password: &str) -> crate::User {
        let registration = Registration::new("Dupont", None, email, password).unwrap();
        let plan = RegisterPlan::new(registration).build_plan(db).unwrap();
        PlanExecutor::new(db).execute(&plan).unwrap().user.unwrap()
    }

    #[test]
    fn test_register_hashes_password() {
        let (_dir, mut db) = test_db();
        let user = register(&mut db, "jean@port.fr", "secret");

        assert_ne!(user.password_digest, "secret");
        assert!(verify_password("secret", &user.password_digest).unwrap());
    }

    #[test]
    fn test_register_duplicate_email_case_insensitive() {
        let (_dir, mut db) = test_db();
        register(&mut db, "Jean@Port.FR", "secret");

        // Stored lowercase
        let stored = db.find_user_by_email("jean@port.fr").unwrap().unwrap();
        assert_eq!(stored.email, "jean@port.fr");

        // Second registration differs only in case
        let registration =
            Registration::new("Durand", None, "JEAN@port.fr", "other").unwrap();
        let err = RegisterPlan::new(registration).build_plan(&db).unwrap_err();
        assert!(matches!(err, Error::EmailTaken { .. }));
        assert_eq!(db.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_update_rehashes_password() {
        let (_dir, mut db) = test_db();
        let user = register(&mut db, "jean@port.fr", "secret");

        let patch = AccountPatch {
            password: Some("new-secret".into()),
            ..AccountPatch::default()
        };
        let plan = AccountUpdatePlan::new(user.id, patch).build_plan(&db).unwrap();
        let updated = PlanExecutor::new(&mut db)
            .execute(&plan)
            .unwrap()
            .user
            .unwrap();

        assert!(verify_password("new-secret", &updated.password_digest).unwrap());
        assert!(!verify_password("secret", &updated.password_digest).unwrap());
    }

    #[test]
    fn test_update_normalizes_email() {
        let (_dir, mut db) = test_db();
        let user = register(&mut db, "jean@port.fr", "secret");

        let patch = AccountPatch {
            email: Some("Jean.Durand@Port.FR".into()),
            ..AccountPatch::default()
        };
        let plan = AccountUpdatePlan::new(user.id, patch).build_plan(&db).unwrap();
        let updated = PlanExecutor::new(&mut db)
            .execute(&plan)
            .unwrap()
            .user
            .unwrap();
        assert_eq!(updated.email, "jean.durand@port.fr");
    }

    #[test]
    fn test_update_email_conflict() {
        let (_dir, mut db) = test_db();
        register(&mut db, "jean@port.fr", "secret");
        let other = register(&mut db, "marie@port.fr", "secret");

        let patch = AccountPatch {
            email: Some("JEAN@port.fr".into()),
            ..AccountPatch::default()
        };
        let err = AccountUpdatePlan::new(other.id, patch)
            .build_plan(&db)
            .unwrap_err();
        assert!(matches!(err, Error::EmailTaken { .. }));
    }

    #[test]
    fn test_update_missing_user() {
        let (_dir, db) = test_db();
        let err = AccountUpdatePlan::new(42, AccountPatch::default())
            .build_plan(&db)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_account() {
        let (_dir, mut db) = test_db();
        let user = register(&mut db, "jean@port.fr", "secret");

        let plan = AccountDeletePlan::new(user.id).build_plan(&db).unwrap();
        PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert!(db.get_user(user.id).unwrap().is_none());

        let err = AccountDeletePlan::new(user.id).build_plan(&db).unwrap_err();
        assert!(err.is_not_found());
    }
}
