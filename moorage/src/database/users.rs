//! Database CRUD operations for user accounts.
//!
//! Emails are stored lowercase; the uniqueness check and the write share
//! one IMMEDIATE transaction. Password digests go in and out of this
//! layer as opaque strings.

use chrono::Utc;
use rusqlite::{params, Connection, TransactionBehavior};

use crate::error::{Error, Result};
use crate::user::{NewUser, User, UserId, UserPatch};

use super::connection::Database;
use super::{datetime_to_unix_secs, unix_secs_to_datetime};

const SELECT_USER_BY_ID: &str = r"
    SELECT id, name, firstname, email, password_digest, created_at, updated_at
    FROM users
    WHERE id = ?
";

const SELECT_USER_BY_EMAIL: &str = r"
    SELECT id, name, firstname, email, password_digest, created_at, updated_at
    FROM users
    WHERE email = ?
";

const SELECT_EMAIL_HOLDER: &str = r"
    SELECT id FROM users WHERE email = ? AND id <> ?
";

const LIST_USERS: &str = r"
    SELECT id, name, firstname, email, password_digest, created_at, updated_at
    FROM users
    ORDER BY email
";

const INSERT_USER: &str = r"
    INSERT INTO users (name, firstname, email, password_digest, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";

const UPDATE_USER: &str = r"
    UPDATE users
    SET name = ?1, firstname = ?2, email = ?3, password_digest = ?4, updated_at = ?5
    WHERE id = ?6
";

const DELETE_USER: &str = r"
    DELETE FROM users WHERE id = ?
";

/// Deserializes a user from a database row.
///
/// Expects row fields in this order: id, name, firstname, email,
/// `password_digest`, `created_at`, `updated_at`.
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id: UserId = row.get(0)?;
    let name: String = row.get(1)?;
    let firstname: Option<String> = row.get(2)?;
    let email: String = row.get(3)?;
    let password_digest: String = row.get(4)?;
    let created_secs: i64 = row.get(5)?;
    let updated_secs: i64 = row.get(6)?;

    Ok(User {
        id,
        name,
        firstname,
        email,
        password_digest,
        created_at: unix_secs_to_datetime(created_secs)?,
        updated_at: unix_secs_to_datetime(updated_secs)?,
    })
}

fn find_user_by_email_record(conn: &Connection, email: &str) -> Result<Option<User>> {
    let mut stmt = conn.prepare(SELECT_USER_BY_EMAIL)?;
    match stmt.query_row(params![email], row_to_user) {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn get_user_record(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let mut stmt = conn.prepare(SELECT_USER_BY_ID)?;
    match stmt.query_row(params![id], row_to_user) {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Creates a user account with a unique email.
    ///
    /// The record arrives with its digest already computed; this layer
    /// never sees a clear-text password.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailTaken`] if another account holds the email,
    /// or a database error.
    pub fn create_user(&mut self, new: &NewUser) -> Result<User> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if find_user_by_email_record(&tx, &new.email)?.is_some() {
            return Err(Error::EmailTaken {
                email: new.email.clone(),
            });
        }

        let now = Utc::now();
        let now_secs = datetime_to_unix_secs(now);
        tx.execute(
            INSERT_USER,
            params![
                new.name,
                new.firstname,
                new.email,
                new.password_digest,
                now_secs,
                now_secs,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(User {
            id,
            name: new.name.clone(),
            firstname: new.firstname.clone(),
            email: new.email.clone(),
            password_digest: new.password_digest.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a user by record id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user(&self, id: UserId) -> Result<Option<User>> {
        get_user_record(&self.conn, id)
    }

    /// Retrieves a user by (normalized) email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        find_user_by_email_record(&self.conn, email)
    }

    /// Lists all user accounts, ordered by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(LIST_USERS)?;
        let rows = stmt.query_map([], row_to_user)?;
        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    /// Applies a partial update to a user account.
    ///
    /// A changed email is re-validated for uniqueness against every
    /// other account inside the same transaction as the write.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no user has this id
    /// - [`Error::EmailTaken`] if the patched email belongs to another
    ///   account
    pub fn update_user(&mut self, id: UserId, patch: &UserPatch) -> Result<User> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(existing) = get_user_record(&tx, id)? else {
            return Err(Error::NotFound {
                resource: format!("user {id}"),
            });
        };

        let email = patch.email.clone().unwrap_or_else(|| existing.email.clone());
        if email != existing.email {
            let holder = {
                let mut stmt = tx.prepare(SELECT_EMAIL_HOLDER)?;
                match stmt.query_row(params![email, id], |row| row.get::<_, UserId>(0)) {
                    Ok(other) => Some(other),
                    Err(rusqlite::Error::QueryReturnedNoRows) => None,
                    Err(e) => return Err(e.into()),
                }
            };
            if holder.is_some() {
                return Err(Error::EmailTaken { email });
            }
        }

        let name = patch.name.clone().unwrap_or_else(|| existing.name.clone());
        let firstname = patch
            .firstname
            .clone()
            .or_else(|| existing.firstname.clone());
        let password_digest = patch
            .password_digest
            .clone()
            .unwrap_or_else(|| existing.password_digest.clone());

        let updated_at = Utc::now();
        tx.execute(
            UPDATE_USER,
            params![
                name,
                firstname,
                email,
                password_digest,
                datetime_to_unix_secs(updated_at),
                id,
            ],
        )?;
        tx.commit()?;

        Ok(User {
            id,
            name,
            firstname,
            email,
            password_digest,
            created_at: existing.created_at,
            updated_at,
        })
    }

    /// Deletes a user account by record id.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the user was found and deleted
    /// - `Ok(false)` if no user has this id
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or delete fails.
    pub fn delete_user(&mut self, id: UserId) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let rows_affected = tx.execute(DELETE_USER, params![id])?;
        tx.commit()?;
        Ok(rows_affected > 0)
    }
}
