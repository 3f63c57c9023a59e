//! Database CRUD operations for catways.
//!
//! Writes that depend on existing data (number uniqueness) run their
//! check and the write inside one IMMEDIATE transaction.

use rusqlite::{params, Connection, TransactionBehavior};

use crate::catway::{Catway, CatwayId, CatwayNumber, CatwayPatch, CatwayType, GOOD_CONDITION};
use crate::error::{Error, Result};

use super::connection::Database;

const SELECT_CATWAY_BY_ID: &str = r"
    SELECT id, number, kind, state
    FROM catways
    WHERE id = ?
";

const SELECT_CATWAY_BY_NUMBER: &str = r"
    SELECT id, number, kind, state
    FROM catways
    WHERE number = ?
";

const SELECT_NUMBER_HOLDER: &str = r"
    SELECT id FROM catways WHERE number = ? AND id <> ?
";

const LIST_CATWAYS: &str = r"
    SELECT id, number, kind, state
    FROM catways
    ORDER BY number
";

const INSERT_CATWAY: &str = r"
    INSERT INTO catways (number, kind, state)
    VALUES (?1, ?2, ?3)
";

const UPDATE_CATWAY: &str = r"
    UPDATE catways
    SET number = ?1, kind = ?2, state = ?3
    WHERE id = ?4
";

const DELETE_CATWAY: &str = r"
    DELETE FROM catways WHERE id = ?
";

/// Deserializes a catway from a database row.
///
/// Expects row fields in this order: id, number, kind, state.
fn row_to_catway(row: &rusqlite::Row<'_>) -> rusqlite::Result<Catway> {
    let id: CatwayId = row.get(0)?;
    let number_value: i64 = row.get(1)?;
    let kind: String = row.get(2)?;
    let state: String = row.get(3)?;

    let number = CatwayNumber::try_from(number_value)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let kind = CatwayType::parse(&kind)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(e.into()))?;

    Ok(Catway {
        id,
        number,
        kind,
        state,
    })
}

pub(super) fn get_catway_record(conn: &Connection, id: CatwayId) -> Result<Option<Catway>> {
    let mut stmt = conn.prepare(SELECT_CATWAY_BY_ID)?;
    match stmt.query_row(params![id], row_to_catway) {
        Ok(catway) => Ok(Some(catway)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub(super) fn find_catway_by_number_record(
    conn: &Connection,
    number: CatwayNumber,
) -> Result<Option<Catway>> {
    let mut stmt = conn.prepare(SELECT_CATWAY_BY_NUMBER)?;
    match stmt.query_row(params![number.value()], row_to_catway) {
        Ok(catway) => Ok(Some(catway)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Creates a catway with a unique number.
    ///
    /// The new record always starts in [`GOOD_CONDITION`], whatever the
    /// caller wanted; state changes go through [`Database::update_catway`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::CatwayNumberTaken`] if another catway already
    /// holds the number, or a database error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use moorage::database::{Database, DatabaseConfig};
    /// use moorage::{CatwayNumber, CatwayType};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/moorage.db")).unwrap();
    /// let number = CatwayNumber::try_from(4).unwrap();
    /// let catway = db.create_catway(number, CatwayType::Short).unwrap();
    /// assert_eq!(catway.number, number);
    /// ```
    pub fn create_catway(&mut self, number: CatwayNumber, kind: CatwayType) -> Result<Catway> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if find_catway_by_number_record(&tx, number)?.is_some() {
            return Err(Error::CatwayNumberTaken { number });
        }

        tx.execute(
            INSERT_CATWAY,
            params![number.value(), kind.to_string(), GOOD_CONDITION],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Catway::new(id, number, kind))
    }

    /// Retrieves a catway by record id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_catway(&self, id: CatwayId) -> Result<Option<Catway>> {
        get_catway_record(&self.conn, id)
    }

    /// Retrieves a catway by business number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_catway_by_number(&self, number: CatwayNumber) -> Result<Option<Catway>> {
        find_catway_by_number_record(&self.conn, number)
    }

    /// Returns `true` iff a catway with this number exists and is in the
    /// bookable state.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn is_catway_usable(&self, number: CatwayNumber) -> Result<bool> {
        Ok(self
            .find_catway_by_number(number)?
            .is_some_and(|catway| catway.is_usable()))
    }

    /// Lists all catways, ordered by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_catways(&self) -> Result<Vec<Catway>> {
        let mut stmt = self.conn.prepare(LIST_CATWAYS)?;
        let rows = stmt.query_map([], row_to_catway)?;
        let mut catways = Vec::new();
        for row in rows {
            catways.push(row?);
        }
        Ok(catways)
    }

    /// Applies a partial update to a catway.
    ///
    /// A changed number is re-validated for uniqueness against every
    /// other catway inside the same transaction as the write.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no catway has this id
    /// - [`Error::CatwayNumberTaken`] if the patched number belongs to
    ///   another catway
    pub fn update_catway(&mut self, id: CatwayId, patch: &CatwayPatch) -> Result<Catway> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(existing) = get_catway_record(&tx, id)? else {
            return Err(Error::NotFound {
                resource: format!("catway {id}"),
            });
        };

        let number = patch.number.unwrap_or(existing.number);
        if number != existing.number {
            let holder = {
                let mut stmt = tx.prepare(SELECT_NUMBER_HOLDER)?;
                match stmt.query_row(params![number.value(), id], |row| {
                    row.get::<_, CatwayId>(0)
                }) {
                    Ok(other) => Some(other),
                    Err(rusqlite::Error::QueryReturnedNoRows) => None,
                    Err(e) => return Err(e.into()),
                }
            };
            if holder.is_some() {
                return Err(Error::CatwayNumberTaken { number });
            }
        }

        let kind = patch.kind.unwrap_or(existing.kind);
        let state = patch.state.clone().unwrap_or(existing.state);

        tx.execute(
            UPDATE_CATWAY,
            params![number.value(), kind.to_string(), state, id],
        )?;
        tx.commit()?;

        Ok(Catway {
            id,
            number,
            kind,
            state,
        })
    }

    /// Deletes a catway by record id.
    ///
    /// Existing reservations referencing the catway's number are left in
    /// place.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the catway was found and deleted
    /// - `Ok(false)` if no catway has this id
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or delete fails.
    pub fn delete_catway(&mut self, id: CatwayId) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let rows_affected = tx.execute(DELETE_CATWAY, params![id])?;
        tx.commit()?;
        Ok(rows_affected > 0)
    }
}
