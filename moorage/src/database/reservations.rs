//! Database CRUD operations for reservations, including the admission
//! checks.
//!
//! Create and update run the full admission sequence (catway usability,
//! then overlap scan) inside the same IMMEDIATE transaction as the
//! write. Two concurrent requests for overlapping dates on one catway
//! therefore serialize: the second sees the first's row and is refused.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, TransactionBehavior};

use crate::booking::{BookingWindow, NewReservation, Reservation, ReservationId};
use crate::catway::{CatwayNumber, GOOD_CONDITION};
use crate::error::{Error, Result};

use super::catways::find_catway_by_number_record;
use super::connection::Database;
use super::{datetime_to_unix_secs, unix_secs_to_datetime};

const SELECT_RESERVATION_BY_ID: &str = r"
    SELECT id, catway_number, client_name, boat_name, start_date, end_date
    FROM reservations
    WHERE id = ?
";

const LIST_RESERVATIONS: &str = r"
    SELECT id, catway_number, client_name, boat_name, start_date, end_date
    FROM reservations
    ORDER BY start_date, id
";

const LIST_CURRENT_RESERVATIONS: &str = r"
    SELECT id, catway_number, client_name, boat_name, start_date, end_date
    FROM reservations
    WHERE start_date <= ?1 AND end_date >= ?1
    ORDER BY start_date, id
";

// The overlap scan: same catway, start <= candidate end, end >=
// candidate start. ?4 excludes the reservation being updated.
const SELECT_OVERLAPPING: &str = r"
    SELECT id, catway_number, client_name, boat_name, start_date, end_date
    FROM reservations
    WHERE catway_number = ?1
      AND start_date <= ?2
      AND end_date >= ?3
      AND (?4 IS NULL OR id <> ?4)
    LIMIT 1
";

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations (catway_number, client_name, boat_name, start_date, end_date)
    VALUES (?1, ?2, ?3, ?4, ?5)
";

const UPDATE_RESERVATION: &str = r"
    UPDATE reservations
    SET catway_number = ?1, client_name = ?2, boat_name = ?3, start_date = ?4, end_date = ?5
    WHERE id = ?6
";

const DELETE_RESERVATION: &str = r"
    DELETE FROM reservations WHERE id = ?
";

/// Deserializes a reservation from a database row.
///
/// Expects row fields in this order: id, `catway_number`, `client_name`,
/// `boat_name`, `start_date`, `end_date`.
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: ReservationId = row.get(0)?;
    let number_value: i64 = row.get(1)?;
    let client_name: String = row.get(2)?;
    let boat_name: String = row.get(3)?;
    let start_secs: i64 = row.get(4)?;
    let end_secs: i64 = row.get(5)?;

    let catway_number = CatwayNumber::try_from(number_value)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let window = BookingWindow::new(
        unix_secs_to_datetime(start_secs)?,
        unix_secs_to_datetime(end_secs)?,
    )
    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    Ok(Reservation {
        id,
        catway_number,
        client_name,
        boat_name,
        window,
    })
}

pub(super) fn find_overlapping_record(
    conn: &Connection,
    number: CatwayNumber,
    window: &BookingWindow,
    exclude: Option<ReservationId>,
) -> Result<Option<Reservation>> {
    let mut stmt = conn.prepare(SELECT_OVERLAPPING)?;
    match stmt.query_row(
        params![
            number.value(),
            datetime_to_unix_secs(window.end()),
            datetime_to_unix_secs(window.start()),
            exclude,
        ],
        row_to_reservation,
    ) {
        Ok(reservation) => Ok(Some(reservation)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// The admission sequence shared by create and update. Usability is
// checked strictly before the overlap scan so the two rejections stay
// distinguishable.
fn check_admission(
    conn: &Connection,
    candidate: &NewReservation,
    exclude: Option<ReservationId>,
) -> Result<()> {
    match find_catway_by_number_record(conn, candidate.catway_number)? {
        None => {
            return Err(Error::CatwayUnavailable {
                number: candidate.catway_number,
                state: None,
            });
        }
        Some(catway) if catway.state != GOOD_CONDITION => {
            return Err(Error::CatwayUnavailable {
                number: candidate.catway_number,
                state: Some(catway.state),
            });
        }
        Some(_) => {}
    }

    if let Some(existing) =
        find_overlapping_record(conn, candidate.catway_number, &candidate.window, exclude)?
    {
        return Err(Error::BookingConflict {
            number: candidate.catway_number,
            start: existing.window.start(),
            end: existing.window.end(),
        });
    }

    Ok(())
}

impl Database {
    /// Creates a reservation after the admission checks pass.
    ///
    /// The checks and the insert share one IMMEDIATE transaction.
    ///
    /// # Errors
    ///
    /// - [`Error::CatwayUnavailable`] if the catway is absent or not in
    ///   the bookable state
    /// - [`Error::BookingConflict`] if an existing reservation's window
    ///   overlaps the candidate's
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use chrono::{TimeZone, Utc};
    /// use moorage::database::{Database, DatabaseConfig};
    /// use moorage::{BookingWindow, CatwayNumber, NewReservation};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/moorage.db")).unwrap();
    /// let window = BookingWindow::new(
    ///     Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    ///     Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap(),
    /// ).unwrap();
    /// let candidate = NewReservation::new(
    ///     CatwayNumber::try_from(4).unwrap(),
    ///     "Jean Dupont",
    ///     "Le Grand Bleu",
    ///     window,
    /// ).unwrap();
    ///
    /// let reservation = db.create_reservation(&candidate).unwrap();
    /// assert_eq!(reservation.client_name, "Jean Dupont");
    /// ```
    pub fn create_reservation(&mut self, candidate: &NewReservation) -> Result<Reservation> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        check_admission(&tx, candidate, None)?;

        tx.execute(
            INSERT_RESERVATION,
            params![
                candidate.catway_number.value(),
                candidate.client_name,
                candidate.boat_name,
                datetime_to_unix_secs(candidate.window.start()),
                datetime_to_unix_secs(candidate.window.end()),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        log::debug!(
            "booked catway {} for {} ({})",
            candidate.catway_number,
            candidate.client_name,
            candidate.window
        );

        Ok(Reservation {
            id,
            catway_number: candidate.catway_number,
            client_name: candidate.client_name.clone(),
            boat_name: candidate.boat_name.clone(),
            window: candidate.window,
        })
    }

    /// Replaces a reservation after the admission checks pass.
    ///
    /// The overlap scan excludes the reservation being updated, so
    /// keeping the same dates is never a conflict with itself. A missing
    /// id is only reported once the admission checks have passed.
    ///
    /// # Errors
    ///
    /// - [`Error::CatwayUnavailable`] / [`Error::BookingConflict`] as on
    ///   create
    /// - [`Error::NotFound`] if no reservation has this id
    pub fn update_reservation(
        &mut self,
        id: ReservationId,
        candidate: &NewReservation,
    ) -> Result<Reservation> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        check_admission(&tx, candidate, Some(id))?;

        let rows_affected = tx.execute(
            UPDATE_RESERVATION,
            params![
                candidate.catway_number.value(),
                candidate.client_name,
                candidate.boat_name,
                datetime_to_unix_secs(candidate.window.start()),
                datetime_to_unix_secs(candidate.window.end()),
                id,
            ],
        )?;
        if rows_affected == 0 {
            return Err(Error::NotFound {
                resource: format!("reservation {id}"),
            });
        }
        tx.commit()?;

        Ok(Reservation {
            id,
            catway_number: candidate.catway_number,
            client_name: candidate.client_name.clone(),
            boat_name: candidate.boat_name.clone(),
            window: candidate.window,
        })
    }

    /// Retrieves a reservation by record id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_reservation(&self, id: ReservationId) -> Result<Option<Reservation>> {
        let mut stmt = self.conn.prepare(SELECT_RESERVATION_BY_ID)?;
        match stmt.query_row(params![id], row_to_reservation) {
            Ok(reservation) => Ok(Some(reservation)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists all reservations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_reservations(&self) -> Result<Vec<Reservation>> {
        let mut stmt = self.conn.prepare(LIST_RESERVATIONS)?;
        let rows = stmt.query_map([], row_to_reservation)?;
        let mut reservations = Vec::new();
        for row in rows {
            reservations.push(row?);
        }
        Ok(reservations)
    }

    /// Lists reservations whose window contains `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_current_reservations(&self, as_of: DateTime<Utc>) -> Result<Vec<Reservation>> {
        let mut stmt = self.conn.prepare(LIST_CURRENT_RESERVATIONS)?;
        let rows = stmt.query_map(params![datetime_to_unix_secs(as_of)], row_to_reservation)?;
        let mut reservations = Vec::new();
        for row in rows {
            reservations.push(row?);
        }
        Ok(reservations)
    }

    /// Finds any reservation on the catway whose window overlaps the
    /// given one, optionally excluding a reservation id.
    ///
    /// This is the advisory form of the scan used for planning; the
    /// write path re-runs it inside its own transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_overlapping_reservation(
        &self,
        number: CatwayNumber,
        window: &BookingWindow,
        exclude: Option<ReservationId>,
    ) -> Result<Option<Reservation>> {
        find_overlapping_record(&self.conn, number, window, exclude)
    }

    /// Counts reservations referencing a catway number.
    ///
    /// Used to warn about bookings that would be orphaned by a catway
    /// deletion (they are tolerated, not cascaded).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_reservations_for_catway(&self, number: CatwayNumber) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reservations WHERE catway_number = ?",
            params![number.value()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Deletes a reservation by record id.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the reservation was found and deleted
    /// - `Ok(false)` if no reservation has this id
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or delete fails.
    pub fn delete_reservation(&mut self, id: ReservationId) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let rows_affected = tx.execute(DELETE_RESERVATION, params![id])?;
        tx.commit()?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catway::{CatwayPatch, CatwayType};
    use crate::database::DatabaseConfig;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let db = Database::open(DatabaseConfig::new(dir.path().join("test.db"))).unwrap();
        (dir, db)
    }

    fn number(n: i64) -> CatwayNumber {
        CatwayNumber::try_from(n).unwrap()
    }

    fn june(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap()
    }

    fn candidate(catway: i64, start: u32, end: u32) -> NewReservation {
        NewReservation::new(
            number(catway),
            "Jean Dupont",
            "Le Grand Bleu",
            BookingWindow::new(june(start), june(end)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_create_reservation_on_usable_catway() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();

        let reservation = db.create_reservation(&candidate(4, 1, 10)).unwrap();
        assert_eq!(reservation.catway_number, number(4));
        assert_eq!(db.list_reservations().unwrap().len(), 1);
    }

    #[test]
    fn test_create_reservation_missing_catway() {
        let (_dir, mut db) = test_db();
        let err = db.create_reservation(&candidate(9, 1, 10)).unwrap_err();
        assert!(matches!(
            err,
            Error::CatwayUnavailable { state: None, .. }
        ));
    }

    #[test]
    fn test_create_reservation_unusable_catway() {
        let (_dir, mut db) = test_db();
        let catway = db.create_catway(number(5), CatwayType::Long).unwrap();
        db.update_catway(
            catway.id,
            &CatwayPatch {
                state: Some("en réparation".into()),
                ..CatwayPatch::default()
            },
        )
        .unwrap();

        let err = db.create_reservation(&candidate(5, 1, 10)).unwrap_err();
        match err {
            Error::CatwayUnavailable { state, .. } => {
                assert_eq!(state.as_deref(), Some("en réparation"));
            }
            other => panic!("expected CatwayUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_usability_checked_before_overlap() {
        let (_dir, mut db) = test_db();
        let catway = db.create_catway(number(5), CatwayType::Long).unwrap();
        db.create_reservation(&candidate(5, 1, 10)).unwrap();
        db.update_catway(
            catway.id,
            &CatwayPatch {
                state: Some("hors service".into()),
                ..CatwayPatch::default()
            },
        )
        .unwrap();

        // Dates overlap too, but the usability rejection wins
        let err = db.create_reservation(&candidate(5, 5, 12)).unwrap_err();
        assert!(matches!(err, Error::CatwayUnavailable { .. }));
    }

    #[test]
    fn test_overlapping_reservation_rejected() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        db.create_reservation(&candidate(4, 1, 10)).unwrap();

        let err = db.create_reservation(&candidate(4, 5, 12)).unwrap_err();
        assert!(matches!(err, Error::BookingConflict { .. }));
        assert_eq!(db.list_reservations().unwrap().len(), 1);
    }

    #[test]
    fn test_touching_boundary_rejected_gap_accepted() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        db.create_reservation(&candidate(4, 1, 10)).unwrap();

        // B starts the day A ends: boundary overlap
        let err = db.create_reservation(&candidate(4, 10, 15)).unwrap_err();
        assert!(matches!(err, Error::BookingConflict { .. }));

        // C starts the day after: admitted
        db.create_reservation(&candidate(4, 11, 15)).unwrap();
        assert_eq!(db.list_reservations().unwrap().len(), 2);
    }

    #[test]
    fn test_same_dates_on_other_catway_admitted() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        db.create_catway(number(5), CatwayType::Long).unwrap();
        db.create_reservation(&candidate(4, 1, 10)).unwrap();
        db.create_reservation(&candidate(5, 1, 10)).unwrap();
    }

    #[test]
    fn test_update_keeps_own_dates() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        let reservation = db.create_reservation(&candidate(4, 1, 10)).unwrap();

        // Same window: the scan must exclude the reservation itself
        let updated = db
            .update_reservation(reservation.id, &candidate(4, 1, 10))
            .unwrap();
        assert_eq!(updated.window, reservation.window);
    }

    #[test]
    fn test_update_conflicts_with_other_reservation() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        db.create_reservation(&candidate(4, 1, 10)).unwrap();
        let second = db.create_reservation(&candidate(4, 15, 20)).unwrap();

        let err = db
            .update_reservation(second.id, &candidate(4, 8, 20))
            .unwrap_err();
        assert!(matches!(err, Error::BookingConflict { .. }));
    }

    #[test]
    fn test_update_not_found_after_checks() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();

        let err = db.update_reservation(42, &candidate(4, 1, 10)).unwrap_err();
        assert!(err.is_not_found());

        // With an unusable catway the admission error comes first
        let err = db.update_reservation(42, &candidate(9, 1, 10)).unwrap_err();
        assert!(matches!(err, Error::CatwayUnavailable { .. }));
    }

    #[test]
    fn test_delete_reservation() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        let reservation = db.create_reservation(&candidate(4, 1, 10)).unwrap();

        assert!(db.delete_reservation(reservation.id).unwrap());
        assert!(!db.delete_reservation(reservation.id).unwrap());
    }

    #[test]
    fn test_delete_frees_the_window() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        let reservation = db.create_reservation(&candidate(4, 1, 10)).unwrap();
        db.delete_reservation(reservation.id).unwrap();

        db.create_reservation(&candidate(4, 1, 10)).unwrap();
    }

    #[test]
    fn test_list_current_reservations() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        db.create_catway(number(5), CatwayType::Long).unwrap();
        db.create_reservation(&candidate(4, 1, 10)).unwrap();
        db.create_reservation(&candidate(5, 20, 25)).unwrap();

        let current = db.list_current_reservations(june(5)).unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].catway_number, number(4));

        // Inclusive bounds on both ends
        let current = db.list_current_reservations(june(10)).unwrap();
        assert_eq!(current.len(), 1);
        let current = db.list_current_reservations(june(20)).unwrap();
        assert_eq!(current[0].catway_number, number(5));

        let current = db.list_current_reservations(june(12)).unwrap();
        assert!(current.is_empty());
    }

    #[test]
    fn test_find_overlapping_reservation_exclusion() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        let reservation = db.create_reservation(&candidate(4, 1, 10)).unwrap();

        let window = BookingWindow::new(june(5), june(12)).unwrap();
        let hit = db
            .find_overlapping_reservation(number(4), &window, None)
            .unwrap();
        assert_eq!(hit.unwrap().id, reservation.id);

        let excluded = db
            .find_overlapping_reservation(number(4), &window, Some(reservation.id))
            .unwrap();
        assert!(excluded.is_none());
    }

    #[test]
    fn test_orphaned_reservation_survives_catway_delete() {
        let (_dir, mut db) = test_db();
        let catway = db.create_catway(number(4), CatwayType::Short).unwrap();
        let reservation = db.create_reservation(&candidate(4, 1, 10)).unwrap();

        db.delete_catway(catway.id).unwrap();
        assert!(db.get_reservation(reservation.id).unwrap().is_some());

        // New bookings on the deleted number are refused
        let err = db.create_reservation(&candidate(4, 20, 25)).unwrap_err();
        assert!(matches!(err, Error::CatwayUnavailable { .. }));
    }
}
