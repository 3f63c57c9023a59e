//! Booking admission: reservation create, update, and delete planning.
//!
//! Admission runs two checks in a fixed order: the catway must exist and
//! be in the bookable state, and no other reservation on the same catway
//! may overlap the candidate's window. The order matters to callers: a
//! berth under repair reports "unavailable", never "dates conflict",
//! even when both are true.
//!
//! On update, the overlap scan excludes the reservation being modified,
//! so re-asserting the same dates always passes. A missing reservation
//! id is only reported once the admission checks have passed.

use crate::booking::{NewReservation, ReservationId};
use crate::catway::GOOD_CONDITION;
use crate::database::Database;
use crate::error::{Error, Result};

use super::plan::{OperationPlan, PlanAction};

// Shared by create and update planning: usability gate strictly before
// overlap scan.
fn check_admission(
    db: &Database,
    candidate: &NewReservation,
    exclude: Option<ReservationId>,
) -> Result<()> {
    match db.find_catway_by_number(candidate.catway_number)? {
        None => {
            return Err(Error::CatwayUnavailable {
                number: candidate.catway_number,
                state: None,
            });
        }
        Some(catway) if catway.state != GOOD_CONDITION => {
            log::debug!(
                "refusing booking on catway {}: state '{}'",
                candidate.catway_number,
                catway.state
            );
            return Err(Error::CatwayUnavailable {
                number: candidate.catway_number,
                state: Some(catway.state),
            });
        }
        Some(_) => {}
    }

    if let Some(existing) =
        db.find_overlapping_reservation(candidate.catway_number, &candidate.window, exclude)?
    {
        log::debug!(
            "refusing booking on catway {}: collides with reservation {}",
            candidate.catway_number,
            existing.id
        );
        return Err(Error::BookingConflict {
            number: candidate.catway_number,
            start: existing.window.start(),
            end: existing.window.end(),
        });
    }

    Ok(())
}

/// Plans the creation of a reservation.
///
/// # Examples
///
/// ```no_run
/// use chrono::{TimeZone, Utc};
/// use moorage::database::{Database, DatabaseConfig};
/// use moorage::operations::{BookingPlan, PlanExecutor};
/// use moorage::{BookingWindow, CatwayNumber, NewReservation};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/moorage.db")).unwrap();
/// let candidate = NewReservation::new(
///     CatwayNumber::try_from(4).unwrap(),
///     "Jean Dupont",
///     "Le Grand Bleu",
///     BookingWindow::new(
///         Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
///         Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap(),
///     ).unwrap(),
/// ).unwrap();
///
/// let plan = BookingPlan::new(candidate).build_plan(&db).unwrap();
/// let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
/// assert!(result.reservation.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct BookingPlan {
    candidate: NewReservation,
}

impl BookingPlan {
    /// Creates a plan builder for a new reservation.
    #[must_use]
    pub const fn new(candidate: NewReservation) -> Self {
        Self { candidate }
    }

    /// Builds an operation plan for this booking.
    ///
    /// Runs the admission checks against current data but does not
    /// write; the executor re-runs them inside its write transaction.
    ///
    /// # Errors
    ///
    /// - [`Error::CatwayUnavailable`] if the catway is absent or not in
    ///   the bookable state
    /// - [`Error::BookingConflict`] if an existing reservation's window
    ///   overlaps the candidate's
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        check_admission(db, &self.candidate, None)?;

        Ok(OperationPlan::new(format!(
            "Book catway {} for {}",
            self.candidate.catway_number, self.candidate.client_name
        ))
        .add_action(PlanAction::CreateReservation(self.candidate.clone())))
    }
}

/// Plans the replacement of a reservation.
#[derive(Debug, Clone)]
pub struct BookingUpdatePlan {
    id: ReservationId,
    candidate: NewReservation,
}

impl BookingUpdatePlan {
    /// Creates a plan builder for a reservation update.
    #[must_use]
    pub const fn new(id: ReservationId, candidate: NewReservation) -> Self {
        Self { id, candidate }
    }

    /// Builds an operation plan for this update.
    ///
    /// The overlap scan excludes the reservation being updated. The
    /// admission checks run before any existence check on `id`, so a
    /// rejected catway or window is reported even for ids that do not
    /// exist; the executor surfaces [`Error::NotFound`] afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::CatwayUnavailable`] or [`Error::BookingConflict`] as on
    /// create.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        check_admission(db, &self.candidate, Some(self.id))?;

        Ok(OperationPlan::new(format!(
            "Move reservation {} on catway {}",
            self.id, self.candidate.catway_number
        ))
        .add_action(PlanAction::UpdateReservation {
            id: self.id,
            candidate: self.candidate.clone(),
        }))
    }
}

/// Plans the deletion of a reservation.
///
/// Deletion needs no availability re-check; freeing a window never
/// conflicts with anything.
#[derive(Debug, Clone)]
pub struct BookingDeletePlan {
    id: ReservationId,
}

impl BookingDeletePlan {
    /// Creates a plan builder for a reservation deletion.
    #[must_use]
    pub const fn new(id: ReservationId) -> Self {
        Self { id }
    }

    /// Builds an operation plan for this deletion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no reservation has this id.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        if db.get_reservation(self.id)?.is_none() {
            return Err(Error::NotFound {
                resource: format!("reservation {}", self.id),
            });
        }

        Ok(OperationPlan::new(format!("Delete reservation {}", self.id))
            .add_action(PlanAction::DeleteReservation { id: self.id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingWindow;
    use crate::catway::{CatwayNumber, CatwayPatch, CatwayType};
    use crate::database::DatabaseConfig;
    use crate::operations::PlanExecutor;
    use chrono::{DateTime, TimeZone, Utc};
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

    fn book(db: &mut Database, catway: i64, start: u32, end: u32) -> crate::Reservation {
        let plan = BookingPlan::new(candidate(catway, start, end))
            .build_plan(db)
            .unwrap();
        PlanExecutor::new(db)
            .execute(&plan)
            .unwrap()
            .reservation
            .unwrap()
    }

    #[test]
    fn test_booking_scenario_catway_four() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();

        // A: June 1-10 admitted
        book(&mut db, 4, 1, 10);

        // B: June 10-15 refused, boundary overlap
        let err = BookingPlan::new(candidate(4, 10, 15))
            .build_plan(&db)
            .unwrap_err();
        assert!(matches!(err, Error::BookingConflict { .. }));

        // C: June 11-15 admitted
        book(&mut db, 4, 11, 15);
        assert_eq!(db.list_reservations().unwrap().len(), 2);
    }

    #[test]
    fn test_booking_refused_on_unusable_catway() {
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

        // Dates are free; the state alone refuses the booking
        let err = BookingPlan::new(candidate(5, 1, 10))
            .build_plan(&db)
            .unwrap_err();
        match err {
            Error::CatwayUnavailable { state, .. } => {
                assert_eq!(state.as_deref(), Some("en réparation"));
            }
            other => panic!("expected CatwayUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_booking_refused_on_missing_catway() {
        let (_dir, db) = test_db();
        let err = BookingPlan::new(candidate(9, 1, 10))
            .build_plan(&db)
            .unwrap_err();
        assert!(matches!(err, Error::CatwayUnavailable { state: None, .. }));
    }

    #[test]
    fn test_unavailability_reported_before_conflict() {
        let (_dir, mut db) = test_db();
        let catway = db.create_catway(number(5), CatwayType::Long).unwrap();
        book(&mut db, 5, 1, 10);
        db.update_catway(
            catway.id,
            &CatwayPatch {
                state: Some("hors service".into()),
                ..CatwayPatch::default()
            },
        )
        .unwrap();

        let err = BookingPlan::new(candidate(5, 5, 12))
            .build_plan(&db)
            .unwrap_err();
        assert!(matches!(err, Error::CatwayUnavailable { .. }));
    }

    #[test]
    fn test_update_plan_excludes_self() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        let reservation = book(&mut db, 4, 1, 10);

        // Unchanged dates pass the scan thanks to self-exclusion
        let plan = BookingUpdatePlan::new(reservation.id, candidate(4, 1, 10))
            .build_plan(&db)
            .unwrap();
        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert_eq!(result.reservation.unwrap().id, reservation.id);
    }

    #[test]
    fn test_update_plan_conflicts_with_others() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        book(&mut db, 4, 1, 10);
        let second = book(&mut db, 4, 15, 20);

        let err = BookingUpdatePlan::new(second.id, candidate(4, 5, 20))
            .build_plan(&db)
            .unwrap_err();
        assert!(matches!(err, Error::BookingConflict { .. }));
    }

    #[test]
    fn test_update_missing_id_reported_after_checks() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();

        // Checks pass, so planning succeeds; execution reports NotFound
        let plan = BookingUpdatePlan::new(42, candidate(4, 1, 10))
            .build_plan(&db)
            .unwrap();
        let err = PlanExecutor::new(&mut db).execute(&plan).unwrap_err();
        assert!(err.is_not_found());

        // An unusable catway is reported instead, before any id check
        let err = BookingUpdatePlan::new(42, candidate(9, 1, 10))
            .build_plan(&db)
            .unwrap_err();
        assert!(matches!(err, Error::CatwayUnavailable { .. }));
    }

    #[test]
    fn test_delete_plan() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();
        let reservation = book(&mut db, 4, 1, 10);

        let plan = BookingDeletePlan::new(reservation.id).build_plan(&db).unwrap();
        PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert!(db.get_reservation(reservation.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_plan_missing_reservation() {
        let (_dir, db) = test_db();
        let err = BookingDeletePlan::new(42).build_plan(&db).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_dry_run_reports_without_booking() {
        let (_dir, mut db) = test_db();
        db.create_catway(number(4), CatwayType::Short).unwrap();

        let plan = BookingPlan::new(candidate(4, 1, 10)).build_plan(&db).unwrap();
        let result = PlanExecutor::new(&mut db).dry_run().execute(&plan).unwrap();
        assert!(result.dry_run);
        assert!(db.list_reservations().unwrap().is_empty());
    }
}
