//! Catway administration: create, update, and delete planning.
//!
//! Creation forces the new berth into the bookable state whatever the
//! caller supplied, and number uniqueness is validated both here (for
//! early errors and dry-run) and again by the store at write time.

use crate::catway::{CatwayId, CatwayNumber, CatwayPatch, CatwayType, GOOD_CONDITION};
use crate::database::Database;
use crate::error::{Error, Result};

use super::plan::{OperationPlan, PlanAction};

/// Plans the creation of a catway.
///
/// # Examples
///
/// ```no_run
/// use moorage::database::{Database, DatabaseConfig};
/// use moorage::operations::{CatwayCreatePlan, PlanExecutor};
/// use moorage::{CatwayNumber, CatwayType};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/moorage.db")).unwrap();
/// let plan = CatwayCreatePlan::new(CatwayNumber::try_from(4).unwrap(), CatwayType::Short)
///     .build_plan(&db)
///     .unwrap();
/// let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CatwayCreatePlan {
    /// Berth number to assign.
    pub number: CatwayNumber,
    /// Berth kind.
    pub kind: CatwayType,
}

impl CatwayCreatePlan {
    /// Creates a plan builder for a new catway.
    #[must_use]
    pub const fn new(number: CatwayNumber, kind: CatwayType) -> Self {
        Self { number, kind }
    }

    /// Builds an operation plan for this creation.
    ///
    /// Validates but does not modify the database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CatwayNumberTaken`] if the number is already
    /// assigned.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        if db.find_catway_by_number(self.number)?.is_some() {
            return Err(Error::CatwayNumberTaken {
                number: self.number,
            });
        }

        Ok(
            OperationPlan::new(format!("Create catway {}", self.number)).add_action(
                PlanAction::CreateCatway {
                    number: self.number,
                    kind: self.kind,
                },
            ),
        )
    }
}

/// Plans a partial update of a catway.
#[derive(Debug, Clone)]
pub struct CatwayUpdatePlan {
    /// Target record id.
    pub id: CatwayId,
    /// Fields to change.
    pub patch: CatwayPatch,
}

impl CatwayUpdatePlan {
    /// Creates a plan builder for a catway update.
    #[must_use]
    pub const fn new(id: CatwayId, patch: CatwayPatch) -> Self {
        Self { id, patch }
    }

    /// Builds an operation plan for this update.
    ///
    /// A state change away from the bookable state produces a warning:
    /// existing reservations stay, but new ones will be refused.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no catway has this id
    /// - [`Error::CatwayNumberTaken`] if the patched number belongs to
    ///   another catway
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let Some(existing) = db.get_catway(self.id)? else {
            return Err(Error::NotFound {
                resource: format!("catway {}", self.id),
            });
        };

        if let Some(number) = self.patch.number {
            if number != existing.number {
                if let Some(holder) = db.find_catway_by_number(number)? {
                    if holder.id != self.id {
                        return Err(Error::CatwayNumberTaken { number });
                    }
                }
            }
        }

        let mut plan = OperationPlan::new(format!("Update catway {}", existing.number));

        if let Some(state) = &self.patch.state {
            if state != GOOD_CONDITION && existing.is_usable() {
                plan = plan.add_warning(format!(
                    "catway {} will stop accepting bookings (state '{state}')",
                    existing.number
                ));
            }
        }

        Ok(plan.add_action(PlanAction::UpdateCatway {
            id: self.id,
            patch: self.patch.clone(),
        }))
    }
}

/// Plans the deletion of a catway.
///
/// Deletion never cascades: reservations referencing the number stay in
/// place and the plan warns when any exist.
#[derive(Debug, Clone)]
pub struct CatwayDeletePlan {
    /// Target record id.
    pub id: CatwayId,
}

impl CatwayDeletePlan {
    /// Creates a plan builder for a catway deletion.
    #[must_use]
    pub const fn new(id: CatwayId) -> Self {
        Self { id }
    }

    /// Builds an operation plan for this deletion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no catway has this id.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        let Some(existing) = db.get_catway(self.id)? else {
            return Err(Error::NotFound {
                resource: format!("catway {}", self.id),
            });
        };

        let mut plan = OperationPlan::new(format!("Delete catway {}", existing.number));

        let bookings = db.count_reservations_for_catway(existing.number)?;
        if bookings > 0 {
            plan = plan.add_warning(format!(
                "{bookings} reservation(s) still reference catway {}",
                existing.number
            ));
        }

        Ok(plan.add_action(PlanAction::DeleteCatway { id: self.id }))
    }
}
