//! Plan execution engine.
//!
//! Takes operation plans and applies them to the database. Each action
//! runs through the store's checked write methods, which re-verify
//! admission constraints inside their own write transaction; planning
//! results are never trusted across the plan/execute gap.

use crate::booking::Reservation;
use crate::catway::Catway;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::user::User;

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
///
/// Carries descriptions of the actions taken and the records produced,
/// so callers can display or serialize what happened.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in
    /// dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The catway produced by a create/update action, if any.
    pub catway: Option<Catway>,

    /// The reservation produced by a create/update action, if any.
    pub reservation: Option<Reservation>,

    /// The user produced by a create/update action, if any.
    pub user: Option<User>,
}

impl ExecutionResult {
    fn from_plan(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            catway: None,
            reservation: None,
            user: None,
        }
    }
}

/// Executes operation plans against the database.
///
/// The executor can run in normal mode (applying changes) or dry-run
/// mode (reporting without changes).
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
///
/// let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
/// assert!(result.success);
/// assert!(result.catway.is_some());
/// ```
pub struct PlanExecutor<'a> {
    db: &'a mut Database,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub fn new(db: &'a mut Database) -> Self {
        Self { db, dry_run: false }
    }

    /// Sets the executor to dry-run mode.
    ///
    /// In dry-run mode the plan is reported but the database is not
    /// touched.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// # Errors
    ///
    /// Returns the first action's error: admission rejections
    /// ([`Error::CatwayUnavailable`], [`Error::BookingConflict`]),
    /// uniqueness conflicts, [`Error::NotFound`] for missing targets, or
    /// a storage fault.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::from_plan(plan, self.dry_run);
        if self.dry_run {
            return Ok(result);
        }

        for action in &plan.actions {
            self.execute_action(action, &mut result)?;
        }

        Ok(result)
    }

    /// Executes a single action, recording produced records on `result`.
    fn execute_action(&mut self, action: &PlanAction, result: &mut ExecutionResult) -> Result<()> {
        match action {
            PlanAction::CreateCatway { number, kind } => {
                result.catway = Some(self.db.create_catway(*number, *kind)?);
            }
            PlanAction::UpdateCatway { id, patch } => {
                result.catway = Some(self.db.update_catway(*id, patch)?);
            }
            PlanAction::DeleteCatway { id } => {
                if !self.db.delete_catway(*id)? {
                    return Err(Error::NotFound {
                        resource: format!("catway {id}"),
                    });
                }
            }
            PlanAction::CreateReservation(candidate) => {
                result.reservation = Some(self.db.create_reservation(candidate)?);
            }
            PlanAction::UpdateReservation { id, candidate } => {
                result.reservation = Some(self.db.update_reservation(*id, candidate)?);
            }
            PlanAction::DeleteReservation { id } => {
                if !self.db.delete_reservation(*id)? {
                    return Err(Error::NotFound {
                        resource: format!("reservation {id}"),
                    });
                }
            }
            PlanAction::CreateUser(new) => {
                result.user = Some(self.db.create_user(new)?);
            }
            PlanAction::UpdateUser { id, patch } => {
                result.user = Some(self.db.update_user(*id, patch)?);
            }
            PlanAction::DeleteUser { id } => {
                if !self.db.delete_user(*id)? {
                    return Err(Error::NotFound {
                        resource: format!("user {id}"),
                    });
                }
            }
        }
        Ok(())
    }
}
