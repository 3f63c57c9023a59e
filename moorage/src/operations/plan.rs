//! Plan types for moorage operations.
//!
//! Plans describe what a planned operation will do to the store without
//! performing it, so callers can inspect or dry-run before executing.

use crate::booking::{NewReservation, ReservationId};
use crate::catway::{CatwayId, CatwayNumber, CatwayPatch, CatwayType};
use crate::user::{NewUser, UserId, UserPatch};

/// A single action to be taken during plan execution.
///
/// Each action corresponds to one write against the store. Actions that
/// depend on existing data (catway creation, booking admission, account
/// creation) are re-validated inside the executor's write transaction;
/// the planning-time checks exist for early errors and dry-run output.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Create a catway with a unique number, starting in the bookable
    /// state.
    CreateCatway {
        /// Berth number.
        number: CatwayNumber,
        /// Berth kind.
        kind: CatwayType,
    },

    /// Apply a partial update to a catway.
    UpdateCatway {
        /// Target record id.
        id: CatwayId,
        /// Fields to change.
        patch: CatwayPatch,
    },

    /// Delete a catway (no cascade to reservations).
    DeleteCatway {
        /// Target record id.
        id: CatwayId,
    },

    /// Create a reservation after admission checks.
    CreateReservation(NewReservation),

    /// Replace a reservation after admission checks.
    UpdateReservation {
        /// Target record id.
        id: ReservationId,
        /// The replacement candidate.
        candidate: NewReservation,
    },

    /// Delete a reservation.
    DeleteReservation {
        /// Target record id.
        id: ReservationId,
    },

    /// Create a user account with a unique email.
    CreateUser(NewUser),

    /// Apply a partial update to a user account.
    UpdateUser {
        /// Target record id.
        id: UserId,
        /// Fields to change (password already hashed).
        patch: UserPatch,
    },

    /// Delete a user account.
    DeleteUser {
        /// Target record id.
        id: UserId,
    },
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateCatway { number, kind } => {
                format!("Create catway {number} ({kind})")
            }
            Self::UpdateCatway { id, .. } => format!("Update catway {id}"),
            Self::DeleteCatway { id } => format!("Delete catway {id}"),
            Self::CreateReservation(candidate) => format!(
                "Book catway {} for {} ({})",
                candidate.catway_number, candidate.client_name, candidate.window
            ),
            Self::UpdateReservation { id, candidate } => format!(
                "Move reservation {id} to catway {} ({})",
                candidate.catway_number, candidate.window
            ),
            Self::DeleteReservation { id } => format!("Delete reservation {id}"),
            Self::CreateUser(new) => format!("Register account {}", new.email),
            Self::UpdateUser { id, .. } => format!("Update user {id}"),
            Self::DeleteUser { id } => format!("Delete user {id}"),
        }
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans are generated during the planning phase and can be inspected,
/// logged, or executed. They include a description, a sequence of
/// actions, and any warnings that should be communicated to the user.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use moorage::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Book catway 4");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
