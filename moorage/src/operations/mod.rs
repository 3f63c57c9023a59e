//! Marina operations using the plan-execute pattern.
//!
//! Every mutating operation is split into two phases:
//! 1. **Planning**: analyzes the request, runs the admission or
//!    uniqueness checks against current data, and builds an
//!    [`OperationPlan`]
//! 2. **Execution**: a [`PlanExecutor`] applies the plan through the
//!    store's checked write methods, which re-verify the same
//!    constraints inside their write transaction
//!
//! The split buys dry-run mode and early, precise errors; the
//! re-verification at write time means two racing callers can never both
//! slip an overlapping booking past the scan.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::{TimeZone, Utc};
//! use moorage::database::{Database, DatabaseConfig};
//! use moorage::operations::{BookingPlan, CatwayCreatePlan, PlanExecutor};
//! use moorage::{BookingWindow, CatwayNumber, CatwayType, NewReservation};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/moorage.db")).unwrap();
//! let number = CatwayNumber::try_from(4).unwrap();
//!
//! let plan = CatwayCreatePlan::new(number, CatwayType::Short)
//!     .build_plan(&db)
//!     .unwrap();
//! PlanExecutor::new(&mut db).execute(&plan).unwrap();
//!
//! let candidate = NewReservation::new(
//!     number,
//!     "Jean Dupont",
//!     "Le Grand Bleu",
//!     BookingWindow::new(
//!         Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
//!         Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap(),
//!     ).unwrap(),
//! ).unwrap();
//! let plan = BookingPlan::new(candidate).build_plan(&db).unwrap();
//! let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
//! assert!(result.reservation.is_some());
//! ```

pub mod account;
pub mod booking;
pub mod catway;
pub mod executor;
pub mod plan;

pub use account::{AccountDeletePlan, AccountPatch, AccountUpdatePlan, RegisterPlan};
pub use booking::{BookingDeletePlan, BookingPlan, BookingUpdatePlan};
pub use catway::{CatwayCreatePlan, CatwayDeletePlan, CatwayUpdatePlan};
pub use executor::{ExecutionResult, PlanExecutor};
pub use plan::{OperationPlan, PlanAction};
