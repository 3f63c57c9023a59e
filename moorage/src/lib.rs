#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # moorage
//!
//! A library for managing marina catway berth bookings.
//!
//! This library provides the core types and operations of a marina
//! booking backend: catway (berth) administration, reservation admission
//! with closed-interval overlap detection, and user accounts with hashed
//! credentials and bearer tokens.
//!
//! ## Core Types
//!
//! - [`Catway`], [`CatwayNumber`], [`CatwayType`]: berth records with a
//!   state gating new bookings
//! - [`Reservation`], [`NewReservation`], [`BookingWindow`]: bookings
//!   over closed date intervals
//! - [`User`], [`Registration`]: accounts with argon2-hashed passwords
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Admission rule
//!
//! A candidate booking is admitted iff its catway exists in the bookable
//! state and no reservation on the same catway overlaps its window,
//! where `[s1, e1]` and `[s2, e2]` overlap iff `s1 <= e2 && e1 >= s2`.
//! Touching boundaries count as overlap.
//!
//! ## Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use moorage::{BookingWindow, CatwayNumber};
//!
//! let number = CatwayNumber::try_from(4).unwrap();
//! assert_eq!(number.value(), 4);
//!
//! let june = |day| Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap();
//! let a = BookingWindow::new(june(1), june(10)).unwrap();
//! let b = BookingWindow::new(june(10), june(15)).unwrap();
//! assert!(a.overlaps(&b));
//! ```

pub mod auth;
pub mod booking;
pub mod catway;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod operations;
pub mod user;

// Re-export key types at crate root for convenience
pub use auth::{Claims, Identity, TokenService};
pub use booking::{BookingWindow, NewReservation, Reservation, ReservationId};
pub use catway::{Catway, CatwayId, CatwayNumber, CatwayPatch, CatwayType, GOOD_CONDITION};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, ErrorKind, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    AccountDeletePlan, AccountPatch, AccountUpdatePlan, BookingDeletePlan, BookingPlan,
    BookingUpdatePlan, CatwayCreatePlan, CatwayDeletePlan, CatwayUpdatePlan, ExecutionResult,
    OperationPlan, PlanAction, PlanExecutor, RegisterPlan,
};
pub use user::{Registration, User, UserId, UserPatch};
