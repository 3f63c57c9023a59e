//! Reservation types and the booking-window overlap rule.
//!
//! This module provides the types for catway reservations, including the
//! closed date interval a booking occupies and the overlap test that
//! decides whether two bookings on the same catway collide.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catway::CatwayNumber;

/// A closed interval of instants a booking occupies.
///
/// Both bounds are inclusive: a window ending at the exact instant
/// another starts still collides with it. This is a deliberate policy,
/// not an off-by-one.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use moorage::BookingWindow;
///
/// let a = BookingWindow::new(
///     Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap(),
/// ).unwrap();
/// let b = BookingWindow::new(
///     Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap(),
/// ).unwrap();
///
/// // Touching boundaries count as overlap
/// assert!(a.overlaps(&b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingWindow {
    /// Creates a new booking window.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `end`. (Inverted intervals
    /// would make the overlap test vacuously pass; they are rejected
    /// outright.)
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use moorage::BookingWindow;
    ///
    /// let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
    ///
    /// assert!(BookingWindow::new(start, end).is_ok());
    /// assert!(BookingWindow::new(end, start).is_err());
    ///
    /// // A single-instant window is valid
    /// assert!(BookingWindow::new(start, start).is_ok());
    /// ```
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError {
                field: "end_date".into(),
                message: "end date must not be before start date".into(),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns the inclusive start of the window.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the inclusive end of the window.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns `true` if the two windows share at least one instant.
    ///
    /// Two closed intervals `[s1, e1]` and `[s2, e2]` overlap iff
    /// `s1 <= e2 && e1 >= s2`. The test is symmetric.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use moorage::BookingWindow;
    ///
    /// let june = |day| Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap();
    ///
    /// let a = BookingWindow::new(june(1), june(10)).unwrap();
    /// let b = BookingWindow::new(june(11), june(15)).unwrap();
    /// assert!(!a.overlaps(&b));
    ///
    /// let c = BookingWindow::new(june(10), june(15)).unwrap();
    /// assert!(a.overlaps(&c));
    /// assert!(c.overlaps(&a));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Returns `true` if the window contains the given instant.
    ///
    /// Both bounds are inclusive; a reservation is "current" from the
    /// first instant of its window through the last.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl fmt::Display for BookingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// Identifier of a stored reservation record.
pub type ReservationId = i64;

/// A validated candidate reservation, not yet persisted.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use moorage::{BookingWindow, CatwayNumber, NewReservation};
///
/// let window = BookingWindow::new(
///     Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap(),
/// ).unwrap();
///
/// let candidate = NewReservation::new(
///     CatwayNumber::try_from(4).unwrap(),
///     "Jean Dupont",
///     "Le Grand Bleu",
///     window,
/// ).unwrap();
/// assert_eq!(candidate.client_name, "Jean Dupont");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    /// The target berth, referenced by business number (not record id).
    pub catway_number: CatwayNumber,
    /// Name of the client booking the berth.
    pub client_name: String,
    /// Name of the moored boat.
    pub boat_name: String,
    /// The closed interval the booking occupies.
    pub window: BookingWindow,
}

impl NewReservation {
    /// Creates a candidate reservation.
    ///
    /// Client and boat names are trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if either name is empty after trimming.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use moorage::{BookingWindow, CatwayNumber, NewReservation};
    ///
    /// let window = BookingWindow::new(
    ///     Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    ///     Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap(),
    /// ).unwrap();
    /// let number = CatwayNumber::try_from(4).unwrap();
    ///
    /// assert!(NewReservation::new(number, "Jean", "Le Grand Bleu", window).is_ok());
    /// assert!(NewReservation::new(number, "  ", "Le Grand Bleu", window).is_err());
    /// ```
    pub fn new(
        catway_number: CatwayNumber,
        client_name: impl Into<String>,
        boat_name: impl Into<String>,
        window: BookingWindow,
    ) -> Result<Self, ValidationError> {
        let client_name = required_field("client_name", client_name.into())?;
        let boat_name = required_field("boat_name", boat_name.into())?;
        Ok(Self {
            catway_number,
            client_name,
            boat_name,
            window,
        })
    }
}

/// A persisted catway reservation.
///
/// Reservations reference their catway by business number, not by record
/// id; the reference is checked at write time only and a deleted catway
/// leaves its reservations in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Record identifier.
    pub id: ReservationId,
    /// The booked berth's number.
    pub catway_number: CatwayNumber,
    /// Name of the client.
    pub client_name: String,
    /// Name of the boat.
    pub boat_name: String,
    /// The closed interval the booking occupies.
    pub window: BookingWindow,
}

impl Reservation {
    /// Returns `true` if the reservation is in progress at `as_of`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use moorage::{BookingWindow, CatwayNumber, Reservation};
    ///
    /// let june = |day| Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap();
    /// let reservation = Reservation {
    ///     id: 1,
    ///     catway_number: CatwayNumber::try_from(4).unwrap(),
    ///     client_name: "Jean".into(),
    ///     boat_name: "Le Grand Bleu".into(),
    ///     window: BookingWindow::new(june(1), june(10)).unwrap(),
    /// };
    ///
    /// assert!(reservation.is_current(june(5)));
    /// assert!(!reservation.is_current(june(11)));
    /// ```
    #[must_use]
    pub fn is_current(&self, as_of: DateTime<Utc>) -> bool {
        self.window.contains(as_of)
    }
}

fn required_field(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError {
            field: field.into(),
            message: format!("{field} must be non-empty after trimming whitespace"),
        });
    }
    Ok(trimmed.to_string())
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(all(test, feature = "property-tests"))]
mod proptests;
