//! Catway types for marina berth management.
//!
//! This module provides types for working with catways (mooring berths),
//! including number validation, the short/long berth kinds, and the
//! operational state that gates bookings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The distinguished catway state that permits new bookings.
///
/// Any other state makes the catway unavailable for reservations.
pub const GOOD_CONDITION: &str = "bon état";

/// A valid catway number (>= 1).
///
/// Catway numbers identify berths on the pontoon and are unique across
/// the marina. Zero and negative numbers are invalid.
///
/// # Examples
///
/// ```
/// use moorage::CatwayNumber;
///
/// // Valid number
/// let number = CatwayNumber::try_from(4).unwrap();
/// assert_eq!(number.value(), 4);
///
/// // Invalid number (0)
/// assert!(CatwayNumber::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatwayNumber(u32);

impl CatwayNumber {
    /// The minimum valid catway number.
    pub const MIN: u32 = 1;

    /// Returns the underlying number.
    ///
    /// # Examples
    ///
    /// ```
    /// use moorage::CatwayNumber;
    ///
    /// let number = CatwayNumber::try_from(12).unwrap();
    /// assert_eq!(number.value(), 12);
    /// ```
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for CatwayNumber {
    type Error = InvalidCatwayNumberError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < i64::from(Self::MIN) {
            Err(InvalidCatwayNumberError {
                value,
                reason: "catway numbers start at 1".into(),
            })
        } else if value > i64::from(u32::MAX) {
            Err(InvalidCatwayNumberError {
                value,
                reason: "catway number is out of range".into(),
            })
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let value = value as u32;
            Ok(Self(value))
        }
    }
}

impl fmt::Display for CatwayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid catway numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCatwayNumberError {
    /// The invalid number value.
    pub value: i64,
    /// The reason the number is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidCatwayNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid catway number {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidCatwayNumberError {}

/// The kind of a catway: a short berth or a long one.
///
/// # Examples
///
/// ```
/// use moorage::CatwayType;
///
/// assert_eq!(CatwayType::parse("short").unwrap(), CatwayType::Short);
/// assert_eq!(format!("{}", CatwayType::Long), "long");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatwayType {
    /// A berth for boats up to the short-pontoon limit.
    Short,
    /// A berth on the long pontoon.
    Long,
}

impl fmt::Display for CatwayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Long => write!(f, "long"),
        }
    }
}

impl CatwayType {
    /// Parses a catway kind from a string.
    ///
    /// Recognizes: "short", "long" (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use moorage::CatwayType;
    ///
    /// assert_eq!(CatwayType::parse("LONG").unwrap(), CatwayType::Long);
    /// assert!(CatwayType::parse("medium").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            _ => Err(format!("invalid catway type: {s}")),
        }
    }
}

/// Identifier of a stored catway record.
pub type CatwayId = i64;

/// A catway record: a numbered berth with a kind and an operational state.
///
/// The state is free text; only the distinguished [`GOOD_CONDITION`] value
/// makes the catway bookable.
///
/// # Examples
///
/// ```
/// use moorage::{Catway, CatwayNumber, CatwayType};
///
/// let catway = Catway::new(1, CatwayNumber::try_from(4).unwrap(), CatwayType::Short);
/// assert!(catway.is_usable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catway {
    /// Record identifier.
    pub id: CatwayId,
    /// Unique berth number.
    pub number: CatwayNumber,
    /// Short or long berth.
    pub kind: CatwayType,
    /// Operational state; [`GOOD_CONDITION`] gates bookings.
    pub state: String,
}

impl Catway {
    /// Creates a catway record in the bookable state.
    ///
    /// Newly created catways always start in [`GOOD_CONDITION`]; any
    /// caller-supplied state is ignored at creation and can only be set
    /// through a later update.
    #[must_use]
    pub fn new(id: CatwayId, number: CatwayNumber, kind: CatwayType) -> Self {
        Self {
            id,
            number,
            kind,
            state: GOOD_CONDITION.to_string(),
        }
    }

    /// Returns `true` if this catway may accept new bookings.
    ///
    /// # Examples
    ///
    /// ```
    /// use moorage::{Catway, CatwayNumber, CatwayType};
    ///
    /// let mut catway = Catway::new(1, CatwayNumber::try_from(5).unwrap(), CatwayType::Long);
    /// assert!(catway.is_usable());
    ///
    /// catway.state = "en réparation".to_string();
    /// assert!(!catway.is_usable());
    /// ```
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.state == GOOD_CONDITION
    }
}

/// A partial update to a catway record.
///
/// `None` fields are left unchanged. Changing the number triggers a
/// fresh uniqueness check against every other catway.
///
/// # Examples
///
/// ```
/// use moorage::{CatwayPatch, CatwayType};
///
/// let patch = CatwayPatch {
///     kind: Some(CatwayType::Long),
///     ..CatwayPatch::default()
/// };
/// assert!(patch.number.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatwayPatch {
    /// New berth number, if changing.
    pub number: Option<CatwayNumber>,
    /// New berth kind, if changing.
    pub kind: Option<CatwayType>,
    /// New operational state, if changing.
    pub state: Option<String>,
}
