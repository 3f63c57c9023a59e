//! Common test utilities for integration tests.
//!
//! Helper functions and fixture builders for exercising the moorage
//! library against a throwaway database.

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use moorage::database::{Database, DatabaseConfig};
use moorage::{BookingWindow, CatwayNumber, CatwayType, NewReservation};

/// Opens a fresh database in a temporary directory.
///
/// The `TempDir` must be kept alive for as long as the database is used.
#[allow(dead_code)]
pub fn create_test_database() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(DatabaseConfig::new(dir.path().join("test.db"))).unwrap();
    (dir, db)
}

/// Shorthand for a valid catway number.
#[allow(dead_code)]
pub fn catway_number(n: i64) -> CatwayNumber {
    CatwayNumber::try_from(n).unwrap()
}

/// Midnight UTC on a day of June 2024, the month every fixture books in.
#[allow(dead_code)]
pub fn june(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap()
}

/// Builder for candidate reservations with sensible defaults.
///
/// Defaults: catway 4, "Jean Dupont" on "Le Grand Bleu", June 1-10.
#[allow(dead_code)]
pub struct ReservationFixture {
    catway: i64,
    client_name: String,
    boat_name: String,
    start: u32,
    end: u32,
}

#[allow(dead_code)]
impl ReservationFixture {
    /// Creates a fixture builder with default values.
    pub fn new() -> Self {
        Self {
            catway: 4,
            client_name: "Jean Dupont".into(),
            boat_name: "Le Grand Bleu".into(),
            start: 1,
            end: 10,
        }
    }

    /// Sets the target catway number.
    pub fn on_catway(mut self, catway: i64) -> Self {
        self.catway = catway;
        self
    }

    /// Sets the client name.
    pub fn with_client(mut self, client: &str) -> Self {
        self.client_name = client.into();
        self
    }

    /// Sets the boat name.
    pub fn with_boat(mut self, boat: &str) -> Self {
        self.boat_name = boat.into();
        self
    }

    /// Sets the booking window as June days.
    pub fn with_days(mut self, start: u32, end: u32) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Builds the candidate reservation.
    pub fn build(self) -> NewReservation {
        NewReservation::new(
            catway_number(self.catway),
            self.client_name,
            self.boat_name,
            BookingWindow::new(june(self.start), june(self.end)).unwrap(),
        )
        .unwrap()
    }
}

/// Creates a usable catway with the given number.
#[allow(dead_code)]
pub fn create_catway(db: &mut Database, n: i64) -> moorage::Catway {
    db.create_catway(catway_number(n), CatwayType::Short).unwrap()
}
