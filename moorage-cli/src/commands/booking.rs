//! Booking command implementations.
//!
//! Reservation management: add, list (optionally current-only), update,
//! remove. All subcommands require a bearer token.

use chrono::Utc;
use clap::{Args, Subcommand};

use moorage::{
    BookingDeletePlan, BookingPlan, BookingUpdatePlan, BookingWindow, CatwayNumber,
    NewReservation, PlanExecutor, Reservation,
};

use crate::error::CliError;
use crate::utils::{
    authenticate, load_configuration, open_database, parse_instant, print_dry_run, GlobalOptions,
};

/// Manage reservations.
#[derive(Subcommand)]
pub enum BookingCommand {
    /// Book a catway for a date range
    Add(BookingAddCommand),

    /// List reservations
    List(BookingListCommand),

    /// Replace a reservation's details
    Update(BookingUpdateCommand),

    /// Remove a reservation
    Remove(BookingRemoveCommand),
}

impl BookingCommand {
    /// Execute the selected subcommand.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        match self {
            Self::Add(cmd) => cmd.execute(global),
            Self::List(cmd) => cmd.execute(global),
            Self::Update(cmd) => cmd.execute(global),
            Self::Remove(cmd) => cmd.execute(global),
        }
    }
}

fn build_candidate(
    catway: i64,
    client: String,
    boat: String,
    from: &str,
    to: &str,
) -> Result<NewReservation, CliError> {
    let number =
        CatwayNumber::try_from(catway).map_err(|e| CliError::InvalidArguments(e.to_string()))?;
    let window = BookingWindow::new(parse_instant(from)?, parse_instant(to)?)
        .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
    NewReservation::new(number, client, boat, window)
        .map_err(|e| CliError::InvalidArguments(e.to_string()))
}

fn print_reservation_line(reservation: &Reservation) {
    println!(
        "{}\tcatway {}\t{}\t{}\t{}",
        reservation.id,
        reservation.catway_number,
        reservation.client_name,
        reservation.boat_name,
        reservation.window
    );
}

/// Book a catway for a date range.
///
/// The catway must be in state "bon état" and the dates must not touch
/// any existing reservation on the same catway (bounds are inclusive).
#[derive(Args)]
pub struct BookingAddCommand {
    /// Catway number to book
    #[arg(long, value_name = "NUMBER")]
    pub catway: i64,

    /// Client name
    #[arg(long, value_name = "NAME")]
    pub client: String,

    /// Boat name
    #[arg(long, value_name = "NAME")]
    pub boat: String,

    /// First day of the booking (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE")]
    pub from: String,

    /// Last day of the booking, inclusive (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE")]
    pub to: String,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl BookingAddCommand {
    /// Execute the add command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        authenticate(global, &config)?;
        let mut db = open_database(&config)?;

        let candidate =
            build_candidate(self.catway, self.client, self.boat, &self.from, &self.to)?;
        let plan = BookingPlan::new(candidate).build_plan(&db)?;

        if self.dry_run {
            let result = PlanExecutor::new(&mut db).dry_run().execute(&plan)?;
            print_dry_run(&result);
            return Ok(());
        }

        let result = PlanExecutor::new(&mut db).execute(&plan)?;
        let reservation = result.reservation.expect("booking yields a reservation");
        if !global.quiet {
            println!(
                "Booked catway {} for {} ({})",
                reservation.catway_number, reservation.client_name, reservation.window
            );
        }
        Ok(())
    }
}

/// List reservations.
#[derive(Args)]
pub struct BookingListCommand {
    /// Only reservations in progress right now
    #[arg(long)]
    pub current: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl BookingListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        authenticate(global, &config)?;
        let db = open_database(&config)?;

        let reservations = if self.current {
            db.list_current_reservations(Utc::now())?
        } else {
            db.list_reservations()?
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&reservations)
                    .map_err(|e| CliError::InvalidArguments(e.to_string()))?
            );
        } else {
            for reservation in &reservations {
                print_reservation_line(reservation);
            }
        }
        Ok(())
    }
}

/// Replace a reservation's details.
///
/// Takes the full set of fields, like the booking form: the stored
/// reservation is replaced wholesale once the admission checks pass.
#[derive(Args)]
pub struct BookingUpdateCommand {
    /// Reservation record id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Catway number to book
    #[arg(long, value_name = "NUMBER")]
    pub catway: i64,

    /// Client name
    #[arg(long, value_name = "NAME")]
    pub client: String,

    /// Boat name
    #[arg(long, value_name = "NAME")]
    pub boat: String,

    /// First day of the booking (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE")]
    pub from: String,

    /// Last day of the booking, inclusive (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE")]
    pub to: String,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl BookingUpdateCommand {
    /// Execute the update command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        authenticate(global, &config)?;
        let mut db = open_database(&config)?;

        let candidate =
            build_candidate(self.catway, self.client, self.boat, &self.from, &self.to)?;
        let plan = BookingUpdatePlan::new(self.id, candidate).build_plan(&db)?;

        if self.dry_run {
            let result = PlanExecutor::new(&mut db).dry_run().execute(&plan)?;
            print_dry_run(&result);
            return Ok(());
        }

        let result = PlanExecutor::new(&mut db).execute(&plan)?;
        let reservation = result.reservation.expect("update yields a reservation");
        if !global.quiet {
            println!(
                "Updated reservation {} (catway {}, {})",
                reservation.id, reservation.catway_number, reservation.window
            );
        }
        Ok(())
    }
}

/// Remove a reservation.
#[derive(Args)]
pub struct BookingRemoveCommand {
    /// Reservation record id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl BookingRemoveCommand {
    /// Execute the remove command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        authenticate(global, &config)?;
        let mut db = open_database(&config)?;

        let plan = BookingDeletePlan::new(self.id).build_plan(&db)?;

        if self.dry_run {
            let result = PlanExecutor::new(&mut db).dry_run().execute(&plan)?;
            print_dry_run(&result);
            return Ok(());
        }

        PlanExecutor::new(&mut db).execute(&plan)?;
        if !global.quiet {
            println!("Removed reservation {}", self.id);
        }
        Ok(())
    }
}
