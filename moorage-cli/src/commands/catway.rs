//! Catway command implementations.
//!
//! Berth administration: add, list, update, remove. All subcommands
//! require a bearer token.

use clap::{Args, Subcommand};

use moorage::{
    CatwayCreatePlan, CatwayDeletePlan, CatwayNumber, CatwayPatch, CatwayType, CatwayUpdatePlan,
    PlanExecutor,
};

use crate::error::CliError;
use crate::utils::{authenticate, load_configuration, open_database, print_dry_run, GlobalOptions};

/// Administer catways (berths).
#[derive(Subcommand)]
pub enum CatwayCommand {
    /// Add a catway
    Add(CatwayAddCommand),

    /// List catways
    List(CatwayListCommand),

    /// Update a catway
    Update(CatwayUpdateCommand),

    /// Remove a catway
    Remove(CatwayRemoveCommand),
}

impl CatwayCommand {
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

fn parse_number(value: i64) -> Result<CatwayNumber, CliError> {
    CatwayNumber::try_from(value).map_err(|e| CliError::InvalidArguments(e.to_string()))
}

fn parse_kind(value: &str) -> Result<CatwayType, CliError> {
    CatwayType::parse(value).map_err(CliError::InvalidArguments)
}

/// Add a catway with a unique number.
///
/// New catways always start in the bookable state.
#[derive(Args)]
pub struct CatwayAddCommand {
    /// Berth number (unique)
    #[arg(long, value_name = "NUMBER")]
    pub number: i64,

    /// Berth kind: short or long
    #[arg(long, value_name = "KIND")]
    pub kind: String,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl CatwayAddCommand {
    /// Execute the add command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        authenticate(global, &config)?;
        let mut db = open_database(&config)?;

        let plan = CatwayCreatePlan::new(parse_number(self.number)?, parse_kind(&self.kind)?)
            .build_plan(&db)?;

        if self.dry_run {
            let result = PlanExecutor::new(&mut db).dry_run().execute(&plan)?;
            print_dry_run(&result);
            return Ok(());
        }

        let result = PlanExecutor::new(&mut db).execute(&plan)?;
        let catway = result.catway.expect("create yields a catway");
        if !global.quiet {
            println!(
                "Created catway {} ({}, {})",
                catway.number, catway.kind, catway.state
            );
        }
        Ok(())
    }
}

/// List catways.
#[derive(Args)]
pub struct CatwayListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CatwayListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        authenticate(global, &config)?;
        let db = open_database(&config)?;

        let catways = db.list_catways()?;
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&catways)
                    .map_err(|e| CliError::InvalidArguments(e.to_string()))?
            );
        } else {
            for catway in &catways {
                println!(
                    "{}\t{}\t{}\t{}",
                    catway.id, catway.number, catway.kind, catway.state
                );
            }
        }
        Ok(())
    }
}

/// Update a catway (number, kind, and/or state).
#[derive(Args)]
pub struct CatwayUpdateCommand {
    /// Catway record id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// New berth number
    #[arg(long, value_name = "NUMBER")]
    pub number: Option<i64>,

    /// New berth kind: short or long
    #[arg(long, value_name = "KIND")]
    pub kind: Option<String>,

    /// New operational state (only "bon état" accepts bookings)
    #[arg(long, value_name = "STATE")]
    pub state: Option<String>,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl CatwayUpdateCommand {
    /// Execute the update command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        authenticate(global, &config)?;
        let mut db = open_database(&config)?;

        let patch = CatwayPatch {
            number: self.number.map(parse_number).transpose()?,
            kind: self.kind.as_deref().map(parse_kind).transpose()?,
            state: self.state,
        };
        let plan = CatwayUpdatePlan::new(self.id, patch).build_plan(&db)?;

        if self.dry_run {
            let result = PlanExecutor::new(&mut db).dry_run().execute(&plan)?;
            print_dry_run(&result);
            return Ok(());
        }

        for warning in &plan.warnings {
            eprintln!("warning: {warning}");
        }
        let result = PlanExecutor::new(&mut db).execute(&plan)?;
        let catway = result.catway.expect("update yields a catway");
        if !global.quiet {
            println!(
                "Updated catway {} ({}, {})",
                catway.number, catway.kind, catway.state
            );
        }
        Ok(())
    }
}

/// Remove a catway.
///
/// Reservations referencing the berth's number are left in place.
#[derive(Args)]
pub struct CatwayRemoveCommand {
    /// Catway record id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl CatwayRemoveCommand {
    /// Execute the remove command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        authenticate(global, &config)?;
        let mut db = open_database(&config)?;

        let plan = CatwayDeletePlan::new(self.id).build_plan(&db)?;

        if self.dry_run {
            let result = PlanExecutor::new(&mut db).dry_run().execute(&plan)?;
            print_dry_run(&result);
            return Ok(());
        }

        for warning in &plan.warnings {
            eprintln!("warning: {warning}");
        }
        PlanExecutor::new(&mut db).execute(&plan)?;
        if !global.quiet {
            println!("Removed catway {}", self.id);
        }
        Ok(())
    }
}
