//! Init command implementation.
//!
//! Creates (or verifies) the database and its schema at the configured
//! location.

use clap::Args;

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};

/// Initialize the moorage database.
#[derive(Args)]
pub struct InitCommand {}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(&config)?;

        // Opening ran schema initialization/compatibility checks
        let catways = db.list_catways()?.len();
        let reservations = db.list_reservations()?.len();
        if !global.quiet {
            println!(
                "Database ready ({catways} catway(s), {reservations} reservation(s))"
            );
        }
        Ok(())
    }
}
