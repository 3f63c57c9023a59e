//! Login command implementation.
//!
//! Verifies credentials and prints a bearer token for use with the
//! authenticated commands (`--token` or `MOORAGE_TOKEN`).

use clap::Args;

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};

/// Authenticate and print a bearer token.
#[derive(Args)]
pub struct LoginCommand {
    /// Account email
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Account password
    #[arg(long, value_name = "PASSWORD", env = "MOORAGE_PASSWORD")]
    pub password: String,
}

impl LoginCommand {
    /// Execute the login command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(&config)?;
        let tokens = config
            .token_service()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let token = moorage::auth::login(&db, &self.email, &self.password, &tokens)?;
        println!("{token}");
        Ok(())
    }
}
