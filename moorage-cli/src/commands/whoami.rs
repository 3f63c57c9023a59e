//! Whoami command implementation.
//!
//! Resolves the bearer token to an identity and prints the account
//! behind it.

use clap::Args;

use crate::error::CliError;
use crate::utils::{authenticate, load_configuration, open_database, GlobalOptions};

/// Show the account behind the bearer token.
#[derive(Args)]
pub struct WhoamiCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl WhoamiCommand {
    /// Execute the whoami command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let identity = authenticate(global, &config)?;
        let db = open_database(&config)?;

        let user = moorage::auth::profile(&db, &identity)?;
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&user)
                    .map_err(|e| CliError::InvalidArguments(e.to_string()))?
            );
        } else {
            let firstname = user.firstname.as_deref().unwrap_or("-");
            println!("{}\t{}\t{}\t{}", user.id, user.name, firstname, user.email);
        }
        Ok(())
    }
}
