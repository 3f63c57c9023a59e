//! User command implementations.
//!
//! Account management. `register` is open (it is how the first account
//! comes to exist); list, update, and remove require a bearer token.

use clap::{Args, Subcommand};

use moorage::{
    AccountDeletePlan, AccountPatch, AccountUpdatePlan, PlanExecutor, RegisterPlan, Registration,
};

use crate::error::CliError;
use crate::utils::{authenticate, load_configuration, open_database, print_dry_run, GlobalOptions};

/// Manage user accounts.
#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a new account
    Register(UserRegisterCommand),

    /// List accounts
    List(UserListCommand),

    /// Update an account
    Update(UserUpdateCommand),

    /// Remove an account
    Remove(UserRemoveCommand),
}

impl UserCommand {
    /// Execute the selected subcommand.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        match self {
            Self::Register(cmd) => cmd.execute(global),
            Self::List(cmd) => cmd.execute(global),
            Self::Update(cmd) => cmd.execute(global),
            Self::Remove(cmd) => cmd.execute(global),
        }
    }
}

/// Register a new account.
#[derive(Args)]
pub struct UserRegisterCommand {
    /// Last name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// First name
    #[arg(long, value_name = "NAME")]
    pub firstname: Option<String>,

    /// Email address (stored lowercase, unique)
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Password
    #[arg(long, value_name = "PASSWORD", env = "MOORAGE_PASSWORD")]
    pub password: String,
}

impl UserRegisterCommand {
    /// Execute the register command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(&config)?;

        let registration =
            Registration::new(self.name, self.firstname, self.email, self.password)
                .map_err(|e| CliError::InvalidArguments(e.to_string()))?;
        let plan = RegisterPlan::new(registration).build_plan(&db)?;
        let result = PlanExecutor::new(&mut db).execute(&plan)?;

        let user = result.user.expect("registration yields a user");
        if !global.quiet {
            println!("Registered {}", user.email);
        }
        Ok(())
    }
}

/// List accounts (never includes credential material).
#[derive(Args)]
pub struct UserListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl UserListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        authenticate(global, &config)?;
        let db = open_database(&config)?;

        let users = db.list_users()?;
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&users)
                    .map_err(|e| CliError::InvalidArguments(e.to_string()))?
            );
        } else {
            for user in &users {
                let firstname = user.firstname.as_deref().unwrap_or("-");
                println!("{}\t{}\t{}\t{}", user.id, user.name, firstname, user.email);
            }
        }
        Ok(())
    }
}

/// Update an account.
#[derive(Args)]
pub struct UserUpdateCommand {
    /// User record id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// New last name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// New first name
    #[arg(long, value_name = "NAME")]
    pub firstname: Option<String>,

    /// New email address
    #[arg(long, value_name = "EMAIL")]
    pub email: Option<String>,

    /// New password
    #[arg(long, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl UserUpdateCommand {
    /// Execute the update command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        authenticate(global, &config)?;
        let mut db = open_database(&config)?;

        let patch = AccountPatch {
            name: self.name,
            firstname: self.firstname,
            email: self.email,
            password: self.password,
        };
        let plan = AccountUpdatePlan::new(self.id, patch).build_plan(&db)?;

        if self.dry_run {
            let result = PlanExecutor::new(&mut db).dry_run().execute(&plan)?;
            print_dry_run(&result);
            return Ok(());
        }

        let result = PlanExecutor::new(&mut db).execute(&plan)?;
        let user = result.user.expect("update yields a user");
        if !global.quiet {
            println!("Updated {}", user.email);
        }
        Ok(())
    }
}

/// Remove an account.
#[derive(Args)]
pub struct UserRemoveCommand {
    /// User record id
    #[arg(value_name = "ID")]
    pub id: i64,
}

impl UserRemoveCommand {
    /// Execute the remove command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        authenticate(global, &config)?;
        let mut db = open_database(&config)?;

        let plan = AccountDeletePlan::new(self.id).build_plan(&db)?;
        PlanExecutor::new(&mut db).execute(&plan)?;
        if !global.quiet {
            println!("Removed user {}", self.id);
        }
        Ok(())
    }
}
