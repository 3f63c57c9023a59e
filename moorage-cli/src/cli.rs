//! CLI structure and command definitions.
//!
//! Defines the main CLI structure using clap's derive macros, including
//! global options and subcommands.

use crate::commands::{
    BookingCommand, CatwayCommand, InitCommand, LoginCommand, UserCommand, WhoamiCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for the marina booking backend.
#[derive(Parser)]
#[command(name = "moorage")]
#[command(version, about = "Manage marina catways and bookings", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "MOORAGE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Bearer token for authenticated commands
    #[arg(long, value_name = "TOKEN", global = true, env = "MOORAGE_TOKEN")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the database
    Init(InitCommand),

    /// Authenticate and print a bearer token
    Login(LoginCommand),

    /// Show the account behind the bearer token
    Whoami(WhoamiCommand),

    /// Administer catways (berths)
    #[command(subcommand)]
    Catway(CatwayCommand),

    /// Manage reservations
    #[command(subcommand)]
    Booking(BookingCommand),

    /// Manage user accounts
    #[command(subcommand)]
    User(UserCommand),
}
