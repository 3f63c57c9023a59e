//! Main entry point for the moorage CLI.
//!
//! Command-line interface for the marina booking backend:
//! - `init`: initialize the database
//! - `login`: authenticate and print a bearer token
//! - `whoami`: show the account behind the bearer token
//! - `catway`: administer berths (add, list, update, remove)
//! - `booking`: manage reservations (add, list, update, remove)
//! - `user`: manage accounts (register, list, update, remove)

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _logger = moorage::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        token: cli.token,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Login(cmd) => cmd.execute(&global),
        cli::Command::Whoami(cmd) => cmd.execute(&global),
        cli::Command::Catway(cmd) => cmd.execute(&global),
        cli::Command::Booking(cmd) => cmd.execute(&global),
        cli::Command::User(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
