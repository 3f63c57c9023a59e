//! Integration tests for the booking commands.
//!
//! Drives the binary end to end: register, login, create a catway, and
//! exercise the admission rules through the CLI surface.

mod common;

use assert_cmd::Command;
use common::{moorage_cmd, register_and_login};
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd(data_dir: &std::path::Path, token: &str) -> Command {
    let mut cmd = Command::from_std(moorage_cmd(data_dir));
    cmd.arg("--token").arg(token);
    cmd
}

struct Marina {
    dir: TempDir,
    token: String,
}

impl Marina {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let token = register_and_login(dir.path());
        Self { dir, token }
    }

    fn cmd(&self) -> Command {
        cmd(self.dir.path(), &self.token)
    }

    fn add_catway(&self, number: &str) {
        self.cmd()
            .args(["catway", "add", "--number", number, "--kind", "short"])
            .assert()
            .success();
    }
}

#[test]
fn test_booking_requires_token() {
    let dir = TempDir::new().unwrap();
    Command::from_std(moorage_cmd(dir.path()))
        .args([
            "booking", "add", "--catway", "4", "--client", "Jean", "--boat", "Bleu", "--from",
            "2024-06-01", "--to", "2024-06-10",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("authentication required"));
}

#[test]
fn test_booking_lifecycle() {
    let marina = Marina::new();
    marina.add_catway("4");

    marina
        .cmd()
        .args([
            "booking", "add", "--catway", "4", "--client", "Jean Dupont", "--boat",
            "Le Grand Bleu", "--from", "2024-06-01", "--to", "2024-06-10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Booked catway 4"));

    marina
        .cmd()
        .args(["booking", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jean Dupont"));

    marina
        .cmd()
        .args(["booking", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"client_name\": \"Jean Dupont\""));
}

#[test]
fn test_boundary_overlap_rejected_via_cli() {
    let marina = Marina::new();
    marina.add_catway("4");

    marina
        .cmd()
        .args([
            "booking", "add", "--catway", "4", "--client", "Jean", "--boat", "Bleu", "--from",
            "2024-06-01", "--to", "2024-06-10",
        ])
        .assert()
        .success();

    // Starts the day the first ends: refused with the rejection code
    marina
        .cmd()
        .args([
            "booking", "add", "--catway", "4", "--client", "Marie", "--boat", "Espadon",
            "--from", "2024-06-10", "--to", "2024-06-15",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already booked"));

    // A day later: admitted
    marina
        .cmd()
        .args([
            "booking", "add", "--catway", "4", "--client", "Marie", "--boat", "Espadon",
            "--from", "2024-06-11", "--to", "2024-06-15",
        ])
        .assert()
        .success();
}

#[test]
fn test_unusable_catway_rejected_via_cli() {
    let marina = Marina::new();
    marina.add_catway("5");

    // Catway record ids start at 1 in a fresh database
    marina
        .cmd()
        .args(["catway", "update", "1", "--state", "en réparation"])
        .assert()
        .success()
        .stderr(predicate::str::contains("will stop accepting bookings"));

    marina
        .cmd()
        .args([
            "booking", "add", "--catway", "5", "--client", "Jean", "--boat", "Bleu", "--from",
            "2024-06-01", "--to", "2024-06-10",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not available for booking"));
}

#[test]
fn test_booking_update_and_remove() {
    let marina = Marina::new();
    marina.add_catway("4");

    marina
        .cmd()
        .args([
            "booking", "add", "--catway", "4", "--client", "Jean", "--boat", "Bleu", "--from",
            "2024-06-01", "--to", "2024-06-10",
        ])
        .assert()
        .success();

    // Same dates on itself: self-exclusion admits it
    marina
        .cmd()
        .args([
            "booking", "update", "1", "--catway", "4", "--client", "Jean", "--boat", "Bleu",
            "--from", "2024-06-01", "--to", "2024-06-10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated reservation 1"));

    marina
        .cmd()
        .args(["booking", "remove", "1"])
        .assert()
        .success();

    marina
        .cmd()
        .args(["booking", "remove", "1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_booking_dry_run_books_nothing() {
    let marina = Marina::new();
    marina.add_catway("4");

    marina
        .cmd()
        .args([
            "booking", "add", "--catway", "4", "--client", "Jean", "--boat", "Bleu", "--from",
            "2024-06-01", "--to", "2024-06-10", "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run]"));

    marina
        .cmd()
        .args(["booking", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_inverted_dates_rejected() {
    let marina = Marina::new();
    marina.add_catway("4");

    marina
        .cmd()
        .args([
            "booking", "add", "--catway", "4", "--client", "Jean", "--boat", "Bleu", "--from",
            "2024-06-10", "--to", "2024-06-01",
        ])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("end date must not be before"));
}
