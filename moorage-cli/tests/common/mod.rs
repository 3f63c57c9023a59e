//! Shared helpers for CLI integration tests.

use std::path::Path;
use std::process::Command;

use assert_cmd::cargo::cargo_bin;

/// Secret used by every test invocation.
pub const TEST_SECRET: &str = "cli-test-secret";

/// Creates a Command for the moorage binary against a test data dir.
#[allow(dead_code)]
pub fn moorage_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("moorage"));
    cmd.arg("--data-dir").arg(data_dir);
    cmd.env("MOORAGE_TOKEN_SECRET", TEST_SECRET);
    cmd.env_remove("MOORAGE_TOKEN");
    cmd.env_remove("MOORAGE_DATA_DIR");
    cmd.env_remove("MOORAGE_PASSWORD");
    cmd
}

/// Registers an account and returns a bearer token for it.
#[allow(dead_code)]
pub fn register_and_login(data_dir: &Path) -> String {
    let status = moorage_cmd(data_dir)
        .args([
            "user",
            "register",
            "--name",
            "Capitaine",
            "--email",
            "capitaine@port.fr",
            "--password",
            "secret",
        ])
        .status()
        .unwrap();
    assert!(status.success(), "registration failed");

    let output = moorage_cmd(data_dir)
        .args([
            "login",
            "--email",
            "capitaine@port.fr",
            "--password",
            "secret",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "login failed");
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}
