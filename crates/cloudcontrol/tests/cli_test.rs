//! Integration tests for the `cloudcontrol` CLI binary.
//!
//! Argument parsing, help output, completions and the failures that
//! happen before any request is sent. No CloudControl endpoint is needed.
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

const NOWHERE: &str = "/tmp/cloudcontrol-cli-test-nonexistent";

/// Build a [`Command`] for the `cloudcontrol` binary with env isolation.
///
/// Clears `CLOUDCONTROL_*` and `NTTCIS_*` variables and points HOME and
/// the config directory at a nonexistent path, so neither the user's
/// config nor their `~/.nttcis` is read.
fn cloudcontrol_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("cloudcontrol");
    cmd.env("HOME", NOWHERE)
        .env("XDG_CONFIG_HOME", NOWHERE)
        .env_remove("CLOUDCONTROL_PROFILE")
        .env_remove("CLOUDCONTROL_REGION")
        .env_remove("CLOUDCONTROL_OUTPUT")
        .env_remove("CLOUDCONTROL_INSECURE")
        .env_remove("CLOUDCONTROL_TIMEOUT")
        .env_remove("NTTCIS_USER")
        .env_remove("NTTCIS_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Same isolation, with the config directory at `config_home`.
fn cmd_with_config(config_home: &Path) -> assert_cmd::Command {
    let mut cmd = cloudcontrol_cmd();
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd
}

fn write_config(config_home: &Path, body: &str) {
    let dir = config_home.join("cloudcontrol");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), body).unwrap();
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = cloudcontrol_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    cloudcontrol_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("CloudControl")
            .and(predicate::str::contains("network-domain"))
            .and(predicate::str::contains("firewall"))
            .and(predicate::str::contains("ipam")),
    );
}

#[test]
fn test_version_flag() {
    cloudcontrol_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cloudcontrol"));
}

#[test]
fn test_subcommand_help() {
    cloudcontrol_cmd()
        .args(["server", "create", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--image-name")
                .and(predicate::str::contains("--wait-time")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    cloudcontrol_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cloudcontrol"));
}

#[test]
fn test_completions_invalid_shell() {
    cloudcontrol_cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .code(2);
}

// ── Regions (no session) ────────────────────────────────────────────

#[test]
fn test_regions_table() {
    cloudcontrol_cmd()
        .arg("regions")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("api-na.dimensiondata.com")
                .and(predicate::str::contains("Vendor")),
        );
}

#[test]
fn test_regions_plain_lists_keys() {
    let output = cloudcontrol_cmd()
        .args(["regions", "--output", "plain"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|l| l == "na"), "Expected 'na':\n{stdout}");
}

#[test]
fn test_regions_json() {
    let output = cloudcontrol_cmd()
        .args(["regions", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.trim_start().starts_with('['), "Expected a JSON array:\n{text}");
    assert!(text.contains("\"key\": \"na\""));
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_wait_time_requires_wait() {
    cloudcontrol_cmd()
        .args(["vlan", "delete", "v-1", "--wait-time", "60"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_invalid_output_format() {
    cloudcontrol_cmd()
        .args(["regions", "--output", "xml"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_server_create_needs_primary_nic() {
    let output = cloudcontrol_cmd()
        .args([
            "server",
            "create",
            "--network-domain",
            "nd-1",
            "--name",
            "web01",
            "--image",
            "img-1",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("--vlan"), "Expected NIC hint:\n{text}");
}

// ── Credentials and profiles ────────────────────────────────────────

#[test]
fn test_no_credentials_exit_code() {
    let output = cloudcontrol_cmd()
        .args(["network-domain", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let text = combined_output(&output);
    assert!(text.contains("NTTCIS_USER"), "Expected a credentials hint:\n{text}");
}

#[test]
fn test_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
[profiles.lab]
region = "eu"
user_id = "ops"
"#,
    );
    let output = cmd_with_config(home.path())
        .args(["--profile", "prod", "network-domain", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("prod"), "Expected profile name:\n{text}");
    assert!(text.contains("lab"), "Expected available profiles:\n{text}");
}

#[test]
fn test_unknown_region_flag() {
    cloudcontrol_cmd()
        .env("NTTCIS_USER", "ops")
        .env("NTTCIS_PASSWORD", "secret")
        .args(["--region", "mars", "network-domain", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("mars"));
}

#[test]
fn test_unknown_region_in_profile() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
default_profile = "lab"

[profiles.lab]
region = "mars"
"#,
    );
    cmd_with_config(home.path())
        .env("NTTCIS_USER", "ops")
        .env("NTTCIS_PASSWORD", "secret")
        .args(["network-domain", "list"])
        .assert()
        .failure()
        .code(2);
}
