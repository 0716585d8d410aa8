use std::fs;

use predicates::str::contains;
use tempfile::TempDir;

fn relay(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("relay");
    cmd.current_dir(dir.path())
        .env_remove("RELAY_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn amount_at_manager_limit_is_approved_by_manager() {
    let dir = TempDir::new().expect("create temp dir");

    relay(&dir)
        .args(["approve", "--amount", "1000.00", "--requester", "alice"])
        .assert()
        .success()
        .stdout(contains("$1000.00 for alice approved by Manager"));
}

#[test]
fn amount_just_above_manager_limit_goes_to_director() {
    let dir = TempDir::new().expect("create temp dir");

    relay(&dir)
        .args([
            "approve",
            "--amount",
            "1000.01",
            "--requester",
            "alice",
            "--description",
            "conference",
        ])
        .assert()
        .success()
        .stdout(contains("approved by Director"));
}

#[test]
fn amount_above_every_tier_is_rejected() {
    let dir = TempDir::new().expect("create temp dir");

    relay(&dir)
        .args(["approve", "--amount", "25000", "--requester", "bob"])
        .assert()
        .failure()
        .stderr(contains("error: expense was not approved"))
        .stderr(contains("caused by: request rejected by 'CFO'"));
}

#[test]
fn configured_tiers_replace_defaults() {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(
        dir.path().join("relay.toml"),
        r#"
[[approval.tiers]]
title = "Team Lead"
limit = "200"
"#,
    )
    .expect("write config");

    relay(&dir)
        .args(["approve", "--amount", "150", "--requester", "carol"])
        .assert()
        .success()
        .stdout(contains("approved by Team Lead"));
}

#[test]
fn malformed_amount_is_a_usage_error() {
    let dir = TempDir::new().expect("create temp dir");

    relay(&dir)
        .args(["approve", "--amount", "12.345", "--requester", "dave"])
        .assert()
        .code(2)
        .stderr(contains("--amount"));
}
