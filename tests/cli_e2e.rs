//! End-to-end tests for the CLI argument surface.
//!
//! These run the real binary but never reach the network or a browser:
//! they exercise only paths that exit during argument handling.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_missing_key_word_fails_with_usage() {
    let mut cmd = Command::cargo_bin("imgspider").expect("binary builds");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--key-word"));
}

#[test]
fn test_help_lists_all_flags() {
    let mut cmd = Command::cargo_bin("imgspider").expect("binary builds");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--key-word"))
        .stdout(predicate::str::contains("--number"))
        .stdout(predicate::str::contains("--save-dir"))
        .stdout(predicate::str::contains("--workers"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("imgspider").expect("binary builds");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_zero_quota_rejected_before_any_work() {
    let mut cmd = Command::cargo_bin("imgspider").expect("binary builds");
    cmd.args(["-k", "cats", "-n", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_worker_count_rejected() {
    let mut cmd = Command::cargo_bin("imgspider").expect("binary builds");
    cmd.args(["-k", "cats", "-c", "40"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
