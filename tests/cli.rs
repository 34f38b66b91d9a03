//! Binary-level argument handling. Nothing here starts a relay loop: every
//! case fails validation before the engine would block on stdin.

use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn relay_rejects_unknown_unit() {
    Command::cargo_bin("stream-relay")
        .unwrap()
        .arg("5XYZ")
        .assert()
        .failure()
        .stderr(contains("invalid size"));
}

#[test]
fn relay_rejects_zero_capacity() {
    Command::cargo_bin("stream-relay")
        .unwrap()
        .arg("0KiB")
        .assert()
        .failure()
        .stderr(contains("non-zero"));
}

#[test]
fn relay_reports_version() {
    Command::cargo_bin("stream-relay")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("stream-relay"));
}

#[test]
fn ctl_rejects_unknown_unit() {
    Command::cargo_bin("relay-ctl")
        .unwrap()
        .args(["1", "resize", "5XYZ"])
        .assert()
        .failure()
        .stderr(contains("invalid size unit"));
}

#[test]
fn ctl_rejects_magnitude_beyond_payload_bits() {
    // 999999999 > 0x0FFFFFFF: must be refused before any signal is sent.
    Command::cargo_bin("relay-ctl")
        .unwrap()
        .args(["1", "resize", "999999999KiB"])
        .assert()
        .failure()
        .stderr(contains("too large"));
}

#[test]
fn ctl_rejects_zero_resize() {
    Command::cargo_bin("relay-ctl")
        .unwrap()
        .args(["1", "resize", "0MB"])
        .assert()
        .failure()
        .stderr(contains("zero"));
}

#[test]
fn ctl_requires_a_command() {
    Command::cargo_bin("relay-ctl")
        .unwrap()
        .arg("1")
        .assert()
        .failure();
}
