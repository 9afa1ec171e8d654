#![allow(missing_docs)]

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn both_tables() {
    Command::cargo_bin("ecalcorr")
        .unwrap()
        .args(["read", "tests/data/test"])
        .assert()
        .success()
        .stdout(contains("gain-err"))
        .stdout(contains("1.02"))
        .stdout(contains("0.98"))
        .stdout(contains("rho-err"))
        .stdout(contains("0.0074"));
}

#[test]
fn smearings_only() {
    Command::cargo_bin("ecalcorr")
        .unwrap()
        .args(["read", "--smearings", "tests/data/test"])
        .assert()
        .success()
        .stdout(contains("0.0077"))
        .stdout(contains("1.02").not());
}

#[test]
fn scales_and_smearings_conflict() {
    Command::cargo_bin("ecalcorr")
        .unwrap()
        .args(["read", "--scales", "--smearings", "tests/data/test"])
        .assert()
        .failure();
}

#[test]
fn label_layout_from_config() {
    Command::cargo_bin("ecalcorr")
        .unwrap()
        .args(["--config", "tests/data/label.yaml", "read", "tests/data/label"])
        .assert()
        .success()
        .stdout(contains("0.0004"))
        .stdout(contains("999999"));
}

#[test]
fn missing_tables() {
    Command::cargo_bin("ecalcorr")
        .unwrap()
        .args(["read", "tests/data/missing"])
        .assert()
        .failure()
        .stderr(contains("scale and smearing correction maps are both empty"));
}
