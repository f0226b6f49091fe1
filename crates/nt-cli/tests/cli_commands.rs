#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable
#![allow(missing_docs)] // integration test crate

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn nt() -> Command {
    Command::cargo_bin("nt").unwrap()
}

// ---------------------------------------------------------------------------
// banner
// ---------------------------------------------------------------------------

#[test]
fn banner_names_every_mechanism() {
    nt().arg("mechanisms")
        .assert()
        .success()
        .stderr(
            predicate::str::contains("neurite mechanisms:")
                .and(predicate::str::contains("leak"))
                .and(predicate::str::contains("naf"))
                .and(predicate::str::contains("cad")),
        );
}

#[test]
fn banner_suppressed_by_flag() {
    nt().args(["mechanisms", "--no-banner"])
        .assert()
        .success()
        .stderr(predicate::str::contains("neurite mechanisms").not());
}

#[test]
fn banner_suppressed_for_nonzero_rank() {
    nt().args(["mechanisms", "--rank", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("neurite mechanisms").not());
}

#[test]
fn banner_rank_from_environment() {
    nt().arg("mechanisms")
        .env("NEURITE_RANK", "3")
        .assert()
        .success()
        .stderr(predicate::str::contains("neurite mechanisms").not());
}

// ---------------------------------------------------------------------------
// mechanisms
// ---------------------------------------------------------------------------

#[test]
fn mechanisms_lists_the_roster() {
    nt().args(["mechanisms", "--no-banner"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("leak")
                .and(predicate::str::contains("naf"))
                .and(predicate::str::contains("kdr"))
                .and(predicate::str::contains("kahp"))
                .and(predicate::str::contains("7 mechanism types registered")),
        );
}

#[test]
fn mechanisms_json_is_parseable() {
    let output = nt()
        .args(["mechanisms", "--no-banner", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let specs: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let names: Vec<&str> = specs
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["leak", "naf", "nap", "kdr", "km", "kahp", "cad"]);
}

// ---------------------------------------------------------------------------
// describe
// ---------------------------------------------------------------------------

#[test]
fn describe_shows_fields_and_kinds() {
    nt().args(["describe", "naf", "--no-banner"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("naf")
                .and(predicate::str::contains("gbar"))
                .and(predicate::str::contains("exponential update")),
        );
}

#[test]
fn describe_unknown_mechanism_fails() {
    nt().args(["describe", "nonexistent", "--no-banner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn describe_json_round_trips() {
    let output = nt()
        .args(["describe", "kahp", "--no-banner", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let spec: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(spec["name"], "kahp");
    assert_eq!(spec["states"][0]["kind"], "implicit");
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_reports_spikes_for_default_stimulus() {
    nt().args(["run", "--steps", "4000", "--no-banner"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Demo run")
                .and(predicate::str::contains("Compartment"))
                .and(predicate::str::contains("cmp0")),
        );
}

#[test]
fn run_writes_json_summary() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("summary.json");
    nt().args([
        "run",
        "--steps",
        "200",
        "--no-banner",
        "--output",
        path.to_str().unwrap(),
    ])
    .assert()
    .success();

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(summary["steps"], 200);
    assert_eq!(summary["final_voltages"].as_array().unwrap().len(), 1);
}

#[test]
fn run_rejects_zero_compartments() {
    nt().args(["run", "--compartments", "0", "--no-banner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one compartment"));
}

#[test]
fn run_is_deterministic_for_a_seed() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    for path in [&a, &b] {
        nt().args([
            "run",
            "--steps",
            "500",
            "--noise",
            "2.0",
            "--seed",
            "7",
            "--no-banner",
            "--output",
            path.to_str().unwrap(),
        ])
        .assert()
        .success();
    }
    assert_eq!(
        fs::read_to_string(&a).unwrap(),
        fs::read_to_string(&b).unwrap()
    );
}
