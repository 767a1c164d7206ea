use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures/france.map")
        .canonicalize()
        .expect("fixture map present")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("citymap");
    cmd.env("RUST_LOG", "error")
        .env_remove("CITYMAP_MAP")
        .arg("--map")
        .arg(fixture_path());
    cmd
}

#[test]
fn route_prints_each_city_with_running_total() {
    cli()
        .args(["route", "--from", "Rennes", "--to", "Lyon"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Route: Rennes -> Lyon (4 hops, cost 778, relaxation: as_observed)",
        ))
        .stdout(predicate::str::contains("  2: Limoges (+329, 436)"))
        .stdout(predicate::str::contains("  4: Lyon (+165, 778)"));
}

#[test]
fn reverse_flag_walks_back_from_goal() {
    cli()
        .args(["route", "--from", "Rennes", "--to", "Lyon", "--reverse"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Lyon <- Clermont-Ferrand <- Limoges <- Nantes <- Rennes",
        ));
}

#[test]
fn canonical_relaxation_is_selectable() {
    cli()
        .args([
            "route",
            "--from",
            "Caen",
            "--to",
            "Dijon",
            "--relaxation",
            "canonical",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("relaxation: canonical"))
        .stdout(predicate::str::contains("cost 545"));
}

#[test]
fn json_format_outputs_summary() {
    cli()
        .args(["--format", "json", "route", "--from", "Paris", "--to", "Nantes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cost\": 443"))
        .stdout(predicate::str::contains("\"name\": \"Orleans\""));
}

#[test]
fn unknown_city_error_is_friendly() {
    cli()
        .args(["route", "--from", "Renes", "--to", "Lyon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown city 'Renes'"))
        .stderr(predicate::str::contains("Did you mean 'Rennes'?"));
}

#[test]
fn small_budget_is_reported() {
    cli()
        .args(["route", "--from", "Rennes", "--to", "Lyon", "--max-iterations", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Search stopped after 3 iterations without reaching Lyon",
        ));
}

#[test]
fn map_path_can_come_from_the_environment() {
    let mut cmd = cargo_bin_cmd!("citymap");
    cmd.env("RUST_LOG", "error")
        .env("CITYMAP_MAP", fixture_path())
        .args(["route", "--from", "Caen", "--to", "Dijon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Caen -> Dijon"));
}
