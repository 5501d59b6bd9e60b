use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
        .canonicalize()
        .expect("fixture present")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("cableroute");
    cmd.env("RUST_LOG", "error").env("NO_COLOR", "1");
    cmd
}

fn with_fixtures() -> Command {
    let mut cmd = cli();
    cmd.arg("--config").arg(fixture_path("sample_config.json"));
    cmd
}

#[test]
fn route_prints_outcomes_and_summary() {
    let mut cmd = with_fixtures();
    cmd.arg("route")
        .arg("--drawing")
        .arg(fixture_path("sample_drawing.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("8 segments: 5 ok, 3 failed"))
        .stdout(predicate::str::contains(
            "1A0 X_BOX_P -> HBOX_3.5P 182.00 m | MPO 12H 200M | 182.0m | Res: 18.0m [OK]",
        ))
        .stdout(predicate::str::contains("[LOW_RESERVE]"))
        .stdout(predicate::str::contains("[INSUFFICIENT]"))
        .stdout(predicate::str::contains("1A6 [FAILED]"))
        .stdout(predicate::str::contains("(islands)"));
}

#[test]
fn route_writes_csv_report() {
    let temp = tempdir().expect("create temp dir");
    let report = temp.path().join("out").join("report.csv");

    let mut cmd = with_fixtures();
    cmd.arg("route")
        .arg("--drawing")
        .arg(fixture_path("sample_drawing.json"))
        .arg("--report")
        .arg(&report);
    cmd.assert().success();

    let text = fs::read_to_string(&report).expect("report written");
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("handle,origin,destination,route_length,assigned_cable,technical_name,reserve,status")
    );
    assert_eq!(lines.count(), 8);
    assert!(text.contains("1A4,FAT_INT_3.0_P,HBOX_3.5P,160.00,165,Distribution 2H,5.00,LOW_RESERVE"));
    // The failure reason contains a point "(x, y)", so the column is quoted.
    assert!(text.contains("1A7,,,,,,,\"FAILED: segment 1A7: no equipment within 5"));
}

#[test]
fn route_json_output_is_machine_readable() {
    let mut cmd = with_fixtures();
    cmd.arg("--format")
        .arg("json")
        .arg("route")
        .arg("--drawing")
        .arg(fixture_path("sample_drawing.json"));

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    let outcomes = value["outcomes"].as_array().expect("outcomes array");
    assert_eq!(outcomes.len(), 8);
    assert_eq!(outcomes[0]["handle"], "1A0");
    assert_eq!(outcomes[0]["result"]["status"], "routed");
    assert_eq!(outcomes[0]["result"]["cable"]["catalog_id"], "mpo_300");
    assert_eq!(outcomes[5]["result"]["status"], "failed");
    assert_eq!(outcomes[5]["result"]["error"]["kind"], "equipment_isolated");
}

#[test]
fn graph_stats_reports_network_shape() {
    let mut cmd = with_fixtures();
    cmd.arg("graph-stats")
        .arg("--drawing")
        .arg(fixture_path("sample_drawing.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Nodes: 8"))
        .stdout(predicate::str::contains("Edges: 6"))
        .stdout(predicate::str::contains("Components: 2"))
        .stdout(predicate::str::contains("Dropped degenerate segments: 1"));
}

#[test]
fn inventory_counts_equipment_by_name() {
    let mut cmd = cli();
    cmd.arg("--format")
        .arg("json")
        .arg("inventory")
        .arg("--drawing")
        .arg(fixture_path("sample_drawing.json"));

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(value["HBOX_3.5P"], 2);
    assert_eq!(value["FAT_FINAL_3.0_P"], 2);
    assert_eq!(value["X_BOX_P"], 1);
}

#[test]
fn nearest_finds_equipment_and_node() {
    let mut cmd = with_fixtures();
    cmd.arg("nearest")
        .arg("--drawing")
        .arg(fixture_path("sample_drawing.json"))
        .arg("--x")
        .arg("1")
        .arg("--y")
        .arg("1");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Nearest equipment: X_BOX_P"))
        .stdout(predicate::str::contains("layer EQUIPMENT"))
        .stdout(predicate::str::contains("ID_NAME = XB-01"))
        .stdout(predicate::str::contains("Nearest network node: (0.00, 0.00)"));
}

#[test]
fn nearest_rejects_non_positive_radius() {
    let mut cmd = with_fixtures();
    cmd.arg("nearest")
        .arg("--drawing")
        .arg(fixture_path("sample_drawing.json"))
        .arg("--x")
        .arg("0")
        .arg("--y")
        .arg("0")
        .arg("--radius")
        .arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--radius must be a positive number"));
}

#[test]
fn missing_config_file_fails() {
    let temp = tempdir().expect("create temp dir");
    let mut cmd = cli();
    cmd.arg("--config")
        .arg(temp.path().join("absent.json"))
        .arg("route")
        .arg("--drawing")
        .arg(fixture_path("sample_drawing.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn invalid_config_is_reported() {
    let temp = tempdir().expect("create temp dir");
    let config = temp.path().join("config.json");
    fs::write(&config, r#"{ "tolerances": { "snap_tolerance": 0.0 } }"#).expect("write config");

    let mut cmd = cli();
    cmd.arg("--config")
        .arg(&config)
        .arg("graph-stats")
        .arg("--drawing")
        .arg(fixture_path("sample_drawing.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("snap_tolerance"));
}

#[test]
fn route_without_catalog_fails_before_routing() {
    let temp = tempdir().expect("create temp dir");
    let config = temp.path().join("config.json");
    fs::write(&config, "{}").expect("write config");

    let mut cmd = cli();
    cmd.arg("--config")
        .arg(&config)
        .arg("route")
        .arg("--drawing")
        .arg(fixture_path("sample_drawing.json"));

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no cable catalog configured"));
}
