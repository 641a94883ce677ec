use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn testdata_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

fn standoff() -> Command {
    Command::cargo_bin("standoff").expect("standoff binary")
}

#[test]
fn replay_prints_summary() {
    standoff()
        .arg("replay")
        .arg(testdata_path("speaker_approach.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("scenario: speaker_approach"))
        .stdout(predicate::str::contains("tick   1: 0 target(s): no target (cycle 2)"))
        .stdout(predicate::str::contains("tag 7"))
        .stdout(predicate::str::contains("phase: succeeded"))
        .stdout(predicate::str::contains("cycles: 2"))
        .stdout(predicate::str::contains("pose: (x: 0.000, y: 0.000, heading: 0.00°)"));
}

#[test]
fn replay_writes_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report_path = dir.path().join("report.json");

    standoff()
        .arg("replay")
        .arg(testdata_path("speaker_approach.json"))
        .arg("--report")
        .arg(&report_path)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&report_path).expect("read report");
    let report: serde_json::Value = serde_json::from_str(&raw).expect("parse report");
    assert_eq!(report["phase"], "succeeded");
    assert_eq!(report["cycles"], 2);
    // The fourth frame is never consumed.
    assert_eq!(report["ticks"].as_array().map(Vec::len), Some(3));
    assert_eq!(report["ticks"][2]["outcome"]["outcome"], "succeeded");
    assert_eq!(report["ticks"][2]["selected_id"], 7);
}

#[test]
fn replay_timeout_scenario() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scenario = dir.path().join("dark.json");
    let frames = vec![serde_json::json!({}); 12];
    std::fs::write(
        &scenario,
        serde_json::json!({ "name": "dark", "frames": frames }).to_string(),
    )
    .expect("write scenario");

    standoff()
        .arg("replay")
        .arg(&scenario)
        .assert()
        .success()
        .stdout(predicate::str::contains("timed out after 11 cycles"))
        .stdout(predicate::str::contains("phase: timed_out"))
        .stdout(predicate::str::contains("pose: none"));
}

#[test]
fn missing_scenario_fails() {
    standoff()
        .arg("replay")
        .arg("/nonexistent/scenario.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: /nonexistent/scenario.json"));
}

#[test]
fn invalid_geometry_fails_instead_of_timing_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scenario = dir.path().join("bad_margin.json");
    std::fs::write(
        &scenario,
        serde_json::json!({
            "params": { "geometry": { "safety_margin": -5.0 } },
            "frames": [
                { "targets": [ { "id": 7, "translation": [3.0, 0.0, 0.0] } ] }
            ]
        })
        .to_string(),
    )
    .expect("write scenario");

    standoff()
        .arg("replay")
        .arg(&scenario)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: invalid poller params"))
        .stdout(predicate::str::contains("phase:").not());
}

#[test]
fn params_prints_defaults() {
    standoff()
        .arg("params")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_missed_cycles\": 10"))
        .stdout(predicate::str::contains("\"kind\": \"unlimited\""));
}
