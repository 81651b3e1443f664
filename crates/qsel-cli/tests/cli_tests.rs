//! End-to-end tests running the `qsel` binary.
//!
//! Each test runs with an empty temporary `HOME` so no user session file
//! or `QSEL_*` variable leaks in.

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

fn qsel(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qsel"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("QSEL_BACKEND")
        .env_remove("QSEL_TOKEN")
        .env_remove("QSEL_SEED")
        .env_remove("QSEL_READS")
        .env_remove("QSEL_SWEEPS")
        .output()
        .expect("failed to run qsel")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const SCENARIO: &[&str] = &["--costs", "4,3,7,2,9", "--penalty", "50"];

fn with_scenario<'a>(command: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![command];
    args.extend_from_slice(SCENARIO);
    args.extend_from_slice(extra);
    args
}

#[test]
fn compile_json_has_expected_coefficients() {
    let home = TempDir::new().unwrap();
    let out = qsel(&home, &with_scenario("compile", &["-f", "json"]));
    assert!(out.status.success(), "{}", stderr(&out));

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["num_items"], 5);
    assert_eq!(report["qubo"]["offset"], 50.0);

    let entries = report["qubo"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 15);
    for e in entries {
        let (i, j) = (e["i"].as_u64().unwrap(), e["j"].as_u64().unwrap());
        let value = e["value"].as_f64().unwrap();
        if i == j {
            let expected = [-46.0, -47.0, -43.0, -48.0, -41.0][i as usize];
            assert_eq!(value, expected);
        } else {
            assert_eq!(value, 100.0);
        }
    }
}

#[test]
fn compile_table_output() {
    let home = TempDir::new().unwrap();
    let out = qsel(&home, &with_scenario("compile", &[]));
    assert!(out.status.success(), "{}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Entries: 15"));
    assert!(text.contains("Offset:  50"));
}

#[test]
fn compile_writes_output_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("qubo.yaml");
    let path_str = path.to_string_lossy().into_owned();
    let out = qsel(&home, &with_scenario("compile", &["-o", &path_str]));
    assert!(out.status.success(), "{}", stderr(&out));

    let doc: serde_json::Value = serde_yaml_ng::from_str(&fs::read_to_string(&path).unwrap())
        .unwrap();
    assert_eq!(doc["num_vars"], 5);
}

#[test]
fn solve_exhaustive_from_problem_file() {
    let home = TempDir::new().unwrap();
    let problem = home.path().join("problem.yaml");
    fs::write(&problem, "costs: [4, 3, 7, 2, 9]\npenalty: 50\n").unwrap();
    let problem_str = problem.to_string_lossy().into_owned();

    let out = qsel(&home, &["solve", "-i", &problem_str, "-f", "json"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["solution"]["solver"], "exhaustive");
    assert_eq!(report["solution"]["objective"], 2.0);
    assert_eq!(report["selection"]["selected"], serde_json::json!([3]));
    assert_eq!(report["optimal"], true);
    assert_eq!(report["session"]["solves"], 1);
}

#[test]
fn solve_anneal_with_session_file() {
    let home = TempDir::new().unwrap();
    let session = home.path().join("session.yaml");
    fs::write(&session, "backend: anneal\nseed: 3\nsweeps: 200\n").unwrap();
    let session_str = session.to_string_lossy().into_owned();

    let out = qsel(
        &home,
        &with_scenario("solve", &["--session", &session_str, "-f", "json"]),
    );
    assert!(out.status.success(), "{}", stderr(&out));

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["solution"]["solver"], "anneal");
    assert_eq!(report["optimal"], true);
}

#[test]
fn ising_json_preserves_offset_relation() {
    let home = TempDir::new().unwrap();
    let out = qsel(&home, &["ising", "--costs", "1,2", "--penalty", "10", "-f", "json"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let model: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(model["h"].as_array().unwrap().len(), 2);
    assert_eq!(model["j"], serde_json::json!([[0, 1, 5.0]]));
}

#[test]
fn weak_penalty_fails() {
    let home = TempDir::new().unwrap();
    let out = qsel(&home, &["compile", "--costs", "4,3,7,2,9", "--penalty", "10"]);
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Invalid penalty"));
}

#[test]
fn weak_penalty_allowed_with_skip() {
    let home = TempDir::new().unwrap();
    let out = qsel(
        &home,
        &[
            "compile",
            "--costs",
            "4,3,7,2,9",
            "--penalty",
            "10",
            "--penalty-policy",
            "skip",
        ],
    );
    assert!(out.status.success(), "{}", stderr(&out));
}

#[test]
fn size_mismatch_fails() {
    let home = TempDir::new().unwrap();
    let out = qsel(&home, &with_scenario("compile", &["--size", "6"]));
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Dimension mismatch"));
}

#[test]
fn unknown_backend_fails() {
    let home = TempDir::new().unwrap();
    let out = qsel(&home, &with_scenario("solve", &["-b", "qpu"]));
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Backend not found: qpu"));
}

#[test]
fn backends_lists_builtins() {
    let home = TempDir::new().unwrap();
    let out = qsel(&home, &["backends"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("exhaustive"));
    assert!(text.contains("anneal"));
}
