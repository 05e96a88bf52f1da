use std::path::Path;
use std::process::Command;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hugoland-cli"))
}

fn read_json(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("read output");
    serde_json::from_str(&content).expect("valid json")
}

#[test]
fn cli_simulate_writes_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("report.json");
    let status = cli()
        .args([
            "--mode",
            "simulate",
            "--strategy",
            "grinder",
            "--seed",
            "42",
            "--rounds",
            "120",
            "--report",
            "json",
            "--save-dir",
        ])
        .arg(dir.path().join("saves"))
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let report = read_json(&output_path);
    assert_eq!(report["seed"], 42);
    assert_eq!(report["strategy"], "grinder");
    assert_eq!(report["simulated_secs"], 120);
    assert!(!dir.path().join("saves").exists());
}

#[test]
fn cli_status_without_save() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli()
        .args(["--mode", "status", "--save-dir"])
        .arg(dir.path())
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No saved game"));
}

#[test]
fn cli_run_saves_then_status_and_reset() {
    let dir = tempfile::tempdir().unwrap();
    let save_file = dir.path().join("hugoland-game-state.json");

    let status = cli()
        .args(["--mode", "run", "--duration-secs", "1", "--save-dir"])
        .arg(dir.path())
        .status()
        .expect("run cli");
    assert!(status.success());
    assert!(save_file.exists());

    let status_path = dir.path().join("status.json");
    let status = cli()
        .args(["--mode", "status", "--report", "json", "--save-dir"])
        .arg(dir.path())
        .arg("--output")
        .arg(&status_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let summary = read_json(&status_path);
    assert!(summary["zone"].as_u64().unwrap() >= 1);

    let output = cli()
        .args(["--mode", "reset", "--save-dir"])
        .arg(dir.path())
        .output()
        .expect("run cli");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Saved game deleted"));
    assert!(!save_file.exists());
}

#[test]
fn cli_rejects_unknown_mode() {
    let output = cli().args(["--mode", "teleport"]).output().expect("run cli");
    assert!(!output.status.success());
}

#[test]
fn cli_run_json_report_keeps_stdout_clean() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli()
        .args([
            "--mode",
            "run",
            "--duration-secs",
            "1",
            "--report",
            "json",
            "--verbose",
            "--save-dir",
        ])
        .arg(dir.path())
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a single JSON document");
    assert_eq!(report["stopped"], "deadline");
    assert!(report["summary"]["zone"].as_u64().is_some());
}
