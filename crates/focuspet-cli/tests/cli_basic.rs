//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway config file.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(config: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_focuspet"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn config_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("config.toml")
}

#[test]
fn test_config_set_get_and_reset() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_path(&dir);

    let (code, stdout, _) = run_cli(&config, &["config", "get", "session.focus_duration_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1500");

    let (code, _, _) = run_cli(&config, &["config", "set", "session.focus_duration_secs", "600"]);
    assert_eq!(code, 0, "config set failed");
    let (_, stdout, _) = run_cli(&config, &["config", "get", "session.focus_duration_secs"]);
    assert_eq!(stdout.trim(), "600");

    let (code, stdout, _) = run_cli(&config, &["config", "reset"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("reset"));
    let (_, stdout, _) = run_cli(&config, &["config", "get", "session.focus_duration_secs"]);
    assert_eq!(stdout.trim(), "1500");
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_path(&dir);

    let (code, _, stderr) = run_cli(&config, &["config", "set", "watchdog.check_interval_secs", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (code, _, stderr) = run_cli(
        &config,
        &["config", "set", "watchdog.check_interval_secs", "18446744073709551615"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("between 1 and"));

    let (code, _, _) = run_cli(&config, &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_list_is_json() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&config_path(&dir), &["config", "list"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["quota"]["free_task_limit"], 4);
}

#[test]
fn test_stats_summary() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&config_path(&dir), &["stats", "--sessions", "5"]);
    assert_eq!(code, 0, "stats failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["total_sessions"], 5);
    assert_eq!(parsed["focused_display"], "2h 5m");
    assert_eq!(parsed["average_per_day"], 0.7);
}

#[test]
fn test_simulate_script() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("session.txt");
    let mut file = std::fs::File::create(&script).unwrap();
    writeln!(file, "@0 task add Learn English").unwrap();
    writeln!(file, "@0 task sub 1 Lesson 3").unwrap();
    writeln!(file, "@0 start").unwrap();
    writeln!(file, "@1500").unwrap();
    drop(file);

    let (code, stdout, _) = run_cli(
        &config_path(&dir),
        &["simulate", script.to_str().unwrap()],
    );
    assert_eq!(code, 0, "simulate failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["snapshot"]["sessions_completed"], 1);
    assert_eq!(parsed["snapshot"]["active_task"]["completed_subtasks"], 1);
    let completed = parsed["events"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["type"] == "session_completed")
        .unwrap();
    assert_eq!(completed["subtask"], "Lesson 3");
}

#[test]
fn test_run_reads_commands_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_focuspet"))
        .arg("--config")
        .arg(config_path(&dir))
        .arg("run")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let stdin = child.stdin.as_mut().unwrap();
    stdin
        .write_all(b"task add Thesis\nstart\npause\nstatus\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let lines: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(lines.iter().any(|l| l["type"] == "task_created"));
    assert!(lines.iter().any(|l| l["type"] == "session_started"));
    assert!(lines.iter().any(|l| l["type"] == "session_paused"));
    let status = lines.last().unwrap();
    assert_eq!(status["status"], "paused");
    assert_eq!(status["mood"], "sleep");
}
