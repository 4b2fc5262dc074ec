//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway data
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "intently-cli", "--"])
        .args(args)
        .env("INTENTLY_ENV", "dev")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["--help"]);
    assert_eq!(code, 0, "Help failed");
    assert!(stdout.contains("session"));
    assert!(stdout.contains("feedback"));
}

#[test]
fn test_config_list_is_json() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0, "Config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("config list not JSON");
    assert_eq!(parsed["timer"]["extend_minutes"], 5);
}

#[test]
fn test_config_set_and_get() {
    let home = TempDir::new().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "timer.extend_minutes", "10"]);
    assert_eq!(code, 0, "Config set failed");
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "timer.extend_minutes"]);
    assert_eq!(code, 0, "Config get failed");
    assert_eq!(stdout.trim(), "10");
}

#[test]
fn test_session_flow() {
    let home = TempDir::new().unwrap();
    let (_, _, code) = run_cli(home.path(), &["session", "intend", "write the report"]);
    assert_eq!(code, 0, "Session intend failed");

    let (stdout, _, code) = run_cli(
        home.path(),
        &["session", "start", "--minutes", "25", "--label", "25 min"],
    );
    assert_eq!(code, 0, "Session start failed");
    assert!(stdout.contains("SessionStarted"));

    let (stdout, _, code) = run_cli(home.path(), &["session", "status"]);
    assert_eq!(code, 0, "Session status failed");
    assert!(stdout.contains("\"state\": \"running\""));
    assert!(stdout.contains("write the report"));

    let (stdout, _, code) = run_cli(home.path(), &["session", "finish"]);
    assert_eq!(code, 0, "Session finish failed");
    assert!(stdout.contains("SessionFinished"));
}

#[test]
fn test_session_reset_clears_state() {
    let home = TempDir::new().unwrap();
    let _ = run_cli(home.path(), &["session", "intend", "browse with purpose"]);
    let _ = run_cli(home.path(), &["session", "start", "--infinite"]);
    let (_, _, code) = run_cli(home.path(), &["session", "reset"]);
    assert_eq!(code, 0, "Session reset failed");

    let (stdout, _, code) = run_cli(home.path(), &["session", "status"]);
    assert_eq!(code, 0, "Session status failed");
    assert!(stdout.contains("\"state\": \"no_session\""));
}

#[test]
fn test_session_start_rejects_zero_minutes() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["session", "start", "--minutes", "0"]);
    assert_eq!(code, 1, "Zero-minute start should fail");
    assert!(stderr.contains("error:"));
}

#[test]
fn test_feedback_rejects_out_of_range_score() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["feedback", "submit", "11"]);
    assert_eq!(code, 1, "Out-of-range score should fail");
    assert!(stderr.contains("error:"));
}

#[test]
fn test_feedback_status() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["feedback", "status"]);
    assert_eq!(code, 0, "Feedback status failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("feedback status not JSON");
    assert_eq!(parsed["next_threshold"], 2);
    assert_eq!(parsed["eligible_now"], false);
}

#[test]
fn test_stats_show() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["stats", "show"]);
    assert_eq!(code, 0, "Stats show failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("stats show not JSON");
    assert_eq!(parsed["usage"]["sessions_completed"], 0);
}

#[test]
fn test_stats_milestones() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["stats", "milestones"]);
    assert_eq!(code, 0, "Stats milestones failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("stats milestones not JSON");
    assert_eq!(parsed.as_array().unwrap().len(), 6);
}
