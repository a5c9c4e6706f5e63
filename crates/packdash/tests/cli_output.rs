//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.

use std::path::Path;
use std::process::{Command, Output};

/// Run packdash with an empty environment from `dir`, so no credentials,
/// `.env` file or user config can leak in.
fn run_isolated(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_packdash"))
        .args(args)
        .env_clear()
        .env("HOME", dir)
        .current_dir(dir)
        .output()
        .expect("Failed to execute packdash")
}

#[test]
fn test_help_lists_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_packdash"))
        .arg("--help")
        .output()
        .expect("Failed to execute 'packdash --help'");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["check", "show", "tv"] {
        assert!(stdout.contains(command), "help should list '{command}': {stdout}");
    }
}

#[test]
fn test_show_without_credentials_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_isolated(dir.path(), &["show"]);

    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stdout.trim().is_empty(),
        "nothing should be rendered without credentials, got: {stdout}"
    );
    assert!(
        stderr.contains("SNOWFLAKE_ACCOUNT"),
        "stderr should name the missing variable, got: {stderr}"
    );
    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should not emit INFO logs, got: {stderr}"
    );
}

#[test]
fn test_verbose_mode_emits_json_logs() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_isolated(dir.path(), &["-v", "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let has_startup = stderr
        .lines()
        .filter(|line| line.trim_start().starts_with('{'))
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .any(|log| log["fields"]["event"] == "core.app.startup_completed");
    assert!(has_startup, "expected startup event in verbose logs, got: {stderr}");
}

#[test]
fn test_invalid_date_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_isolated(dir.path(), &["show", "--date", "07/04/2025"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid date '07/04/2025'"),
        "expected a date error, got: {stderr}"
    );
}

#[test]
fn test_broken_project_config_warns_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join(".packdash");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[refresh\ninterval_secs = ").unwrap();

    let output = run_isolated(dir.path(), &["show"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains("Warning: Could not load config"),
        "expected config warning, got: {stderr}"
    );
    // Falls through to the credentials check with default settings
    assert!(stderr.contains("SNOWFLAKE_ACCOUNT"));
}
