//! CLI tests for `tcr init`, `tcr validate` and `tcr replay`.
//!
//! Spawns the tcr binary in a temp workspace and checks exit codes and the
//! JSON lines printed for each scripted event.

use std::fs;
use std::process::Command;

use serde_json::Value;
use tcr::core::types::TcrAction;
use tcr::exit_codes;
use tcr::io::config::{Config, write_config};
use tcr::io::init::{InitOptions, TcrPaths, init_workspace};
use tcr::test_support::enabled_tcr;

fn tcr_cmd(dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tcr"));
    cmd.current_dir(dir);
    cmd
}

fn stdout_records(output: &std::process::Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect()
}

#[test]
fn init_then_replay_example_script() {
    let temp = tempfile::tempdir().expect("tempdir");

    let status = tcr_cmd(temp.path())
        .arg("init")
        .status()
        .expect("tcr init");
    assert_eq!(status.code(), Some(exit_codes::OK));

    let output = tcr_cmd(temp.path())
        .args(["replay", ".tcr/scripts/example.jsonl"])
        .output()
        .expect("tcr replay");
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let records = stdout_records(&output);
    let requests: Vec<(u64, &str)> = records
        .iter()
        .filter_map(|record| Some((record["line"].as_u64()?, record["request"].as_str()?)))
        .collect();
    assert_eq!(
        requests,
        vec![
            (3, "revert_current_change_list"),
            (3, "notify_changes_reverted"),
            (5, "open_commit_dialog"),
        ]
    );
    assert!(
        records
            .iter()
            .any(|record| record["line"] == 6 && record["commit_allowed"] == true)
    );
}

#[test]
fn init_twice_without_force_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    init_workspace(temp.path(), &InitOptions { force: false }).expect("init");

    let output = tcr_cmd(temp.path())
        .arg("init")
        .output()
        .expect("tcr init");
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
}

#[test]
fn replay_uses_explicit_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config_path = temp.path().join("push.toml");
    write_config(
        &config_path,
        &Config {
            tcr: enabled_tcr(TcrAction::CommitAndPush),
            ..Config::default()
        },
    )
    .expect("write config");
    let script_path = temp.path().join("events.jsonl");
    fs::write(
        &script_path,
        "{\"event\":\"modified\",\"units\":{\"src/lib.rs\":1}}\n{\"event\":\"test_passed\",\"test\":\"t\"}\n",
    )
    .expect("write script");

    let output = tcr_cmd(temp.path())
        .args(["replay", "events.jsonl", "--config", "push.toml"])
        .output()
        .expect("tcr replay");
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let records = stdout_records(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["line"], 2);
    assert_eq!(records[0]["request"], "commit_without_dialog_and_push");
}

#[test]
fn replay_rejects_invalid_script_line() {
    let temp = tempfile::tempdir().expect("tempdir");
    let script_path = temp.path().join("events.jsonl");
    fs::write(&script_path, "{\"event\":\"tick\"}\n{\"event\":\"tick\",\"count\":0}\n")
        .expect("write script");

    let output = tcr_cmd(temp.path())
        .args(["replay", "events.jsonl"])
        .output()
        .expect("tcr replay");
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}

#[test]
fn validate_reports_bad_pattern() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = TcrPaths::new(temp.path());
    fs::create_dir_all(&paths.tcr_dir).expect("create .tcr");
    fs::write(&paths.config_path, "[tcr]\ndo_not_revert_files = [\"\"]\n")
        .expect("write config");

    let output = tcr_cmd(temp.path())
        .arg("validate")
        .output()
        .expect("tcr validate");
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("do_not_revert_files"));
}

#[test]
fn validate_accepts_fresh_workspace() {
    let temp = tempfile::tempdir().expect("tempdir");
    init_workspace(temp.path(), &InitOptions { force: false }).expect("init");

    let status = tcr_cmd(temp.path())
        .args(["validate", "--script", ".tcr/scripts/example.jsonl"])
        .status()
        .expect("tcr validate");
    assert_eq!(status.code(), Some(exit_codes::OK));
}
