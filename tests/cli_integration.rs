//! Integration tests for the `sk` CLI.
//!
//! Each test creates a temp directory, runs `sk` as a subprocess,
//! and verifies stdout and/or the data directory contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const DAY: &str = "2024-01-10";

/// Get the path to the built `sk` binary.
fn sk_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("sk");
    path
}

/// Run `sk` with the given args in the given directory, returning (stdout, stderr, success).
fn run_sk(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(sk_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("SK_LOG")
        .output()
        .expect("failed to run sk");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `sk` expecting success, return stdout.
fn run_sk_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_sk(dir, args);
    if !success {
        panic!(
            "sk {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `sk` expecting failure, return stderr.
fn run_sk_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_sk(dir, args);
    if success {
        panic!("sk {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

/// Initialize a data directory with A, B, C on the scenario day, C done.
fn create_scenario(root: &Path) {
    run_sk_ok(root, &["init"]);
    for title in ["A", "B", "C"] {
        run_sk_ok(root, &["add", title, "--date", DAY]);
    }
    run_sk_ok(root, &["done", "T-0003"]);
}

fn list_json(root: &Path) -> serde_json::Value {
    let out = run_sk_ok(root, &["list", "--date", DAY, "--json"]);
    serde_json::from_str(&out).unwrap()
}

fn ids(day: &serde_json::Value) -> Vec<String> {
    day["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_data_dir() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_sk_ok(tmp.path(), &["init"]);
    assert!(out.contains("Initialized"));

    let dir = tmp.path().join(".sticky");
    let config = fs::read_to_string(dir.join("config.toml")).unwrap();
    assert!(config.contains("[focus]"));
    assert!(dir.join("tasks.json").is_file());
}

#[test]
fn test_init_twice_needs_force() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_sk_ok(tmp.path(), &["init"]);
    let err = run_sk_err(tmp.path(), &["init"]);
    assert!(err.contains("already exists"));
    run_sk_ok(tmp.path(), &["init", "--force"]);
}

#[test]
fn test_commands_need_data_dir() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_sk_err(tmp.path(), &["list"]);
    assert!(err.starts_with("error:"));
    assert!(err.contains("sk init"));
}

// ---------------------------------------------------------------------------
// Listing and ordering
// ---------------------------------------------------------------------------

#[test]
fn test_list_marks_active() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());

    let out = run_sk_ok(tmp.path(), &["list", "--date", DAY]);
    assert_eq!(
        out,
        "January 10, 2024\n\u{25CF} [ ] T-0001 A\n  [ ] T-0002 B\n  [x] T-0003 C\n"
    );
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());

    let day = list_json(tmp.path());
    assert_eq!(day["date"], DAY);
    assert_eq!(day["active"], "T-0001");
    assert_eq!(ids(&day), vec!["T-0001", "T-0002", "T-0003"]);
    assert_eq!(day["tasks"][0]["priority"], 0);
    assert_eq!(day["tasks"][2]["completed"], true);
    assert!(day["tasks"][2]["completed_at"].is_string());
}

#[test]
fn test_other_day_is_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());

    let out = run_sk_ok(tmp.path(), &["list", "--date", "2024-01-11"]);
    assert!(out.contains("January 11, 2024"));
    assert!(out.contains("(no tasks)"));
}

#[test]
fn test_mv_reindexes() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());

    run_sk_ok(tmp.path(), &["mv", "T-0003", "T-0001"]);
    let day = list_json(tmp.path());
    assert_eq!(ids(&day), vec!["T-0003", "T-0001", "T-0002"]);
    let priorities: Vec<i64> = day["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["priority"].as_i64().unwrap())
        .collect();
    assert_eq!(priorities, vec![0, 1, 2]);
    // the completed task moved to the top does not become active
    assert_eq!(day["active"], "T-0001");
}

#[test]
fn test_mv_across_days_is_refused() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());
    run_sk_ok(tmp.path(), &["add", "Tomorrow", "--date", "2024-01-11"]);

    let err = run_sk_err(tmp.path(), &["mv", "T-0004", "T-0001"]);
    assert!(err.contains("cannot move"));
    assert_eq!(ids(&list_json(tmp.path())), vec!["T-0001", "T-0002", "T-0003"]);
}

#[test]
fn test_active_json_has_three_lines() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());
    run_sk_ok(tmp.path(), &["note", "T-0001", "call the bank"]);

    let out = run_sk_ok(tmp.path(), &["active", "--date", DAY, "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["task"]["id"], "T-0001");
    assert_eq!(
        parsed["lines"],
        serde_json::json!(["call the bank", "", ""])
    );
}

#[test]
fn test_active_when_all_done() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());
    run_sk_ok(tmp.path(), &["done", "T-0001"]);
    run_sk_ok(tmp.path(), &["done", "T-0002"]);

    let out = run_sk_ok(tmp.path(), &["active", "--date", DAY]);
    assert!(out.contains("nothing left to do"));
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[test]
fn test_toggle_twice_restores() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());

    let out = run_sk_ok(tmp.path(), &["toggle", "T-0002"]);
    assert_eq!(out.trim(), "[x] T-0002 B");
    run_sk_ok(tmp.path(), &["toggle", "T-0002"]);

    let day = list_json(tmp.path());
    let b = &day["tasks"][1];
    assert_eq!(b["id"], "T-0002");
    assert_eq!(b["completed"], false);
    assert!(b.get("completed_at").is_none());
    assert_eq!(b["title"], "B");
}

#[test]
fn test_done_twice_keeps_completed_at() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());
    let before = list_json(tmp.path())["tasks"][2]["completed_at"].clone();
    assert!(before.is_string());

    run_sk_ok(tmp.path(), &["done", "T-0003"]);
    let after = list_json(tmp.path())["tasks"][2]["completed_at"].clone();
    assert_eq!(after, before);
}

#[test]
fn test_reopen() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());
    run_sk_ok(tmp.path(), &["reopen", "T-0003"]);

    let day = list_json(tmp.path());
    assert_eq!(day["tasks"][2]["completed"], false);
}

#[test]
fn test_title_and_blank_title() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());

    run_sk_ok(tmp.path(), &["title", "T-0002", "  Buy milk  "]);
    assert_eq!(list_json(tmp.path())["tasks"][1]["title"], "Buy milk");

    let err = run_sk_err(tmp.path(), &["title", "T-0002", "   "]);
    assert!(err.contains("title is required"));
    let err = run_sk_err(tmp.path(), &["add", ""]);
    assert!(err.contains("title is required"));
}

#[test]
fn test_long_notes_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());

    let long = "n".repeat(1001);
    let err = run_sk_err(tmp.path(), &["note", "T-0001", &long]);
    assert!(err.contains("1000"));
    assert!(list_json(tmp.path())["tasks"][0].get("notes").is_none());
}

#[test]
fn test_rm_then_not_found() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());

    let out = run_sk_ok(tmp.path(), &["rm", "T-0002"]);
    assert!(out.contains("T-0002 deleted"));
    assert_eq!(ids(&list_json(tmp.path())), vec!["T-0001", "T-0003"]);

    let err = run_sk_err(tmp.path(), &["done", "T-0002"]);
    assert!(err.contains("task not found: T-0002"));
    let err = run_sk_err(tmp.path(), &["rm", "T-0002"]);
    assert!(err.contains("not found"));
}

#[test]
fn test_add_appends_after_reorder() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());
    run_sk_ok(tmp.path(), &["mv", "T-0003", "T-0001"]);

    let out = run_sk_ok(tmp.path(), &["add", "D", "--date", DAY]);
    assert_eq!(out.trim(), "T-0004");
    let day = list_json(tmp.path());
    assert_eq!(ids(&day), vec!["T-0003", "T-0001", "T-0002", "T-0004"]);
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[test]
fn test_discovery_from_subdirectory() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());
    let nested = tmp.path().join("notes").join("deep");
    fs::create_dir_all(&nested).unwrap();

    let out = run_sk_ok(&nested, &["list", "--date", DAY]);
    assert!(out.contains("T-0001 A"));
}

#[test]
fn test_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_scenario(tmp.path());
    let elsewhere = tempfile::TempDir::new().unwrap();

    let dir = tmp.path().to_str().unwrap();
    let out = run_sk_ok(elsewhere.path(), &["-C", dir, "list", "--date", DAY]);
    assert!(out.contains("T-0002 B"));
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[test]
fn test_cal_month() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_sk_ok(tmp.path(), &["cal", "2024-02"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0].trim(), "February 2024");
    assert_eq!(lines[1], "Su Mo Tu We Th Fr Sa");
    assert_eq!(lines[2], "             1  2  3");
    assert_eq!(lines.last().copied(), Some("25 26 27 28 29"));
}

#[test]
fn test_cal_bad_month() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_sk_err(tmp.path(), &["cal", "2024-13"]);
    assert!(err.contains("invalid month"));
}
