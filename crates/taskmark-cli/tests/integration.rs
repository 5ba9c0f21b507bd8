//! Integration tests for CLI commands.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn make_task_text(id: &str, created_at: &str, extra: &str) -> String {
    format!(
        "---\nid: {id}\ntitle: Task {id}\nkind: feature\nscope: minor\nrisk: low\n\
epistemic_state: validated\nconfidence: high\norigin: human\nlifecycle_state: active\n\
created_at: \"{created_at}\"\nintent_hash: \"{{{{intent_hash}}}}\"\n{extra}---\n\n\
# Task {id}\n\n## Goal\n\nDo {id}.\n\n## Evidence\n\n- notes\n"
    )
}

fn write_task(root: &Path, slot: &str, text: &str) -> PathBuf {
    let dir = root.join(slot);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("00_TASK.md"), text).unwrap();
    dir
}

fn create_test_root() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_task(temp_dir.path(), "001-t1", &make_task_text("t1", "2026-01-01T00:00:00Z", ""));
    write_task(temp_dir.path(), "002-t2", &make_task_text("t2", "2026-01-02T00:00:00Z", ""));
    write_task(temp_dir.path(), "003-t3", &make_task_text("t3", "2026-01-03T00:00:00Z", ""));
    temp_dir
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_taskmark"))
        .args(args)
        .env_remove("TASKMARK_STALENESS_DAYS")
        .env_remove("TASKMARK_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    let success = output.status.success();

    (success, stdout, stderr)
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[test]
fn test_intent_command() {
    let temp_dir = create_test_root();
    let task = path_arg(&temp_dir.path().join("001-t1"));

    let (success, stdout, _) = run_cli(&["intent", "--task", &task]);
    assert!(success);
    assert!(stdout.starts_with("---\n"));
    assert!(stdout.contains("## Goal"));
    assert!(!stdout.contains("## Evidence"));
    assert!(!stdout.contains("intent_hash:"));
}

#[test]
fn test_intent_json_output() {
    let temp_dir = create_test_root();
    let task = path_arg(&temp_dir.path().join("001-t1"));

    let (success, stdout, _) = run_cli(&["intent", "--task", &task, "--json"]);
    assert!(success);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    let blob = parsed["canonical_blob"].as_str().unwrap();
    assert_eq!(parsed["blob_length"].as_u64().unwrap(), blob.len() as u64);
    assert_eq!(parsed["hygiene"]["sections_skipped"][0], "Evidence");
}

#[test]
fn test_hash_command() {
    let temp_dir = create_test_root();
    let task = path_arg(&temp_dir.path().join("001-t1"));

    let (success, stdout, _) = run_cli(&["hash", "--task", &task]);
    assert!(success);
    let digest = stdout.trim();
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    let (success, stdout, _) = run_cli(&["hash", "--task", &task, "--json"]);
    assert!(success);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["digest"], digest);
    assert_eq!(parsed["algo"], "sha256-v1");
    assert_eq!(parsed["scope"], "canonical-intent");
    assert_eq!(parsed["stored"]["state"], "placeholder");
    assert!(parsed["matches"].is_null());
    assert!(parsed["stored_well_formed"].is_null());
}

#[test]
fn test_hash_compares_recorded_digest() {
    let temp_dir = create_test_root();
    let task_dir = temp_dir.path().join("001-t1");
    let task = path_arg(&task_dir);
    let task_file = task_dir.join("00_TASK.md");

    let (_, digest, _) = run_cli(&["hash", "--task", &task]);
    let text = fs::read_to_string(&task_file).unwrap();
    fs::write(&task_file, text.replace("\"{{intent_hash}}\"", digest.trim())).unwrap();

    let (success, stdout, _) = run_cli(&["hash", "--task", &task, "--json"]);
    assert!(success);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["stored"]["state"], "recorded");
    assert_eq!(parsed["stored_well_formed"], true);
    assert_eq!(parsed["matches"], true);

    fs::write(&task_file, text.replace("\"{{intent_hash}}\"", "not-a-digest")).unwrap();
    let (success, stdout, _) = run_cli(&["hash", "--task", &task, "--json"]);
    assert!(success);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["stored_well_formed"], false);
    assert_eq!(parsed["matches"], false);
}

#[test]
fn test_status_writes_report() {
    let temp_dir = create_test_root();
    let task_dir = temp_dir.path().join("001-t1");
    let task = path_arg(&task_dir);

    let (success, stdout, _) = run_cli(&["status", "--task", &task, "--now", "2026-01-20T00:00:00Z"]);
    assert!(success);
    assert!(stdout.contains("Task: t1"));
    assert!(stdout.contains("Stale: true"));
    assert!(stdout.contains("Last reviewed 19 days ago (threshold: 14)"));

    let report = fs::read_to_string(task_dir.join("99_STATE.md")).unwrap();
    assert!(report.contains("  days_since_review: 19\n"));
}

#[test]
fn test_status_json_no_write() {
    let temp_dir = create_test_root();
    let task_dir = temp_dir.path().join("002-t2");
    let task = path_arg(&task_dir);

    let (success, stdout, _) = run_cli(&[
        "status",
        "--task",
        &task,
        "--json",
        "--no-write",
        "--now",
        "2026-01-05T00:00:00Z",
    ]);
    assert!(success);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["task_id"], "t2");
    assert_eq!(parsed["is_stale"], false);
    assert_eq!(parsed["execution_eligible"], true);
    assert!(parsed["refusal_reasons"].is_null());
    assert!(!task_dir.join("99_STATE.md").exists());
}

#[test]
fn test_status_threshold_override() {
    let temp_dir = create_test_root();
    let task = path_arg(&temp_dir.path().join("001-t1"));

    let (success, stdout, _) = run_cli(&[
        "status",
        "--task",
        &task,
        "--json",
        "--no-write",
        "--now",
        "2026-01-20T00:00:00Z",
        "--staleness-days",
        "30",
    ]);
    assert!(success);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["staleness_threshold"], 30);
    assert_eq!(parsed["is_stale"], false);
}

#[test]
fn test_status_malformed_task_fails() {
    let temp_dir = TempDir::new().unwrap();
    let dir = write_task(temp_dir.path(), "broken", "no frontmatter\n");

    let (success, _, stderr) = run_cli(&["status", "--task", &path_arg(&dir)]);
    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("frontmatter delimiter"));
}

#[test]
fn test_status_missing_task_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let (success, _, stderr) = run_cli(&["status", "--task", &path_arg(temp_dir.path())]);
    assert!(!success);
    assert!(stderr.contains("00_TASK.md not found"));
}

#[test]
fn test_nav_first_last() {
    let temp_dir = create_test_root();
    let root = path_arg(temp_dir.path());

    let (success, stdout, _) = run_cli(&["nav", "--root", &root, "--first"]);
    assert!(success);
    assert_eq!(stdout.trim(), "t3");

    let (success, stdout, _) = run_cli(&["nav", "--root", &root, "--last"]);
    assert!(success);
    assert_eq!(stdout.trim(), "t1");
}

#[test]
fn test_nav_next_prev_and_path() {
    let temp_dir = create_test_root();
    let root = path_arg(temp_dir.path());

    let (success, stdout, _) = run_cli(&["nav", "--root", &root, "--next", "t3"]);
    assert!(success);
    assert_eq!(stdout.trim(), "t2");

    let (success, stdout, _) = run_cli(&["nav", "--root", &root, "--prev", "t1", "--path"]);
    assert!(success);
    assert!(stdout.trim().ends_with("002-t2"));

    let (success, stdout, _) = run_cli(&["nav", "--root", &root, "--next", "t2", "--json"]);
    assert!(success);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["result"], "t1");
    assert_eq!(parsed["created_at"], "2026-01-01T00:00:00Z");
}

#[test]
fn test_nav_boundary() {
    let temp_dir = create_test_root();
    let root = path_arg(temp_dir.path());

    let (success, stdout, _) = run_cli(&["nav", "--root", &root, "--next", "t1"]);
    assert!(success);
    assert!(stdout.trim().is_empty());

    let (success, stdout, _) = run_cli(&["nav", "--root", &root, "--prev", "t3", "--json"]);
    assert!(success);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed["result"].is_null());
    assert_eq!(parsed["reason"], "At boundary");
}

#[test]
fn test_nav_not_found() {
    let temp_dir = create_test_root();
    let root = path_arg(temp_dir.path());

    let (success, _, stderr) = run_cli(&["nav", "--root", &root, "--next", "t9"]);
    assert!(!success);
    assert!(stderr.contains("Task not found: t9"));
}

#[test]
fn test_nav_empty_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    let (success, _, stderr) = run_cli(&["nav", "--root", &path_arg(temp_dir.path()), "--first"]);
    assert!(!success);
    assert!(stderr.contains("No tasks found."));
}

#[test]
fn test_nav_requires_target() {
    let temp_dir = create_test_root();
    let (success, _, stderr) = run_cli(&["nav", "--root", &path_arg(temp_dir.path())]);
    assert!(!success);
    assert!(stderr.contains("Must specify"));
}

#[test]
fn test_list_command() {
    let temp_dir = create_test_root();
    let root = path_arg(temp_dir.path());

    let (success, stdout, _) = run_cli(&["list", "--root", &root]);
    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("ID"));
    assert!(lines[0].contains("CREATED_AT"));
    assert!(lines[2].starts_with("t3 "));
    assert!(lines[4].starts_with("t1 "));
}

#[test]
fn test_list_json_output() {
    let temp_dir = create_test_root();
    let (success, stdout, _) = run_cli(&["list", "--root", &path_arg(temp_dir.path()), "--json"]);
    assert!(success);
    let ids: Vec<String> = stdout
        .lines()
        .filter(|l| !l.is_empty())
        .map(|line| {
            let value: Value = serde_json::from_str(line).expect("Invalid JSON");
            value["id"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(ids, ["t3", "t2", "t1"]);
}

#[test]
fn test_time_command() {
    let (success, stdout, _) = run_cli(&["time"]);
    assert!(success);
    let ts = stdout.trim();
    assert_eq!(ts.len(), 20);
    assert!(ts.ends_with('Z'));
    assert_eq!(&ts[10..11], "T");
}

#[test]
fn test_timedelta_command() {
    let (success, stdout, _) = run_cli(&["timedelta", "--from", "2026-01-09T17:23:10Z", "--days", "7"]);
    assert!(success);
    assert_eq!(stdout.trim(), "2026-01-16T17:23:10Z");

    let (success, stdout, _) = run_cli(&[
        "timedelta",
        "--from",
        "2026-01-09T17:23:10Z",
        "--days",
        "-3",
        "--hours",
        "2",
    ]);
    assert!(success);
    assert_eq!(stdout.trim(), "2026-01-06T19:23:10Z");

    let (success, _, stderr) = run_cli(&["timedelta", "--from", "yesterday"]);
    assert!(!success);
    assert!(stderr.contains("Invalid RFC3339 timestamp"));
}
