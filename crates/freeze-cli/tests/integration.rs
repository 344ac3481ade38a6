//! Integration tests for CLI commands.

use serde_json::json;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn write_doc(dir: &TempDir, name: &str, doc: &serde_json::Value) -> String {
    let path: PathBuf = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string(doc).unwrap()).unwrap();
    path.to_string_lossy().to_string()
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_freeze"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

#[test]
fn test_freeze_sorted_output() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "doc.json", &json!([3, 1, {"c": "c", "a": "b", "b": "a"}]));

    let (success, stdout, _) = run_cli(&["sort", &path]);
    assert!(success);
    assert_eq!(stdout.trim(), "((('a', 'b'), ('b', 'a'), ('c', 'c')), 1, 3)");
}

#[test]
fn test_freeze_json_output() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "doc.json", &json!({"k": [1, 2]}));

    let (success, stdout, _) = run_cli(&["freeze", &path, "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed, json!({"items": [["k", [1, 2]]]}));
}

#[test]
fn test_dump_shows_mapping_marker() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "doc.json", &json!([1, {"a": "b"}]));

    let (success, stdout, _) = run_cli(&["dump", &path]);
    assert!(success);
    assert_eq!(stdout.trim_end(), "[1,\n [\"<map>\",\n  {'a': 'b'}]]");
}

#[test]
fn test_flatten_lists_paths() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, "doc.json", &json!({"a": [1, 2, 3], "b": []}));

    let (success, stdout, _) = run_cli(&["flatten", &path]);
    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["a", "a/0/1", "a/1/2", "a/2/3", "b", "b/<empty>"]);
}

#[test]
fn test_hash_is_order_independent() {
    let dir = TempDir::new().unwrap();
    let left = write_doc(&dir, "left.json", &json!([1, 2, {"x": [3, 4, 5]}]));
    let right = write_doc(&dir, "right.json", &json!([{"x": [5, 4, 3]}, 2, 1]));

    let (ok_left, hash_left, _) = run_cli(&["hash", &left]);
    let (ok_right, hash_right, _) = run_cli(&["hash", &right]);
    assert!(ok_left && ok_right);
    assert_eq!(hash_left, hash_right);
    assert!(hash_left.contains("sha-256:"));

    let (_, recursive_left, _) = run_cli(&["hash", &left, "--recursive"]);
    let (_, recursive_right, _) = run_cli(&["hash", &right, "--recursive"]);
    assert_ne!(recursive_left, recursive_right);
}

#[test]
fn test_diff_reports_changed_leaf() {
    let dir = TempDir::new().unwrap();
    let left = write_doc(&dir, "left.json", &json!(["a", [3, 4]]));
    let right = write_doc(&dir, "right.json", &json!(["a", [3, 7]]));

    let (success, stdout, _) = run_cli(&["diff", &left, &right]);
    assert!(success);
    assert!(stdout.contains("-  4"));
    assert!(stdout.contains("+  7"));

    let (success, _, stderr) = run_cli(&["diff", &left, &right, "--check"]);
    assert!(!success);
    assert!(stderr.contains("Error: difference"));
}

#[test]
fn test_diff_check_passes_for_reordered_documents_when_sorted() {
    let dir = TempDir::new().unwrap();
    let left = write_doc(&dir, "left.json", &json!({"a": [1, 2], "b": {"c": 1}}));
    let right = write_doc(&dir, "right.json", &json!({"b": {"c": 1}, "a": [2, 1]}));

    let (success, stdout, _) = run_cli(&["diff", &left, &right, "--sort", "--check"]);
    assert!(success);
    assert!(stdout.is_empty());
}

#[test]
fn test_invalid_json_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{not json").unwrap();

    let (success, _, stderr) = run_cli(&["freeze", &path.to_string_lossy()]);
    assert!(!success);
    assert!(stderr.contains("Error: invalid JSON"));
}
