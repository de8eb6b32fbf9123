//! CLI integration: drive the hashaudit binary end to end

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(temp_dir: &TempDir, args: &[&str]) -> Output {
    let store = temp_dir.path().join("files.db");
    Command::new(env!("CARGO_BIN_EXE_hashaudit"))
        .arg("--store")
        .arg(&store)
        .arg("--quiet")
        .args(args)
        .env("XDG_CONFIG_HOME", temp_dir.path().join("xdg"))
        .env_remove("HASHAUDIT__SCAN__ALGORITHM")
        .env_remove("HASHAUDIT__STORE__PATH")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim_end().to_string()
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn test_init_reports_created_then_existing() {
    let temp_dir = TempDir::new().unwrap();

    let first = run(&temp_dir, &["init"]);
    assert!(first.status.success());
    assert_eq!(stdout(&first), "new database created");

    let second = run(&temp_dir, &["init"]);
    assert!(second.status.success());
    assert_eq!(stdout(&second), "database already exist");
}

#[test]
fn test_commands_before_init_report_on_stdout() {
    let temp_dir = TempDir::new().unwrap();

    for args in [&["scan"][..], &["diff"][..], &["accept", "--yes"][..], &["roots"][..]] {
        let output = run(&temp_dir, args);
        assert!(output.status.success(), "{:?} should exit cleanly", args);
        assert_eq!(stdout(&output), "create database first");
        assert!(stderr(&output).is_empty());
    }
}

#[test]
fn test_read_commands_do_not_create_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("files.db");
    fs::create_dir(&store).unwrap();

    let output = run(&temp_dir, &["diff"]);
    assert_eq!(stdout(&output), "create database first");
    assert_eq!(fs::read_dir(&store).unwrap().count(), 0);
}

#[test]
fn test_invalid_format_is_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(run(&temp_dir, &["init"]).status.success());

    let output = run(&temp_dir, &["diff", "--format", "xml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Invalid format: xml"));
}

#[test]
fn test_full_audit_cycle() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a.txt"), "x").unwrap();
    fs::write(data.join("b.txt"), "y").unwrap();
    let root = path_arg(&data);

    assert!(run(&temp_dir, &["init"]).status.success());
    assert_eq!(stdout(&run(&temp_dir, &["add-root", &root])), "New path added");
    assert_eq!(
        stdout(&run(&temp_dir, &["add-root", &root])),
        "Path already in db"
    );

    let first_scan = run(&temp_dir, &["scan"]);
    assert!(first_scan.status.success());
    assert_eq!(stdout(&first_scan).lines().count(), 2);

    assert_eq!(stdout(&run(&temp_dir, &["accept", "--yes"])), "OK");
    assert_eq!(stdout(&run(&temp_dir, &["scan"])), "No errors found");

    fs::write(data.join("a.txt"), "z").unwrap();
    fs::remove_file(data.join("b.txt")).unwrap();
    fs::write(data.join("c.txt"), "w").unwrap();

    let scan = run(&temp_dir, &["scan"]);
    assert!(scan.status.success());
    assert_eq!(
        stdout(&scan),
        format!(
            "File: {root}/a.txt has been modified\n\
             File: {root}/b.txt has been deleted\n\
             File: {root}/c.txt has been added"
        )
    );

    // diff repeats the last scan without rescanning
    assert_eq!(stdout(&run(&temp_dir, &["diff"])), stdout(&scan));

    let one = format!("{root}/c.txt");
    assert_eq!(stdout(&run(&temp_dir, &["accept", "--path", &one])), "OK");
    assert_eq!(stdout(&run(&temp_dir, &["diff"])).lines().count(), 2);
}

#[test]
fn test_accept_without_tty_skips_prompt() {
    let temp_dir = TempDir::new().unwrap();
    assert!(run(&temp_dir, &["init"]).status.success());

    // stdin of a spawned test process is not a terminal
    let output = run(&temp_dir, &["accept"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "OK");
}

#[test]
fn test_missing_root_reported_as_scan_result() {
    let temp_dir = TempDir::new().unwrap();
    let gone = path_arg(&temp_dir.path().join("gone"));

    assert!(run(&temp_dir, &["init"]).status.success());
    assert!(run(&temp_dir, &["add-root", &gone]).status.success());

    let output = run(&temp_dir, &["scan"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), format!("path {gone} does not exist"));
}

#[test]
fn test_remove_root_always_ok() {
    let temp_dir = TempDir::new().unwrap();
    assert!(run(&temp_dir, &["init"]).status.success());

    assert_eq!(stdout(&run(&temp_dir, &["remove-root", "/never/added"])), "OK");
    assert_eq!(stdout(&run(&temp_dir, &["roots"])), "No watched roots");
}

#[test]
fn test_json_outputs_parse() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a.txt"), "x").unwrap();
    let root = path_arg(&data);

    assert!(run(&temp_dir, &["init"]).status.success());
    assert!(run(&temp_dir, &["add-root", &root]).status.success());

    let scan: serde_json::Value =
        serde_json::from_str(&stdout(&run(&temp_dir, &["scan", "--format", "json"]))).unwrap();
    assert_eq!(scan["scan"]["files"], 1);
    assert_eq!(scan["changes"][0]["kind"], "added");

    let roots: serde_json::Value =
        serde_json::from_str(&stdout(&run(&temp_dir, &["roots", "--format", "json"]))).unwrap();
    assert_eq!(roots[0]["path"], root.as_str());

    let status: serde_json::Value =
        serde_json::from_str(&stdout(&run(&temp_dir, &["status", "--format", "json"]))).unwrap();
    assert_eq!(status["current_records"], 1);
    assert_eq!(status["pending_changes"], 1);
}
