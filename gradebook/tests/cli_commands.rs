//! CLI tests for the `gradebook` binary.
//!
//! Spawns the binary against a temp project root and verifies exit codes,
//! persisted snapshots and rendered output.

use std::path::Path;
use std::process::{Command, Output};

use gradebook::exit_codes;
use gradebook::io::init::{GradebookPaths, InitOptions, init_gradebook};
use gradebook::io::snapshot_store::{JsonFileStore, SnapshotStore};
use serde_json::Value;

fn gradebook(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gradebook"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("run gradebook")
}

#[test]
fn set_persists_clamped_score() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = init_gradebook(temp.path(), &InitOptions { force: false }).expect("init");

    let output = gradebook(temp.path(), &["set", "2", "math", "250"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let roster = JsonFileStore::new(&paths.roster_path)
        .load()
        .expect("load")
        .expect("present");
    assert_eq!(roster.get(2).map(|s| s.math), Some(100));
}

#[test]
fn set_unknown_id_exits_with_rejected_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = init_gradebook(temp.path(), &InitOptions { force: false }).expect("init");
    let before = std::fs::read_to_string(&paths.roster_path).expect("read");

    let output = gradebook(temp.path(), &["set", "42", "math", "50"]);
    assert_eq!(output.status.code(), Some(exit_codes::REJECTED));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown student id 42"));

    let after = std::fs::read_to_string(&paths.roster_path).expect("read");
    assert_eq!(before, after);
}

#[test]
fn set_invalid_subject_exits_with_rejected_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    init_gradebook(temp.path(), &InitOptions { force: false }).expect("init");

    let output = gradebook(temp.path(), &["set", "1", "history", "50"]);
    assert_eq!(output.status.code(), Some(exit_codes::REJECTED));
}

#[test]
fn show_json_orders_by_rank() {
    let temp = tempfile::tempdir().expect("tempdir");
    init_gradebook(temp.path(), &InitOptions { force: false }).expect("init");
    assert!(gradebook(temp.path(), &["set", "4", "korean", "90"]).status.success());
    assert!(gradebook(temp.path(), &["set", "2", "korean", "60"]).status.success());

    let output = gradebook(temp.path(), &["show", "--by-rank", "--json", "--subjects"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let view: Value = serde_json::from_slice(&output.stdout).expect("json view");

    let students = view["students"].as_array().expect("students");
    let ids: Vec<u64> = students
        .iter()
        .map(|s| s["id"].as_u64().expect("id"))
        .collect();
    let ranks: Vec<u64> = students
        .iter()
        .map(|s| s["rank"].as_u64().expect("rank"))
        .collect();
    assert_eq!(ids, vec![4, 2, 1, 3, 5]);
    assert_eq!(ranks, vec![1, 2, 3, 3, 3]);
    assert_eq!(view["subject_stats"]["korean"]["max"], 90);
}

#[test]
fn fill_with_seed_is_reproducible() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");
    for root in [first.path(), second.path()] {
        init_gradebook(root, &InitOptions { force: false }).expect("init");
        let output = gradebook(root, &["fill", "all", "--seed", "11"]);
        assert_eq!(output.status.code(), Some(exit_codes::OK));
    }

    let read = |root: &Path| {
        std::fs::read_to_string(GradebookPaths::new(root).roster_path).expect("read")
    };
    assert_eq!(read(first.path()), read(second.path()));
}

#[test]
fn validate_fails_on_corrupt_snapshot() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = init_gradebook(temp.path(), &InitOptions { force: false }).expect("init");
    std::fs::write(&paths.roster_path, "[{\"id\": 1}]").expect("corrupt");

    let output = gradebook(temp.path(), &["validate"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}
