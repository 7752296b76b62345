//! CLI integration tests
//!
//! Recording and playback need audio hardware, so these tests drive the
//! management commands against pre-seeded note directories and databases.

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

fn voxnote_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_voxnote"));
    // Keep tests hermetic against the developer's own config and env
    cmd.env_remove("VOXNOTE_BACKEND")
        .env_remove("VOXNOTE_NOTES_DIR")
        .env_remove("VOXNOTE_DATABASE")
        .env("XDG_CONFIG_HOME", "/nonexistent");
    cmd
}

#[test]
fn help_output() {
    let output = voxnote_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("record"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("search"));
    assert!(stdout.contains("rename"));
    assert!(stdout.contains("delete"));
    assert!(stdout.contains("play"));
    assert!(stdout.contains("config"));
}

#[test]
fn version_output() {
    let output = voxnote_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voxnote"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_help() {
    let output = voxnote_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn config_path_command() {
    let output = voxnote_bin()
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voxnote"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_get_unknown_key() {
    let output = voxnote_bin()
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown") || stderr.contains("Valid"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_backend() {
    let output = voxnote_bin()
        .args(["config", "set", "backend", "cloud"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid backend") || stderr.contains("Valid backends"),
        "Expected error about invalid backend, got: {}",
        stderr
    );
}

#[test]
fn config_set_get_round_trip() {
    let config_home = tempdir().unwrap();

    let set = voxnote_bin()
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(["config", "set", "name_prefix", "Memo"])
        .output()
        .expect("Failed to execute command");
    assert!(set.status.success());

    let get = voxnote_bin()
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(["config", "get", "name_prefix"])
        .output()
        .expect("Failed to execute command");
    assert!(get.status.success());
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "Memo");
}

#[test]
fn list_empty_notes_dir_succeeds() {
    let notes = tempdir().unwrap();

    voxnote_bin()
        .args(["--notes-dir"])
        .arg(notes.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn list_shows_seeded_notes() {
    let notes = tempdir().unwrap();
    std::fs::write(notes.path().join("interview.wav"), b"pcm").unwrap();
    std::fs::write(notes.path().join("standup.wav"), b"pcm").unwrap();

    voxnote_bin()
        .args(["--notes-dir"])
        .arg(notes.path())
        .arg("list")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("interview").and(predicate::str::contains("standup")),
        );
}

#[test]
fn search_filters_by_name() {
    let notes = tempdir().unwrap();
    std::fs::write(notes.path().join("interview.wav"), b"pcm").unwrap();
    std::fs::write(notes.path().join("standup.wav"), b"pcm").unwrap();

    voxnote_bin()
        .args(["--notes-dir"])
        .arg(notes.path())
        .args(["search", "INTER"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("interview").and(predicate::str::contains("standup").not()),
        );
}

#[test]
fn rename_then_list_shows_new_name() {
    let notes = tempdir().unwrap();
    std::fs::write(notes.path().join("interview.wav"), b"pcm").unwrap();

    voxnote_bin()
        .args(["--notes-dir"])
        .arg(notes.path())
        .args(["rename", "interview.wav", "Candidate A"])
        .assert()
        .success();

    voxnote_bin()
        .args(["--notes-dir"])
        .arg(notes.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Candidate A"));
}

#[test]
fn rename_unknown_id_fails() {
    let notes = tempdir().unwrap();

    voxnote_bin()
        .args(["--notes-dir"])
        .arg(notes.path())
        .args(["rename", "9999999999999", "Anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn delete_removes_note_and_tolerates_repeats() {
    let notes = tempdir().unwrap();
    std::fs::write(notes.path().join("scratch.wav"), b"pcm").unwrap();

    let mut delete = voxnote_bin();
    delete
        .args(["--notes-dir"])
        .arg(notes.path())
        .args(["delete", "scratch.wav"]);
    delete.assert().success();
    assert!(!notes.path().join("scratch.wav").exists());

    // Deleting the same id again still succeeds
    voxnote_bin()
        .args(["--notes-dir"])
        .arg(notes.path())
        .args(["delete", "scratch.wav"])
        .assert()
        .success();
}

#[test]
fn play_unknown_id_fails() {
    let notes = tempdir().unwrap();

    voxnote_bin()
        .args(["--notes-dir"])
        .arg(notes.path())
        .args(["play", "9999999999999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn database_backend_list_succeeds() {
    let data = tempdir().unwrap();
    let db = data.path().join("notes.db");

    voxnote_bin()
        .args(["-b", "database", "--database"])
        .arg(&db)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(db.exists());
}

#[test]
fn database_backend_rename_unknown_fails() {
    let data = tempdir().unwrap();
    let db = data.path().join("notes.db");

    voxnote_bin()
        .args(["-b", "db", "--database"])
        .arg(&db)
        .args(["rename", "1", "Anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn record_with_invalid_duration_is_usage_error() {
    let notes = tempdir().unwrap();

    let output = voxnote_bin()
        .args(["--notes-dir"])
        .arg(notes.path())
        .args(["record", "-d", "soon"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("duration") || stderr.contains("Invalid"),
        "Expected error about invalid duration, got: {}",
        stderr
    );
}
