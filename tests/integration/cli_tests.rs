//! CLI integration tests
//!
//! These tests verify the command-line surface: flag parsing, configuration
//! diagnostics, and failure modes that do not need a real shrinker engine.

use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    Command::cargo_bin("shrinkaudit").expect("binary builds")
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("shrinkaudit"))
        .stdout(predicate::str::contains("--print-keep-rules"))
        .stdout(predicate::str::contains("--engine-jar"));
}

#[test]
fn test_cli_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shrinkaudit"));
}

#[test]
fn test_cli_requires_engine_jar() {
    let dir = tempfile::tempdir().unwrap();
    cli()
        .arg(dir.path())
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No engine jar configured"));
}

#[test]
fn test_cli_rejects_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "class_dirs = not-a-list").unwrap();

    cli()
        .arg(dir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
}

#[test]
fn test_cli_missing_engine_jar_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let classes = dir.path().join("classes");
    std::fs::create_dir_all(&classes).unwrap();

    cli()
        .arg(dir.path())
        .arg("--class-dir")
        .arg(&classes)
        .arg("--engine-jar")
        .arg(dir.path().join("no-such.jar"))
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("engine jar not found"));
}
